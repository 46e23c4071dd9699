//! Target filtering: cluster membership first, then staleness.

use crate::arn;
use crate::ports::scheduler::Target;

/// Keeps the targets whose destination is the given cluster.
///
/// Either side may spell the cluster as a bare name or a full cluster ARN;
/// matching compares the name component only. Input order is preserved and
/// non-matching targets are dropped silently.
#[must_use]
pub fn cluster_targets(targets: Vec<Target>, cluster: &str) -> Vec<Target> {
    let wanted = arn::cluster_name(cluster);
    targets.into_iter().filter(|target| arn::cluster_name(&target.arn) == wanted).collect()
}

/// Keeps the targets whose task-definition reference is a stale revision of
/// the new ARN's family.
///
/// Targets without a task-definition reference, targets from a different
/// family, and targets already pointing at the new ARN are all excluded.
/// Excluding identical references is what makes a repeated run a no-op.
#[must_use]
pub fn stale_targets(targets: Vec<Target>, new_arn: &str) -> Vec<Target> {
    targets
        .into_iter()
        .filter(|target| {
            target
                .ecs_parameters
                .as_ref()
                .is_some_and(|ecs| arn::is_stale_reference(&ecs.task_definition_arn, new_arn))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::scheduler::EcsParameters;

    const NEW_ARN: &str = "arn:aws:ecs:us-east-1:123456789012:task-definition/App:7";

    fn target(id: &str, cluster_arn: &str, task_definition_arn: Option<&str>) -> Target {
        Target {
            id: id.to_string(),
            arn: cluster_arn.to_string(),
            role_arn: None,
            input: None,
            input_path: None,
            ecs_parameters: task_definition_arn.map(|arn| EcsParameters {
                task_definition_arn: arn.to_string(),
                task_count: Some(1),
                launch_type: None,
                group: None,
                platform_version: None,
                network_configuration: None,
            }),
            dead_letter_config: None,
            retry_policy: None,
        }
    }

    fn ids(targets: &[Target]) -> Vec<&str> {
        targets.iter().map(|target| target.id.as_str()).collect()
    }

    #[test]
    fn cluster_filter_keeps_matches_in_order() {
        let default = "arn:aws:ecs:us-east-1:123456789012:cluster/default";
        let other = "arn:aws:ecs:us-east-1:123456789012:cluster/staging";
        let targets = vec![
            target("a", default, None),
            target("b", other, None),
            target("c", default, None),
        ];
        let kept = cluster_targets(targets, "default");
        assert_eq!(ids(&kept), ["a", "c"]);
    }

    #[test]
    fn cluster_filter_accepts_arn_spelling_on_the_query_side() {
        let default = "arn:aws:ecs:us-east-1:123456789012:cluster/default";
        let targets = vec![target("a", default, None)];
        let kept =
            cluster_targets(targets, "arn:aws:ecs:eu-west-1:999999999999:cluster/default");
        assert_eq!(ids(&kept), ["a"]);
    }

    #[test]
    fn cluster_filter_accepts_bare_name_on_the_target_side() {
        let targets = vec![target("a", "default", None)];
        let kept = cluster_targets(targets, "default");
        assert_eq!(ids(&kept), ["a"]);
    }

    #[test]
    fn cluster_filter_drops_non_cluster_destinations() {
        let function = "arn:aws:lambda:us-east-1:123456789012:function:reaper";
        let targets = vec![target("fn", function, None)];
        assert!(cluster_targets(targets, "default").is_empty());
    }

    #[test]
    fn stale_filter_keeps_older_revisions_of_the_same_family() {
        let old = "arn:aws:ecs:us-east-1:123456789012:task-definition/App:6";
        let targets = vec![target("a", "default", Some(old))];
        let kept = stale_targets(targets, NEW_ARN);
        assert_eq!(ids(&kept), ["a"]);
    }

    #[test]
    fn stale_filter_excludes_targets_already_current() {
        let targets = vec![target("a", "default", Some(NEW_ARN))];
        assert!(stale_targets(targets, NEW_ARN).is_empty());
    }

    #[test]
    fn stale_filter_excludes_foreign_families() {
        let worker = "arn:aws:ecs:us-east-1:123456789012:task-definition/AppWorker:3";
        let targets = vec![target("a", "default", Some(worker))];
        assert!(stale_targets(targets, NEW_ARN).is_empty());
    }

    #[test]
    fn stale_filter_excludes_targets_without_a_reference() {
        let targets = vec![target("a", "default", None)];
        assert!(stale_targets(targets, NEW_ARN).is_empty());
    }

    #[test]
    fn stale_filter_preserves_order_across_mixed_targets() {
        let old = "arn:aws:ecs:us-east-1:123456789012:task-definition/App:5";
        let older = "arn:aws:ecs:us-east-1:123456789012:task-definition/App:1";
        let targets = vec![
            target("a", "default", Some(old)),
            target("b", "default", Some(NEW_ARN)),
            target("c", "default", Some(older)),
        ];
        let kept = stale_targets(targets, NEW_ARN);
        assert_eq!(ids(&kept), ["a", "c"]);
    }
}
