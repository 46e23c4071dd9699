//! ARN string helpers shared by the filters and the extractor.
//!
//! Task definition ARNs have the shape
//! `arn:aws:ecs:<region>:<account>:task-definition/<family>:<revision>`;
//! cluster ARNs end in `cluster/<name>`. Callers may hand either a bare
//! name or a fully qualified ARN for clusters, so comparisons happen on
//! the name component.

/// Marker segment that precedes the family name in a task definition ARN.
const TASK_DEFINITION_SEGMENT: &str = "task-definition/";

/// Marker segment that precedes the name in a cluster ARN.
const CLUSTER_SEGMENT: &str = "cluster/";

/// Returns the cluster name component of a cluster reference.
///
/// Accepts a bare name (`prod`) or a full resource ARN
/// (`arn:aws:ecs:us-east-1:123456789012:cluster/prod`) and returns `prod`
/// for both, so the two spellings compare equal.
#[must_use]
pub fn cluster_name(cluster: &str) -> &str {
    if !cluster.starts_with("arn:") {
        return cluster;
    }
    match cluster.rfind(CLUSTER_SEGMENT) {
        Some(idx) => &cluster[idx + CLUSTER_SEGMENT.len()..],
        None => cluster,
    }
}

/// Returns the family key of a task definition ARN: the prefix up through
/// `task-definition/<family>`, with the `:<revision>` suffix stripped.
///
/// Returns `None` when the string has no `task-definition/` segment, i.e.
/// is not a task definition ARN at all. An ARN without a revision suffix
/// is its own family key.
#[must_use]
pub fn task_definition_family(arn: &str) -> Option<&str> {
    let family_start = arn.find(TASK_DEFINITION_SEGMENT)? + TASK_DEFINITION_SEGMENT.len();
    let family_end = arn[family_start..]
        .find(':')
        .map_or(arn.len(), |offset| family_start + offset);
    Some(&arn[..family_end])
}

/// Returns `true` when both references belong to the same task definition
/// family but are not the same revision.
///
/// This is the staleness test: an identical reference is current (not
/// stale), a reference from another family is unrelated, and a string
/// that is not a task definition ARN never matches anything.
#[must_use]
pub fn is_stale_reference(current: &str, new: &str) -> bool {
    match (task_definition_family(current), task_definition_family(new)) {
        (Some(current_family), Some(new_family)) => {
            current_family == new_family && current != new
        }
        _ => false,
    }
}
