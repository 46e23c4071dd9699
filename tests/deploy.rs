//! End-to-end deploy runs against in-memory adapters.
//!
//! Each test wires a `ServiceContext` from a fake filesystem and a fake
//! scheduler, then drives the deploy command the same way the binary
//! does, asserting on the puts the scheduler received and the step output
//! that was published.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use retask::commands::deploy::{run_with_context, DeployArgs};
use retask::commands::StepEnv;
use retask::context::ServiceContext;
use retask::ports::{
    EcsParameters, FileSystem, RulePage, RuleScheduler, ScheduleRule, SchedulerFuture, Target,
    TargetPage,
};

const NEW_ARN: &str = "arn:aws:ecs:us-east-1:123456789012:task-definition/App:7";
const OLD_ARN: &str = "arn:aws:ecs:us-east-1:123456789012:task-definition/App:6";
const DEFAULT_CLUSTER: &str = "arn:aws:ecs:us-east-1:123456789012:cluster/default";
const STAGING_CLUSTER: &str = "arn:aws:ecs:us-east-1:123456789012:cluster/staging";

type Puts = Arc<Mutex<Vec<(String, Vec<Target>)>>>;
type Appends = Arc<Mutex<Vec<(PathBuf, String)>>>;

struct MemFs {
    files: HashMap<PathBuf, String>,
    appends: Appends,
}

impl FileSystem for MemFs {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("no such file: {}", path.display()).into())
    }

    fn append(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.appends.lock().expect("lock").push((path.to_path_buf(), contents.to_string()));
        Ok(())
    }
}

/// Single-page fake scheduler; pagination is covered by the engine's unit
/// tests.
struct FakeScheduler {
    rules: Vec<ScheduleRule>,
    targets: HashMap<String, Vec<Target>>,
    fail_put: Vec<String>,
    puts: Puts,
}

impl RuleScheduler for FakeScheduler {
    fn list_rules(
        &self,
        name_prefix: &str,
        _next_token: Option<&str>,
    ) -> SchedulerFuture<'_, RulePage> {
        let prefix = name_prefix.to_string();
        let rules: Vec<ScheduleRule> =
            self.rules.iter().filter(|rule| rule.name.starts_with(&prefix)).cloned().collect();
        Box::pin(async move { Ok(RulePage { rules, next_token: None }) })
    }

    fn list_targets(
        &self,
        rule: &str,
        _next_token: Option<&str>,
    ) -> SchedulerFuture<'_, TargetPage> {
        let targets = self.targets.get(rule).cloned().unwrap_or_default();
        Box::pin(async move { Ok(TargetPage { targets, next_token: None }) })
    }

    fn put_targets(&self, rule: &str, targets: &[Target]) -> SchedulerFuture<'_, ()> {
        if self.fail_put.iter().any(|name| name == rule) {
            return Box::pin(async { Err("service rejected the put".into()) });
        }
        let rule = rule.to_string();
        let targets = targets.to_vec();
        Box::pin(async move {
            self.puts.lock().expect("lock").push((rule, targets));
            Ok(())
        })
    }
}

struct Harness {
    ctx: ServiceContext,
    puts: Puts,
    appends: Appends,
}

fn harness(rules: Vec<ScheduleRule>, targets: HashMap<String, Vec<Target>>) -> Harness {
    harness_with_failing_puts(rules, targets, Vec::new())
}

fn harness_with_failing_puts(
    rules: Vec<ScheduleRule>,
    targets: HashMap<String, Vec<Target>>,
    fail_put: Vec<String>,
) -> Harness {
    let puts: Puts = Arc::default();
    let appends: Appends = Arc::default();

    let mut files = HashMap::new();
    files.insert(
        PathBuf::from("/ws/out/taskdef.yml"),
        format!("taskDefinitionArn: {NEW_ARN}\n"),
    );

    let ctx = ServiceContext {
        fs: Box::new(MemFs { files, appends: Arc::clone(&appends) }),
        scheduler: Box::new(FakeScheduler { rules, targets, fail_put, puts: Arc::clone(&puts) }),
    };
    Harness { ctx, puts, appends }
}

fn step_env() -> StepEnv {
    StepEnv {
        workspace: PathBuf::from("/ws"),
        output_file: Some(PathBuf::from("/ws/github_output")),
    }
}

fn deploy_args() -> DeployArgs {
    DeployArgs {
        task_definition: PathBuf::from("out/taskdef.yml"),
        cluster: "default".to_string(),
        rule_prefix: String::new(),
        dry_run: false,
        max_concurrency: 4,
        output_file: None,
    }
}

fn rule(name: &str) -> ScheduleRule {
    ScheduleRule {
        name: name.to_string(),
        schedule_expression: Some("cron(0 3 * * ? *)".to_string()),
        state: Some("ENABLED".to_string()),
    }
}

fn target(id: &str, cluster_arn: &str, task_definition_arn: &str) -> Target {
    Target {
        id: id.to_string(),
        arn: cluster_arn.to_string(),
        role_arn: Some("arn:aws:iam::123456789012:role/ecsEventsRole".to_string()),
        input: None,
        input_path: None,
        ecs_parameters: Some(EcsParameters {
            task_definition_arn: task_definition_arn.to_string(),
            task_count: Some(1),
            launch_type: Some("FARGATE".to_string()),
            group: None,
            platform_version: None,
            network_configuration: None,
        }),
        dead_letter_config: None,
        retry_policy: None,
    }
}

fn emitted_output(appends: &Appends) -> Vec<(PathBuf, String)> {
    appends.lock().expect("lock").clone()
}

#[tokio::test]
async fn repoints_the_stale_target_in_the_default_cluster() {
    // The target set as the listing call would hand it back.
    let listed: Vec<Target> = serde_yaml::from_str(&format!(
        r"
- id: stale
  arn: {DEFAULT_CLUSTER}
  roleArn: arn:aws:iam::123456789012:role/ecsEventsRole
  ecsParameters:
    taskDefinitionArn: {OLD_ARN}
    taskCount: 1
    launchType: FARGATE
- id: other-cluster
  arn: {STAGING_CLUSTER}
  ecsParameters:
    taskDefinitionArn: {OLD_ARN}
- id: current
  arn: {DEFAULT_CLUSTER}
  ecsParameters:
    taskDefinitionArn: {NEW_ARN}
"
    ))
    .expect("fixture parses");

    let h = harness(
        vec![rule("nightly-report")],
        HashMap::from([("nightly-report".to_string(), listed)]),
    );

    run_with_context(&h.ctx, &step_env(), &deploy_args()).await.expect("deploy");

    let puts = h.puts.lock().expect("lock");
    assert_eq!(puts.len(), 1);
    let (put_rule, put_targets) = &puts[0];
    assert_eq!(put_rule, "nightly-report");
    assert_eq!(put_targets.len(), 1);
    assert_eq!(put_targets[0].id, "stale");
    assert_eq!(
        put_targets[0].ecs_parameters.as_ref().map(|ecs| ecs.task_definition_arn.as_str()),
        Some(NEW_ARN)
    );
    drop(puts);

    assert_eq!(
        emitted_output(&h.appends),
        vec![(PathBuf::from("/ws/github_output"), format!("task-definition-arn={NEW_ARN}\n"))]
    );
}

#[tokio::test]
async fn targets_in_another_cluster_are_left_alone() {
    let h = harness(
        vec![rule("nightly-report")],
        HashMap::from([(
            "nightly-report".to_string(),
            vec![target("staging-only", STAGING_CLUSTER, OLD_ARN)],
        )]),
    );

    run_with_context(&h.ctx, &step_env(), &deploy_args()).await.expect("deploy");

    assert!(h.puts.lock().expect("lock").is_empty());
    assert_eq!(emitted_output(&h.appends).len(), 1);
}

#[tokio::test]
async fn already_current_targets_make_a_second_run_a_no_op() {
    let h = harness(
        vec![rule("nightly-report")],
        HashMap::from([(
            "nightly-report".to_string(),
            vec![target("current", DEFAULT_CLUSTER, NEW_ARN)],
        )]),
    );

    run_with_context(&h.ctx, &step_env(), &deploy_args()).await.expect("deploy");

    assert!(h.puts.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn a_rule_without_targets_succeeds_without_a_put() {
    let h = harness(vec![rule("empty-rule")], HashMap::new());

    run_with_context(&h.ctx, &step_env(), &deploy_args()).await.expect("deploy");

    assert!(h.puts.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn a_prefix_matching_no_rules_is_a_trivial_success() {
    let h = harness(
        vec![rule("hourly-sync")],
        HashMap::from([(
            "hourly-sync".to_string(),
            vec![target("stale", DEFAULT_CLUSTER, OLD_ARN)],
        )]),
    );

    let args = DeployArgs { rule_prefix: "nightly-".to_string(), ..deploy_args() };
    run_with_context(&h.ctx, &step_env(), &args).await.expect("deploy");

    assert!(h.puts.lock().expect("lock").is_empty());
    assert_eq!(emitted_output(&h.appends).len(), 1);
}

#[tokio::test]
async fn failed_rules_are_all_reported_and_siblings_still_put() {
    let h = harness_with_failing_puts(
        vec![rule("rule-a"), rule("rule-b"), rule("rule-c")],
        HashMap::from([
            ("rule-a".to_string(), vec![target("a1", DEFAULT_CLUSTER, OLD_ARN)]),
            ("rule-b".to_string(), vec![target("b1", DEFAULT_CLUSTER, OLD_ARN)]),
            ("rule-c".to_string(), vec![target("c1", DEFAULT_CLUSTER, OLD_ARN)]),
        ]),
        vec!["rule-a".to_string(), "rule-c".to_string()],
    );

    let err = run_with_context(&h.ctx, &step_env(), &deploy_args())
        .await
        .expect_err("deploy must fail");

    assert!(err.contains("2 rule(s) failed"));
    assert!(err.contains("rule-a"));
    assert!(err.contains("rule-c"));

    // The healthy rule between the two failures was still written.
    let puts = h.puts.lock().expect("lock");
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].0, "rule-b");
    drop(puts);

    // A failed run publishes no step output.
    assert!(emitted_output(&h.appends).is_empty());
}

#[tokio::test]
async fn dry_run_neither_puts_nor_publishes() {
    let h = harness(
        vec![rule("nightly-report")],
        HashMap::from([(
            "nightly-report".to_string(),
            vec![target("stale", DEFAULT_CLUSTER, OLD_ARN)],
        )]),
    );

    let args = DeployArgs { dry_run: true, ..deploy_args() };
    run_with_context(&h.ctx, &step_env(), &args).await.expect("deploy");

    assert!(h.puts.lock().expect("lock").is_empty());
    assert!(emitted_output(&h.appends).is_empty());
}

#[tokio::test]
async fn explicit_output_file_overrides_the_runner_provided_one() {
    let h = harness(vec![], HashMap::new());

    let args =
        DeployArgs { output_file: Some(PathBuf::from("/custom/out")), ..deploy_args() };
    run_with_context(&h.ctx, &step_env(), &args).await.expect("deploy");

    let appended = emitted_output(&h.appends);
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].0, PathBuf::from("/custom/out"));
}

#[tokio::test]
async fn a_missing_descriptor_fails_before_touching_the_scheduler() {
    let h = harness(
        vec![rule("nightly-report")],
        HashMap::from([(
            "nightly-report".to_string(),
            vec![target("stale", DEFAULT_CLUSTER, OLD_ARN)],
        )]),
    );

    let args = DeployArgs { task_definition: PathBuf::from("missing.yml"), ..deploy_args() };
    let err =
        run_with_context(&h.ctx, &step_env(), &args).await.expect_err("deploy must fail");

    assert!(err.contains("cannot parse"));
    assert!(h.puts.lock().expect("lock").is_empty());
    assert!(emitted_output(&h.appends).is_empty());
}
