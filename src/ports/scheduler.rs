//! Scheduling-service port: rule listing, target listing, target upserts.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`RuleScheduler`] to keep the trait
/// dyn-compatible.
pub type SchedulerFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// A scheduled trigger rule, as returned by the listing call.
///
/// Only `name` participates in any decision; the other fields ride along
/// for log lines and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRule {
    /// Unique rule name within the event bus.
    pub name: String,
    /// Schedule expression, e.g. `rate(1 day)` or `cron(0 4 * * ? *)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_expression: Option<String>,
    /// Rule state as reported by the service (`ENABLED` / `DISABLED`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// One page of a rule listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePage {
    /// Rules on this page. Empty means "no rules", never an error.
    pub rules: Vec<ScheduleRule>,
    /// Continuation token; `None` on the last page.
    pub next_token: Option<String>,
}

/// One page of a target listing for a single rule.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPage {
    /// Targets on this page, in service order.
    pub targets: Vec<Target>,
    /// Continuation token; `None` on the last page.
    pub next_token: Option<String>,
}

/// A dispatch directive attached to a rule.
///
/// Everything except `ecs_parameters.task_definition_arn` is opaque
/// pass-through: the updater clones the whole record and replaces that
/// one field, so unmodified fields survive a write-back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Target id, unique within its rule; assigned by whoever created it.
    pub id: String,
    /// Destination resource, a cluster ARN for scheduled container tasks.
    pub arn: String,
    /// Role assumed to dispatch the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    /// Literal input payload handed to the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// JSONPath into the event, mutually exclusive with `input`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_path: Option<String>,
    /// Execution parameters for container-task targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecs_parameters: Option<EcsParameters>,
    /// Where undeliverable events go.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead_letter_config: Option<DeadLetterConfig>,
    /// Service-side retry settings for failed dispatches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,
}

/// Execution parameters of a scheduled container task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcsParameters {
    /// The task definition revision this target launches. The only field
    /// a deploy run ever rewrites.
    pub task_definition_arn: String,
    /// How many tasks to launch per firing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_count: Option<i32>,
    /// Launch type (`FARGATE` / `EC2` / `EXTERNAL`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_type: Option<String>,
    /// Task group name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Platform version for Fargate tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    /// Networking for awsvpc-mode tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_configuration: Option<NetworkConfiguration>,
}

/// Network configuration wrapper for awsvpc-mode tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfiguration {
    /// The awsvpc block; the only variant the service defines today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awsvpc_configuration: Option<AwsVpcConfiguration>,
}

/// Subnet and security-group placement for an awsvpc-mode task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsVpcConfiguration {
    /// Subnets the task may be placed in.
    pub subnets: Vec<String>,
    /// Security groups attached to the task ENI.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_groups: Vec<String>,
    /// `ENABLED` / `DISABLED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assign_public_ip: Option<String>,
}

/// Dead-letter destination for undeliverable events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetterConfig {
    /// Queue ARN receiving dead-lettered events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
}

/// Service-side retry settings for failed dispatches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Maximum age of an event before it is dropped, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_event_age_in_seconds: Option<i32>,
    /// Maximum number of retry attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_retry_attempts: Option<i32>,
}

/// Lists and rewrites scheduled trigger rules on an external scheduling
/// service.
///
/// All three calls are page- or batch-oriented the way the backing
/// service is: listing follows continuation tokens, and a put upserts a
/// whole batch of targets for one rule in a single call.
pub trait RuleScheduler: Send + Sync {
    /// Lists one page of rules whose name starts with `name_prefix`.
    ///
    /// An empty prefix matches every rule. An empty result list means "no
    /// rules", not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing call fails (auth, throttling,
    /// transport).
    fn list_rules(
        &self,
        name_prefix: &str,
        next_token: Option<&str>,
    ) -> SchedulerFuture<'_, RulePage>;

    /// Lists one page of the targets attached to `rule`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing call fails.
    fn list_targets(
        &self,
        rule: &str,
        next_token: Option<&str>,
    ) -> SchedulerFuture<'_, TargetPage>;

    /// Upserts `targets` on `rule` in one batched call.
    ///
    /// Each target is written whole; targets not in the batch are left
    /// untouched by the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the service reports failed
    /// entries.
    fn put_targets(&self, rule: &str, targets: &[Target]) -> SchedulerFuture<'_, ()>;
}
