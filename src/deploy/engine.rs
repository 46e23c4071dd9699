//! Orchestration of a deploy run.
//!
//! Idempotent: a second run with the same descriptor finds every target
//! already pointing at the new ARN and changes nothing. Rules are
//! enumerated up front (following pagination), then processed as
//! independent units under a bounded unordered buffer. Every unit runs to
//! completion; failures are collected into the report instead of
//! cancelling siblings.

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::deploy::{filter, update};
use crate::error::DeployError;
use crate::ports::scheduler::{RuleScheduler, ScheduleRule, Target};

/// Settings for one deploy run.
#[derive(Debug, Clone)]
pub struct DeployPlan {
    /// Canonical ARN of the freshly registered task-definition revision.
    pub new_arn: String,
    /// Cluster whose scheduled tasks are in scope, as a name or full ARN.
    pub cluster: String,
    /// Rule name prefix to scan; empty matches every rule.
    pub rule_prefix: String,
    /// Upper bound on concurrently processed rules.
    pub max_concurrency: usize,
    /// Compute and report the plan without writing any target back.
    pub dry_run: bool,
}

/// What the run did (or would do, in dry-run mode) for a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Stale targets were repointed and written back.
    Updated {
        /// The rule name.
        rule: String,
        /// Ids of the targets that were repointed.
        target_ids: Vec<String>,
    },
    /// No target on this rule needed a change.
    Unchanged {
        /// The rule name.
        rule: String,
    },
    /// Listing or writing this rule's targets failed.
    Failed {
        /// The rule name.
        rule: String,
        /// The failure, already rendered for the report.
        error: String,
    },
}

impl RuleOutcome {
    /// The name of the rule this outcome belongs to.
    #[must_use]
    pub fn rule(&self) -> &str {
        match self {
            Self::Updated { rule, .. } | Self::Unchanged { rule } | Self::Failed { rule, .. } => {
                rule
            }
        }
    }
}

/// Collected outcomes of a full run, sorted by rule name.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeployReport {
    /// One outcome per enumerated rule.
    pub outcomes: Vec<RuleOutcome>,
    /// Whether the run was a dry run.
    pub dry_run: bool,
}

impl DeployReport {
    /// Number of rules whose targets were (or would be) repointed.
    #[must_use]
    pub fn updated_rules(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, RuleOutcome::Updated { .. })).count()
    }

    /// Every failed rule with its rendered error, in rule-name order.
    #[must_use]
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                RuleOutcome::Failed { rule, error } => Some((rule.as_str(), error.as_str())),
                _ => None,
            })
            .collect()
    }
}

/// Enumerates every rule whose name starts with the prefix, following
/// continuation tokens until the listing is exhausted.
///
/// An empty prefix matches all rules; an empty result set is not an error.
///
/// # Errors
///
/// Returns [`DeployError::Service`] if any listing page fails.
pub async fn list_rules(
    scheduler: &dyn RuleScheduler,
    prefix: &str,
) -> Result<Vec<ScheduleRule>, DeployError> {
    let mut rules = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = scheduler
            .list_rules(prefix, token.as_deref())
            .await
            .map_err(|e| DeployError::service("list-rules", e))?;
        rules.extend(page.rules);
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok(rules)
}

/// Runs the full deploy: enumerate rules, process each under the
/// concurrency bound, and collect every outcome.
///
/// Rule units are independent; none is cancelled when a sibling fails, and
/// the report carries every failure, not just the first. Outcomes are
/// sorted by rule name so reports are stable regardless of completion
/// order.
///
/// # Errors
///
/// Returns [`DeployError::Service`] only when rule enumeration itself
/// fails, before any unit starts. Per-rule failures are reported as
/// [`RuleOutcome::Failed`] entries instead.
pub async fn execute(
    scheduler: &dyn RuleScheduler,
    plan: &DeployPlan,
) -> Result<DeployReport, DeployError> {
    let rules = list_rules(scheduler, &plan.rule_prefix).await?;
    debug!(count = rules.len(), prefix = %plan.rule_prefix, "enumerated rules");

    let concurrency = plan.max_concurrency.max(1);
    let mut outcomes: Vec<RuleOutcome> = stream::iter(rules.iter())
        .map(|rule| process_rule(scheduler, rule, plan))
        .buffer_unordered(concurrency)
        .collect()
        .await;
    outcomes.sort_by(|a, b| a.rule().cmp(b.rule()));

    Ok(DeployReport { outcomes, dry_run: plan.dry_run })
}

/// Processes one rule: list its targets (following pagination), filter to
/// the stale ones in the cluster, and write the repointed copies back in a
/// single batched put.
async fn process_rule(
    scheduler: &dyn RuleScheduler,
    rule: &ScheduleRule,
    plan: &DeployPlan,
) -> RuleOutcome {
    match try_process_rule(scheduler, rule, plan).await {
        Ok(outcome) => outcome,
        Err(e) => RuleOutcome::Failed { rule: rule.name.clone(), error: e.to_string() },
    }
}

async fn try_process_rule(
    scheduler: &dyn RuleScheduler,
    rule: &ScheduleRule,
    plan: &DeployPlan,
) -> Result<RuleOutcome, DeployError> {
    debug!(
        rule = %rule.name,
        schedule = rule.schedule_expression.as_deref().unwrap_or("<none>"),
        state = rule.state.as_deref().unwrap_or("<unknown>"),
        "processing rule"
    );

    let mut targets = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = scheduler
            .list_targets(&rule.name, token.as_deref())
            .await
            .map_err(|e| DeployError::service("list-targets", e))?;
        targets.extend(page.targets);
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    let stale =
        filter::stale_targets(filter::cluster_targets(targets, &plan.cluster), &plan.new_arn);
    if stale.is_empty() {
        debug!(rule = %rule.name, "no stale targets");
        return Ok(RuleOutcome::Unchanged { rule: rule.name.clone() });
    }

    let updated: Vec<Target> =
        stale.iter().map(|target| update::repoint(target, &plan.new_arn)).collect();
    let target_ids: Vec<String> = updated.iter().map(|target| target.id.clone()).collect();

    if plan.dry_run {
        info!(rule = %rule.name, targets = ?target_ids, "dry run, skipping put");
    } else {
        scheduler
            .put_targets(&rule.name, &updated)
            .await
            .map_err(|e| DeployError::service("put-targets", e))?;
        info!(rule = %rule.name, targets = ?target_ids, "repointed targets");
    }
    Ok(RuleOutcome::Updated { rule: rule.name.clone(), target_ids })
}

/// Formats a deploy report as a human-readable summary, one line per rule.
#[must_use]
pub fn format_report(report: &DeployReport) -> String {
    if report.outcomes.is_empty() {
        return "No rules matched the prefix.".to_string();
    }

    let mut lines = Vec::new();
    for outcome in &report.outcomes {
        match outcome {
            RuleOutcome::Updated { rule, target_ids } => {
                let verb = if report.dry_run { "WOULD UPDATE" } else { "UPDATED" };
                lines.push(format!("  {verb} {rule}: {}", target_ids.join(", ")));
            }
            RuleOutcome::Unchanged { rule } => {
                lines.push(format!("  UNCHANGED {rule}"));
            }
            RuleOutcome::Failed { rule, error } => {
                lines.push(format!("  FAILED {rule}: {error}"));
            }
        }
    }
    lines.join("\n")
}
