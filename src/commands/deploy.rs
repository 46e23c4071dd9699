//! `retask deploy` command.

use std::path::PathBuf;

use tokio::runtime::Builder;

use crate::commands::StepEnv;
use crate::context::ServiceContext;
use crate::deploy::{self, DeployPlan};
use crate::output;
use crate::taskdef;

/// Arguments for the deploy command, straight from the CLI.
#[derive(Debug, Clone)]
pub struct DeployArgs {
    /// Task-definition descriptor file, absolute or workspace-relative.
    pub task_definition: PathBuf,
    /// Cluster whose scheduled tasks are in scope, as a name or full ARN.
    pub cluster: String,
    /// Rule name prefix to scan; empty matches every rule.
    pub rule_prefix: String,
    /// Compute and print the plan without writing anything back.
    pub dry_run: bool,
    /// Upper bound on concurrently processed rules.
    pub max_concurrency: usize,
    /// Explicit step-output file, overriding the runner-provided one.
    pub output_file: Option<PathBuf>,
}

/// Execute the `deploy` command against the live scheduler.
///
/// # Errors
///
/// Returns an error string if the descriptor cannot be read, rule
/// enumeration fails, or any rule unit fails. Per-rule failures are all
/// listed; siblings of a failed rule still complete first.
pub fn run(step_env: &StepEnv, args: &DeployArgs) -> Result<(), String> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    runtime.block_on(async {
        let ctx = ServiceContext::live().await;
        run_with_context(&ctx, step_env, args).await
    })
}

/// Execute the `deploy` command with the given service context.
///
/// # Errors
///
/// Same as [`run`].
pub async fn run_with_context(
    ctx: &ServiceContext,
    step_env: &StepEnv,
    args: &DeployArgs,
) -> Result<(), String> {
    let new_arn =
        taskdef::extract_arn(ctx.fs.as_ref(), &step_env.workspace, &args.task_definition)
            .map_err(|e| e.to_string())?;

    let plan = DeployPlan {
        new_arn: new_arn.clone(),
        cluster: args.cluster.clone(),
        rule_prefix: args.rule_prefix.clone(),
        max_concurrency: args.max_concurrency,
        dry_run: args.dry_run,
    };
    let report =
        deploy::execute(ctx.scheduler.as_ref(), &plan).await.map_err(|e| e.to_string())?;

    if args.dry_run {
        println!("Dry run, planned changes:");
    } else {
        println!("Deploy report:");
    }
    println!("{}", deploy::format_report(&report));
    let verb = if args.dry_run { "would be repointed" } else { "repointed" };
    println!("\n{} rule(s) {verb}.", report.updated_rules());

    let failures = report.failures();
    if !failures.is_empty() {
        let lines: Vec<String> =
            failures.iter().map(|(rule, error)| format!("{rule}: {error}")).collect();
        return Err(format!("{} rule(s) failed:\n  {}", failures.len(), lines.join("\n  ")));
    }

    // The step output is only published for a real, fully successful run;
    // a dry run must leave the shared output file untouched.
    if !args.dry_run {
        let output_file = args.output_file.as_deref().or(step_env.output_file.as_deref());
        output::emit_task_definition_arn(ctx.fs.as_ref(), output_file, &new_arn)?;
    }
    Ok(())
}
