//! Command dispatch and handlers.

pub mod arn;
pub mod deploy;

use std::env;
use std::path::PathBuf;

use crate::cli::{Cli, Command};

/// Values resolved from the process environment, once, at dispatch.
///
/// Everything below the command layer receives these as explicit
/// parameters; no component consults the environment on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEnv {
    /// Root for resolving relative descriptor paths.
    pub workspace: PathBuf,
    /// Shared step-output file the pipeline runner provides, if any.
    pub output_file: Option<PathBuf>,
}

impl StepEnv {
    /// Resolves the step environment: explicit flag, then the runner's
    /// `GITHUB_WORKSPACE`, then the current directory. The output file
    /// comes from `GITHUB_OUTPUT` when set.
    #[must_use]
    pub fn resolve(workspace_flag: Option<PathBuf>) -> Self {
        let workspace = workspace_flag
            .or_else(|| env_path("GITHUB_WORKSPACE"))
            .unwrap_or_else(|| PathBuf::from("."));
        Self { workspace, output_file: env_path("GITHUB_OUTPUT") }
    }
}

/// Reads an environment variable as a path, treating empty as unset.
fn env_path(name: &str) -> Option<PathBuf> {
    env::var_os(name).filter(|value| !value.is_empty()).map(PathBuf::from)
}

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), String> {
    let step_env = StepEnv::resolve(cli.workspace);
    match cli.command {
        Command::Deploy {
            task_definition,
            cluster,
            rule_prefix,
            dry_run,
            max_concurrency,
            output_file,
        } => deploy::run(
            &step_env,
            &deploy::DeployArgs {
                task_definition,
                cluster,
                rule_prefix,
                dry_run,
                max_concurrency,
                output_file,
            },
        ),
        Command::Arn { task_definition } => arn::run(&step_env, &task_definition),
    }
}
