//! `retask arn` command.

use std::path::Path;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::commands::StepEnv;
use crate::ports::FileSystem;
use crate::taskdef;

/// Execute the `arn` command: parse a descriptor and print its ARN.
///
/// # Errors
///
/// Returns an error string if the descriptor cannot be read or parsed, or
/// carries no ARN.
pub fn run(step_env: &StepEnv, task_definition: &Path) -> Result<(), String> {
    run_with_fs(&LiveFileSystem, step_env, task_definition)
}

/// Execute the `arn` command with the given filesystem.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_with_fs(
    fs: &dyn FileSystem,
    step_env: &StepEnv,
    task_definition: &Path,
) -> Result<(), String> {
    let arn = taskdef::extract_arn(fs, &step_env.workspace, task_definition)
        .map_err(|e| e.to_string())?;
    println!("{arn}");
    Ok(())
}
