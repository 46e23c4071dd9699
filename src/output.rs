//! Step outputs for the surrounding pipeline.
//!
//! The pipeline runner hands each step a shared output file; a step
//! publishes values by appending `name=value` lines to it. Without a
//! configured file the value goes to stdout so the command stays usable
//! by hand.

use std::path::Path;

use crate::ports::FileSystem;

/// Name under which the new task-definition ARN is published.
pub const TASK_DEFINITION_ARN_OUTPUT: &str = "task-definition-arn";

/// Publishes the new task-definition ARN as a step output.
///
/// # Errors
///
/// Returns an error string if appending to the output file fails.
pub fn emit_task_definition_arn(
    fs: &dyn FileSystem,
    output_file: Option<&Path>,
    arn: &str,
) -> Result<(), String> {
    match output_file {
        Some(path) => fs
            .append(path, &format!("{TASK_DEFINITION_ARN_OUTPUT}={arn}\n"))
            .map_err(|e| format!("Failed to write step output to {}: {e}", path.display())),
        None => {
            println!("{TASK_DEFINITION_ARN_OUTPUT}={arn}");
            Ok(())
        }
    }
}
