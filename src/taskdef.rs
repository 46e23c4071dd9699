//! Task-definition descriptor parsing and ARN extraction.
//!
//! A descriptor is the response of a task-definition registration call
//! saved to disk by an earlier pipeline step, as JSON or YAML. The only
//! value this step needs from it is the canonical ARN of the freshly
//! registered revision.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::arn;
use crate::error::DeployError;
use crate::ports::FileSystem;

/// The two accepted descriptor shapes: the ARN at the top level, or the
/// whole registration response with the ARN nested under `taskDefinition`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Descriptor {
    #[serde(default)]
    task_definition_arn: Option<String>,
    #[serde(default)]
    task_definition: Option<RegisteredTaskDefinition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisteredTaskDefinition {
    #[serde(default)]
    task_definition_arn: Option<String>,
}

/// Resolves a descriptor path against the workspace root.
///
/// Absolute paths are used as given; relative paths are joined onto the
/// workspace root the caller resolved at startup.
#[must_use]
pub fn resolve_path(workspace: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    }
}

/// Reads a descriptor file and extracts the new task-definition ARN.
///
/// Files ending in `.json` parse as JSON; everything else parses as YAML.
/// An ARN without a task-definition family segment is accepted with a
/// warning, since no scheduled target can ever match it.
///
/// # Errors
///
/// Returns [`DeployError::Parse`] if the file cannot be read or parsed,
/// and [`DeployError::MissingField`] if neither accepted position carries
/// the ARN.
pub fn extract_arn(
    fs: &dyn FileSystem,
    workspace: &Path,
    path: &Path,
) -> Result<String, DeployError> {
    let resolved = resolve_path(workspace, path);
    let contents = fs.read_to_string(&resolved).map_err(|e| DeployError::Parse {
        path: resolved.clone(),
        reason: e.to_string(),
    })?;
    let descriptor = parse_descriptor(&resolved, &contents)?;

    let new_arn = descriptor
        .task_definition_arn
        .or_else(|| descriptor.task_definition.and_then(|td| td.task_definition_arn))
        .ok_or(DeployError::MissingField { path: resolved })?;

    if arn::task_definition_family(&new_arn).is_none() {
        warn!(arn = %new_arn, "descriptor ARN has no task-definition family segment; no target will match it");
    }
    Ok(new_arn)
}

fn parse_descriptor(path: &Path, contents: &str) -> Result<Descriptor, DeployError> {
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed: Result<Descriptor, String> = if is_json {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(contents).map_err(|e| e.to_string())
    };
    parsed.map_err(|reason| DeployError::Parse { path: path.to_path_buf(), reason })
}
