//! Error taxonomy for a deploy run.

use std::path::PathBuf;

/// Errors that abort a deploy run.
///
/// Every variant is fatal: nothing is retried or recovered locally. A
/// failure inside one rule's processing unit is carried in the run report
/// instead, so sibling rules still finish before the run is marked failed.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The task definition descriptor could not be read or parsed.
    #[error("cannot parse task definition {}: {reason}", path.display())]
    Parse {
        /// Path of the offending descriptor file.
        path: PathBuf,
        /// What the reader or parser reported.
        reason: String,
    },

    /// The descriptor parsed, but carries no task definition ARN.
    #[error("task definition {} is missing the taskDefinitionArn field", path.display())]
    MissingField {
        /// Path of the descriptor file.
        path: PathBuf,
    },

    /// A call against the scheduling service failed.
    #[error("scheduler call {call} failed: {reason}")]
    Service {
        /// Which call failed, e.g. `list-rules` or `put-targets(nightly)`.
        call: String,
        /// What the service or transport reported.
        reason: String,
    },
}

impl DeployError {
    /// Wraps a port-level error into a [`DeployError::Service`].
    pub(crate) fn service(
        call: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Service { call: call.into(), reason: source.to_string() }
    }
}
