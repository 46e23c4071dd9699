//! Deployment pipeline: find scheduled targets on a stale task-definition
//! revision and repoint them at the new one.

mod engine;
mod filter;
mod update;

pub use engine::{execute, format_report, DeployPlan, DeployReport, RuleOutcome};
