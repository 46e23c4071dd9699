//! Service context bundling all port trait objects.

use aws_config::BehaviorVersion;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::scheduler::EventBridgeScheduler;
use crate::ports::filesystem::FileSystem;
use crate::ports::scheduler::RuleScheduler;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Commands take the
/// context so tests can hand them fake adapters instead.
pub struct ServiceContext {
    /// Filesystem for descriptor reads and step-output writes.
    pub fs: Box<dyn FileSystem>,
    /// Rule scheduler holding the scheduled tasks to repoint.
    pub scheduler: Box<dyn RuleScheduler>,
}

impl ServiceContext {
    /// Creates a live context with real adapters.
    ///
    /// Credentials and region for the scheduler come from the default
    /// provider chain (environment, shared config, instance metadata), so
    /// the binary picks up whatever the pipeline runner provides.
    pub async fn live() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            fs: Box::new(LiveFileSystem),
            scheduler: Box::new(EventBridgeScheduler::new(&config)),
        }
    }
}
