//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (filesystem, scheduling service). Implementations live
//! in `src/adapters/`.

pub mod filesystem;
pub mod scheduler;

pub use filesystem::FileSystem;
pub use scheduler::{
    AwsVpcConfiguration, DeadLetterConfig, EcsParameters, NetworkConfiguration, RetryPolicy,
    RulePage, RuleScheduler, ScheduleRule, SchedulerFuture, Target, TargetPage,
};
