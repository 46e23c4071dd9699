//! The one mutation this tool performs on a target.

use crate::ports::scheduler::Target;

/// Returns a copy of the target pointing at the new task-definition ARN.
///
/// Targets are written back whole, so everything except
/// `ecs_parameters.task_definition_arn` must carry over exactly as the
/// listing returned it.
#[must_use]
pub fn repoint(target: &Target, new_arn: &str) -> Target {
    let mut updated = target.clone();
    if let Some(ecs) = updated.ecs_parameters.as_mut() {
        ecs.task_definition_arn = new_arn.to_string();
    }
    updated
}
