//! Live adapter for the `RuleScheduler` port using Amazon EventBridge.

use aws_sdk_eventbridge::error::DisplayErrorContext;
use aws_sdk_eventbridge::types as sdk;
use aws_sdk_eventbridge::Client;

use crate::ports::scheduler::{
    AwsVpcConfiguration, DeadLetterConfig, EcsParameters, NetworkConfiguration, RetryPolicy,
    RulePage, RuleScheduler, ScheduleRule, SchedulerFuture, Target, TargetPage,
};

/// Live scheduler adapter that calls the EventBridge API.
///
/// Credentials and region come from the default provider chain of the
/// supplied SDK configuration; this adapter adds no policy of its own
/// (no retries, no timeouts beyond what the transport layer does).
pub struct EventBridgeScheduler {
    client: Client,
}

impl EventBridgeScheduler {
    /// Creates a new adapter from a loaded SDK configuration.
    #[must_use]
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self { client: Client::new(config) }
    }
}

impl RuleScheduler for EventBridgeScheduler {
    fn list_rules(
        &self,
        name_prefix: &str,
        next_token: Option<&str>,
    ) -> SchedulerFuture<'_, RulePage> {
        // The API rejects an empty NamePrefix; omitting it means "all rules".
        let name_prefix = (!name_prefix.is_empty()).then(|| name_prefix.to_string());
        let next_token = next_token.map(String::from);

        Box::pin(async move {
            let output = self
                .client
                .list_rules()
                .set_name_prefix(name_prefix)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    DisplayErrorContext(e).to_string().into()
                })?;

            let rules = output.rules().iter().filter_map(rule_from_sdk).collect();
            Ok(RulePage { rules, next_token: output.next_token().map(String::from) })
        })
    }

    fn list_targets(
        &self,
        rule: &str,
        next_token: Option<&str>,
    ) -> SchedulerFuture<'_, TargetPage> {
        let rule = rule.to_string();
        let next_token = next_token.map(String::from);

        Box::pin(async move {
            let output = self
                .client
                .list_targets_by_rule()
                .rule(&rule)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    DisplayErrorContext(e).to_string().into()
                })?;

            let targets = output.targets().iter().map(target_from_sdk).collect();
            Ok(TargetPage { targets, next_token: output.next_token().map(String::from) })
        })
    }

    fn put_targets(&self, rule: &str, targets: &[Target]) -> SchedulerFuture<'_, ()> {
        let rule = rule.to_string();
        let targets = targets.to_vec();

        Box::pin(async move {
            let sdk_targets =
                targets.iter().map(target_to_sdk).collect::<Result<Vec<_>, _>>()?;

            let output = self
                .client
                .put_targets()
                .rule(&rule)
                .set_targets(Some(sdk_targets))
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    DisplayErrorContext(e).to_string().into()
                })?;

            if output.failed_entry_count() > 0 {
                let entries = output
                    .failed_entries()
                    .iter()
                    .map(|entry| {
                        format!(
                            "{}: {}",
                            entry.target_id().unwrap_or("<unknown target>"),
                            entry.error_message().unwrap_or("no error message"),
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(format!(
                    "{} target(s) rejected by the service: {entries}",
                    output.failed_entry_count(),
                )
                .into());
            }
            Ok(())
        })
    }
}

/// Maps a listed rule into the port shape. Rules without a name cannot be
/// addressed by later calls and are skipped.
fn rule_from_sdk(rule: &sdk::Rule) -> Option<ScheduleRule> {
    Some(ScheduleRule {
        name: rule.name()?.to_string(),
        schedule_expression: rule.schedule_expression().map(String::from),
        state: rule.state().map(|state| state.as_str().to_string()),
    })
}

fn target_from_sdk(target: &sdk::Target) -> Target {
    Target {
        id: target.id().to_string(),
        arn: target.arn().to_string(),
        role_arn: target.role_arn().map(String::from),
        input: target.input().map(String::from),
        input_path: target.input_path().map(String::from),
        ecs_parameters: target.ecs_parameters().map(ecs_from_sdk),
        dead_letter_config: target
            .dead_letter_config()
            .map(|dlc| DeadLetterConfig { arn: dlc.arn().map(String::from) }),
        retry_policy: target.retry_policy().map(|policy| RetryPolicy {
            maximum_event_age_in_seconds: policy.maximum_event_age_in_seconds(),
            maximum_retry_attempts: policy.maximum_retry_attempts(),
        }),
    }
}

fn ecs_from_sdk(ecs: &sdk::EcsParameters) -> EcsParameters {
    EcsParameters {
        task_definition_arn: ecs.task_definition_arn().to_string(),
        task_count: ecs.task_count(),
        launch_type: ecs.launch_type().map(|launch| launch.as_str().to_string()),
        group: ecs.group().map(String::from),
        platform_version: ecs.platform_version().map(String::from),
        network_configuration: ecs.network_configuration().map(|net| NetworkConfiguration {
            awsvpc_configuration: net.awsvpc_configuration().map(|vpc| AwsVpcConfiguration {
                subnets: vpc.subnets().to_vec(),
                security_groups: vpc.security_groups().to_vec(),
                assign_public_ip: vpc.assign_public_ip().map(|ip| ip.as_str().to_string()),
            }),
        }),
    }
}

fn target_to_sdk(target: &Target) -> Result<sdk::Target, Box<dyn std::error::Error + Send + Sync>> {
    let ecs_parameters = target.ecs_parameters.as_ref().map(ecs_to_sdk).transpose()?;

    sdk::Target::builder()
        .id(&target.id)
        .arn(&target.arn)
        .set_role_arn(target.role_arn.clone())
        .set_input(target.input.clone())
        .set_input_path(target.input_path.clone())
        .set_ecs_parameters(ecs_parameters)
        .set_dead_letter_config(
            target
                .dead_letter_config
                .as_ref()
                .map(|dlc| sdk::DeadLetterConfig::builder().set_arn(dlc.arn.clone()).build()),
        )
        .set_retry_policy(target.retry_policy.as_ref().map(|policy| {
            sdk::RetryPolicy::builder()
                .set_maximum_event_age_in_seconds(policy.maximum_event_age_in_seconds)
                .set_maximum_retry_attempts(policy.maximum_retry_attempts)
                .build()
        }))
        .build()
        .map_err(|e| format!("target {} failed to build: {e}", target.id).into())
}

fn ecs_to_sdk(
    ecs: &EcsParameters,
) -> Result<sdk::EcsParameters, Box<dyn std::error::Error + Send + Sync>> {
    let network_configuration = ecs
        .network_configuration
        .as_ref()
        .map(|net| -> Result<sdk::NetworkConfiguration, Box<dyn std::error::Error + Send + Sync>> {
            let awsvpc = net
                .awsvpc_configuration
                .as_ref()
                .map(|vpc| {
                    sdk::AwsVpcConfiguration::builder()
                        .set_subnets(Some(vpc.subnets.clone()))
                        .set_security_groups(
                            (!vpc.security_groups.is_empty())
                                .then(|| vpc.security_groups.clone()),
                        )
                        .set_assign_public_ip(
                            vpc.assign_public_ip.as_deref().map(sdk::AssignPublicIp::from),
                        )
                        .build()
                })
                .transpose()
                .map_err(|e| format!("awsvpc configuration failed to build: {e}"))?;
            Ok(sdk::NetworkConfiguration::builder().set_awsvpc_configuration(awsvpc).build())
        })
        .transpose()?;

    sdk::EcsParameters::builder()
        .task_definition_arn(&ecs.task_definition_arn)
        .set_task_count(ecs.task_count)
        .set_launch_type(ecs.launch_type.as_deref().map(sdk::LaunchType::from))
        .set_group(ecs.group.clone())
        .set_platform_version(ecs.platform_version.clone())
        .set_network_configuration(network_configuration)
        .build()
        .map_err(|e| format!("ecs parameters failed to build: {e}").into())
}
