use std::env;

use crate::LambdaError;

/// Settings of the reminder job.
///
/// Nothing here is validated up front; the job reports what is missing when
/// it runs so the failure shows up in its result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobConfig {
    /// `NOTIFICATION_MICROSERVICE_API_URL`
    pub notification_api_url: Option<String>,
    /// `TASK_MICROSERVICE_API_URL`
    pub task_api_url: Option<String>,
    /// `LAMBDA_TASKSERVICE_API_KEY`, sent as `x-lambda-header`
    pub service_api_key: Option<String>,
    /// `SES_SOURCE_EMAIL`, the sender of reminder emails
    pub ses_source_email: Option<String>,
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl JobConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        Self {
            notification_api_url: non_empty("NOTIFICATION_MICROSERVICE_API_URL"),
            task_api_url: non_empty("TASK_MICROSERVICE_API_URL"),
            service_api_key: non_empty("LAMBDA_TASKSERVICE_API_KEY"),
            ses_source_email: non_empty("SES_SOURCE_EMAIL"),
        }
    }

    pub fn notification_api_url(&self) -> Result<&str, LambdaError> {
        self.notification_api_url
            .as_deref()
            .ok_or(LambdaError::MissingConfig("NOTIFICATION_MICROSERVICE_API_URL"))
    }

    pub fn task_api_url(&self) -> Result<&str, LambdaError> {
        self.task_api_url
            .as_deref()
            .ok_or(LambdaError::MissingConfig("TASK_MICROSERVICE_API_URL"))
    }
}
