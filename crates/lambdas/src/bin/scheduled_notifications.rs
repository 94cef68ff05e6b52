use std::sync::Arc;

use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use taskmanager_lambdas::adapters::{HttpServiceClient, SesMailer};
use taskmanager_lambdas::handlers::{JobResponse, ReminderJob};
use taskmanager_lambdas::JobConfig;
use taskmanager_storage::DynamoDbRepository;

async fn handle_request(
    job: &ReminderJob,
    _event: LambdaEvent<Value>,
) -> Result<JobResponse, Error> {
    Ok(job.run(Utc::now()).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    taskmanager_lambdas::init_tracing();

    let config = JobConfig::from_env();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let repo = Arc::new(DynamoDbRepository::from_env().await?);

    let job = ReminderJob {
        tasks: repo.clone(),
        users: repo,
        mailer: Arc::new(SesMailer::new(
            aws_sdk_sesv2::Client::new(&aws_config),
            config.ses_source_email.clone(),
        )),
        services: Arc::new(HttpServiceClient::new(config.service_api_key.clone())),
        config,
    };
    let job = &job;

    lambda_runtime::run(service_fn(move |event| handle_request(job, event))).await
}
