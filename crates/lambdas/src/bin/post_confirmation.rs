use std::sync::Arc;

use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use taskmanager_core::storage::UserRepository;
use taskmanager_lambdas::handlers::handle_post_confirmation;
use taskmanager_storage::DynamoDbRepository;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    taskmanager_lambdas::init_tracing();

    // Without a table the handler still answers, and rejects confirmations
    let users: Option<Arc<dyn UserRepository>> = match std::env::var("DYNAMODB_TABLE_NAME") {
        Ok(_) => Some(Arc::new(DynamoDbRepository::from_env().await?)),
        Err(_) => {
            tracing::warn!("DYNAMODB_TABLE_NAME is not set");
            None
        }
    };

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        let users = users.clone();
        async move {
            let output =
                handle_post_confirmation(event.payload, users.as_deref(), Utc::now()).await?;
            Ok::<Value, Error>(output)
        }
    }))
    .await
}
