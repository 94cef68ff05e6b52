use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use taskmanager_core::task::GraphQLError;

use crate::LambdaError;

/// Header carrying the task service's shared key.
const SERVICE_KEY_HEADER: &str = "x-lambda-header";

/// Calls into the task manager's service routes.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// Records a notification for `user_id` (a full `USER#` key).
    async fn create_notification(
        &self,
        url: &str,
        user_id: &str,
        task_id: &str,
    ) -> Result<(), LambdaError>;

    /// Flags the task's reminder as sent.
    async fn mark_notification_sent(
        &self,
        url: &str,
        user_id: &str,
        task_id: &str,
    ) -> Result<(), LambdaError>;
}

/// [`ServiceClient`] over HTTP.
pub struct HttpServiceClient {
    http: reqwest::Client,
    service_api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

impl HttpServiceClient {
    pub fn new(service_api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            service_api_key,
        }
    }

    async fn post(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
        user_id: &str,
        task_id: &str,
    ) -> Result<(), LambdaError> {
        let response = request
            .json(&json!({ "userId": user_id, "taskId": task_id }))
            .send()
            .await
            .map_err(|e| LambdaError::Service(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) if !body.errors.is_empty() => {
                for error in &body.errors {
                    tracing::warn!(key = %error.key, error = %error.error, %url, "Service reported an error");
                }
            }
            _ => tracing::warn!(%status, response = %text, %url, "Service call failed"),
        }

        Err(LambdaError::Service(format!("{url} returned {status}")))
    }
}

#[async_trait]
impl ServiceClient for HttpServiceClient {
    async fn create_notification(
        &self,
        url: &str,
        user_id: &str,
        task_id: &str,
    ) -> Result<(), LambdaError> {
        tracing::info!(%user_id, %task_id, "Creating notification");
        self.post(self.http.post(url), url, user_id, task_id).await
    }

    async fn mark_notification_sent(
        &self,
        url: &str,
        user_id: &str,
        task_id: &str,
    ) -> Result<(), LambdaError> {
        tracing::info!(%user_id, %task_id, "Marking task notification as sent");
        let mut request = self.http.post(url);
        if let Some(key) = &self.service_api_key {
            request = request.header(SERVICE_KEY_HEADER, key);
        }
        self.post(request, url, user_id, task_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::Value;

    use super::*;

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Serves `/ok` and `/fail`, recording each call's key header and body.
    async fn serve() -> (String, Seen) {
        let seen: Seen = Arc::default();
        let record = |seen: Seen| {
            move |headers: HeaderMap, Json(body): Json<Value>| {
                let seen = seen.clone();
                async move {
                    let key = headers
                        .get(SERVICE_KEY_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    seen.lock().unwrap().push((key, body));
                }
            }
        };
        let app = Router::new()
            .route("/ok", post(record(seen.clone())))
            .route(
                "/fail",
                post(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "errors": [{ "key": "CreateError", "error": "boom" }]
                        })),
                    )
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), seen)
    }

    #[tokio::test]
    async fn test_create_notification_posts_ids() {
        let (base, seen) = serve().await;
        let client = HttpServiceClient::new(Some("secret".to_string()));

        client
            .create_notification(&format!("{base}/ok"), "USER#alice", "TASK#1")
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, None);
        assert_eq!(seen[0].1, json!({ "userId": "USER#alice", "taskId": "TASK#1" }));
    }

    #[tokio::test]
    async fn test_mark_sent_carries_service_key() {
        let (base, seen) = serve().await;
        let client = HttpServiceClient::new(Some("secret".to_string()));

        client
            .mark_notification_sent(&format!("{base}/ok"), "USER#alice", "TASK#1")
            .await
            .unwrap();

        assert_eq!(seen.lock().unwrap()[0].0.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let (base, _) = serve().await;
        let client = HttpServiceClient::new(None);

        let err = client
            .create_notification(&format!("{base}/fail"), "USER#alice", "TASK#1")
            .await
            .unwrap_err();
        assert!(matches!(err, LambdaError::Service(msg) if msg.contains("500")));
    }
}
