use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskmanager_core::storage::RepositoryError;

/// A `{"message": ..., "error"?: ...}` error response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    source: Option<anyhow::Error>,
    /// Whether the cause is sent back in the `error` field.
    expose_source: bool,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
            expose_source: false,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// A failed store call reported under a fixed message. The cause is
    /// only logged.
    pub fn internal(message: impl Into<String>, err: impl Into<anyhow::Error>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            source: Some(err.into()),
            expose_source: false,
        }
    }

    /// Like [`AppError::internal`], but the cause is also returned in `error`.
    pub fn internal_with_cause(
        message: impl Into<String>,
        err: impl Into<anyhow::Error>,
    ) -> Self {
        Self {
            expose_source: true,
            ..Self::internal(message, err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self.source {
            Some(err) => {
                tracing::error!(status = %self.status, error = %err, "{}", self.message);
                if self.expose_source {
                    json!({ "message": self.message, "error": err.to_string() })
                } else {
                    json!({ "message": self.message })
                }
            }
            None => {
                tracing::warn!(status = %self.status, "{}", self.message);
                json!({ "message": self.message })
            }
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.to_string())
    }
}
