use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Auth errors for the taskmanager_auth crate.
///
/// This wraps the core `AuthError` and adds the request-level failures that
/// happen before a token ever reaches the verifier.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from token verification.
    #[error(transparent)]
    Core(#[from] taskmanager_core::auth::AuthError),

    /// No usable token on the request.
    #[error("missing access token")]
    MissingToken,

    /// A service route was called without the shared key.
    #[error("invalid service key")]
    InvalidServiceKey,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use taskmanager_core::auth::AuthError as CoreError;

        let body = match &self {
            AuthError::MissingToken => json!({ "message": "Unauthorized: Invalid Token" }),
            AuthError::InvalidServiceKey => json!({ "message": "Unauthorized" }),
            AuthError::Core(core_err) => {
                match core_err {
                    CoreError::InvalidConfig(_) | CoreError::KeySetUnavailable(_) => {
                        tracing::error!(error = %core_err, "Token verification unavailable");
                    }
                    _ => tracing::debug!(error = %core_err, "Rejected access token"),
                }
                json!({
                    "message": "Unauthorized: Invalid token",
                    "error": core_err.to_string(),
                })
            }
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
