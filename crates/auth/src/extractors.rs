//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use taskmanager_core::auth::Claims;

use crate::{AuthError, AuthState};

/// Header carrying the raw user-pool access token.
pub const ACCESS_TOKEN_HEADER: &str = "accesstoken";

/// Header carrying the shared key of internal jobs.
pub const SERVICE_KEY_HEADER: &str = "x-lambda-header";

/// Extractor for an authenticated user. Returns 401 if the token is missing
/// or fails verification.
pub struct CurrentUser(pub Claims);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = parts
            .headers
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = auth_state.verifier.verify(token).await?;
        tracing::debug!(sub = %claims.sub, "Authenticated request");

        Ok(CurrentUser(claims))
    }
}

/// Extractor for internal callers presenting the shared service key.
pub struct ServiceCaller;

impl<S> FromRequestParts<S> for ServiceCaller
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let expected = auth_state
            .service_api_key
            .as_deref()
            .ok_or(AuthError::InvalidServiceKey)?;

        let presented = parts
            .headers
            .get(SERVICE_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        match presented {
            Some(key) if key == expected => Ok(ServiceCaller),
            _ => {
                tracing::warn!("Rejected service call with a bad key");
                Err(AuthError::InvalidServiceKey)
            }
        }
    }
}
