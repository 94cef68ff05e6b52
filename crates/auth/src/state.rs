//! Application state for auth.

use std::sync::Arc;

use axum::extract::FromRef;
use taskmanager_core::auth::TokenVerifier;

use crate::config::AuthConfig;
use crate::verifier::CognitoVerifier;

/// Shared state for the auth extractors.
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
    /// Key expected in `x-lambda-header`. Service routes reject every caller
    /// when unset.
    pub service_api_key: Option<String>,
}

impl AuthState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, service_api_key: Option<String>) -> Self {
        Self {
            verifier,
            service_api_key,
        }
    }

    /// Creates state backed by the user pool named in `config`.
    pub fn from_config(config: AuthConfig) -> Self {
        let verifier = CognitoVerifier::new(config.verifier);
        Self::new(Arc::new(verifier), config.service_api_key)
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
