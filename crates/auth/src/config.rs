use std::time::Duration;

use taskmanager_core::auth::{AuthError, TokenUse, VerifierConfig};

/// Complete auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub verifier: VerifierConfig,
    /// Shared secret internal jobs present in `x-lambda-header`.
    pub service_api_key: Option<String>,
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AWS_REGION`: Region of the user pool
    /// - `AWS_COGNITO_USER_POOL_ID`: User pool id
    /// - `AWS_COGNITO_TOKEN_EXPIRATION`: Max token age in milliseconds (default: one hour)
    /// - `LAMBDA_TASKSERVICE_API_KEY`: Key accepted on service routes (optional)
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the region or pool id is missing, or the
    /// expiration is not a whole number of milliseconds.
    pub fn from_env() -> Result<Self, AuthError> {
        let region = std::env::var("AWS_REGION").unwrap_or_default();
        let user_pool_id = std::env::var("AWS_COGNITO_USER_POOL_ID").unwrap_or_default();
        let expiration = std::env::var("AWS_COGNITO_TOKEN_EXPIRATION").ok();
        let service_api_key = std::env::var("LAMBDA_TASKSERVICE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        Ok(Self {
            verifier: Self::verifier_config(&region, &user_pool_id, expiration.as_deref())?,
            service_api_key,
        })
    }

    /// Build the verifier settings. Every service accepts access tokens only.
    pub fn verifier_config(
        region: &str,
        user_pool_id: &str,
        expiration_ms: Option<&str>,
    ) -> Result<VerifierConfig, AuthError> {
        let token_expiration = expiration_ms
            .map(|ms| {
                ms.trim().parse::<u64>().map_err(|_| {
                    AuthError::InvalidConfig(format!(
                        "AWS_COGNITO_TOKEN_EXPIRATION must be milliseconds, got {ms:?}"
                    ))
                })
            })
            .transpose()?
            .map(Duration::from_millis);

        VerifierConfig::new(
            region,
            user_pool_id,
            TokenUse::Access.as_str(),
            token_expiration,
        )
    }
}
