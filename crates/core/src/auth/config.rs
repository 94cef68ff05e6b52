use std::time::Duration;

use super::{AuthError, TokenUse};

/// Tokens older than this are rejected unless configured otherwise.
pub const DEFAULT_TOKEN_EXPIRATION: Duration = Duration::from_secs(3600);

/// Settings for verifying tokens issued by one user pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    pub region: String,
    pub user_pool_id: String,
    pub token_use: TokenUse,
    pub token_expiration: Duration,
}

impl VerifierConfig {
    /// Validates the settings in order: region, pool id, token use.
    pub fn new(
        region: &str,
        user_pool_id: &str,
        token_use: &str,
        token_expiration: Option<Duration>,
    ) -> Result<Self, AuthError> {
        if region.trim().is_empty() {
            return Err(AuthError::InvalidConfig(
                "AWS region not specified".to_string(),
            ));
        }
        if user_pool_id.trim().is_empty() {
            return Err(AuthError::InvalidConfig(
                "Cognito user pool id not specified".to_string(),
            ));
        }
        if token_use.trim().is_empty() {
            return Err(AuthError::InvalidConfig(
                "token use not specified, expected 'access' or 'id'".to_string(),
            ));
        }
        let token_use = token_use.parse::<TokenUse>().map_err(|_| {
            AuthError::InvalidConfig(format!(
                "unsupported token use '{token_use}', expected 'access' or 'id'"
            ))
        })?;

        Ok(Self {
            region: region.to_string(),
            user_pool_id: user_pool_id.to_string(),
            token_use,
            token_expiration: token_expiration.unwrap_or(DEFAULT_TOKEN_EXPIRATION),
        })
    }

    /// The `iss` every accepted token must carry.
    pub fn issuer(&self) -> String {
        format!(
            "https://cognito-idp.{}.amazonaws.com/{}",
            self.region, self.user_pool_id
        )
    }

    /// Where the pool publishes its signing keys.
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer())
    }
}
