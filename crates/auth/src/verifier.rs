//! Verification of user-pool access tokens.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use taskmanager_core::auth::{
    check_max_age, check_origin, AuthError, Claims, Result, TokenVerifier, VerifierConfig,
};
use tokio::sync::OnceCell;

use crate::jwks::{decoding_keys, fetch_jwks, JwkSet};

/// Verifies tokens against the signing keys a user pool publishes.
///
/// Keys are fetched on first use and cached for the life of the verifier.
/// Concurrent first callers share a single fetch; a failed fetch is retried
/// by the next caller.
pub struct CognitoVerifier {
    config: VerifierConfig,
    jwks_url: String,
    http: reqwest::Client,
    keys: OnceCell<HashMap<String, DecodingKey>>,
}

impl CognitoVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        let jwks_url = config.jwks_url();
        Self {
            config,
            jwks_url,
            http: reqwest::Client::new(),
            keys: OnceCell::new(),
        }
    }

    /// Builds a verifier from an already fetched key set.
    pub fn with_keys(config: VerifierConfig, jwks: &JwkSet) -> Result<Self> {
        let keys = decoding_keys(jwks)?;
        let mut verifier = Self::new(config);
        verifier.keys = OnceCell::from(keys);
        Ok(verifier)
    }

    /// Fetch keys from somewhere other than the pool's public endpoint,
    /// e.g. a local user-pool emulator.
    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    async fn keys(&self) -> Result<&HashMap<String, DecodingKey>> {
        self.keys
            .get_or_try_init(|| async {
                tracing::info!(url = %self.jwks_url, "Fetching user pool signing keys");
                let set = fetch_jwks(&self.http, &self.jwks_url).await?;
                decoding_keys(&set)
            })
            .await
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.config.issuer()]);
        validation.validate_aud = false;
        validation.leeway = 0;
        validation
    }
}

/// Reads a token's payload without checking its signature.
fn peek_claims(token: &str) -> Result<Claims> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(AuthError::MalformedToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::MalformedToken(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedToken(e.to_string()))
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidIssuer => AuthError::WrongIssuer,
        _ => AuthError::InvalidSignature(err.to_string()),
    }
}

#[async_trait]
impl TokenVerifier for CognitoVerifier {
    async fn verify(&self, token: &str) -> Result<Claims> {
        let unverified = peek_claims(token)?;
        check_origin(&unverified, &self.config)?;

        let header = decode_header(token).map_err(|e| AuthError::MalformedToken(e.to_string()))?;
        let unknown_key = AuthError::UnknownKey(self.config.token_use);
        let kid = header.kid.ok_or_else(|| unknown_key.clone())?;
        let key = self.keys().await?.get(&kid).ok_or(unknown_key)?;

        let claims = decode::<Claims>(token, key, &self.validation())
            .map_err(map_jwt_error)?
            .claims;
        check_max_age(&claims, &self.config, Utc::now())?;

        Ok(claims)
    }
}
