use async_trait::async_trait;

use super::{AuthError, Claims};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Verifies a raw bearer token and yields its trusted claims.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims>;
}
