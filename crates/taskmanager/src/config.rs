use std::{env, time::Duration};

use taskmanager_auth::AuthConfig;
use taskmanager_core::auth::AuthError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
    /// User pool and service key settings
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout in seconds (default: 10)
    /// - everything [`AuthConfig::from_env`] reads
    ///
    /// Storage settings (`DYNAMODB_TABLE_NAME`, `AWS_ENDPOINT_URL`) are read by
    /// the storage backend itself.
    pub fn from_env() -> Result<Self, AuthError> {
        Ok(Self {
            request_timeout_seconds: parse_timeout(env::var("REQUEST_TIMEOUT_SECONDS").ok()),
            auth: AuthConfig::from_env()?,
        })
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn parse_timeout(value: Option<String>) -> u64 {
    value
        .and_then(|v| v.trim().parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(10)
}
