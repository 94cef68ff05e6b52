//! Access token verification for the task manager services.
//!
//! This crate provides:
//! - A verifier for tokens issued by an AWS Cognito user pool, backed by the
//!   pool's published signing keys
//! - Axum extractors for authenticated users and internal service callers

mod config;
mod error;
mod extractors;
mod jwks;
mod state;
mod verifier;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{CurrentUser, ServiceCaller, ACCESS_TOKEN_HEADER, SERVICE_KEY_HEADER};
pub use jwks::{Jwk, JwkSet};
pub use state::AuthState;
pub use verifier::CognitoVerifier;
