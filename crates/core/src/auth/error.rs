use thiserror::Error;

use super::TokenUse;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid verifier configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to fetch signing keys: {0}")]
    KeySetUnavailable(String),

    #[error("Not a valid JWT token: {0}")]
    MalformedToken(String),

    #[error("token is not from your User Pool")]
    WrongIssuer,

    #[error("Not an {0} token")]
    WrongTokenUse(TokenUse),

    #[error("Invalid {0} token")]
    UnknownKey(TokenUse),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("maxAge exceeded")]
    TokenTooOld,

    #[error("jwt expired")]
    Expired,
}
