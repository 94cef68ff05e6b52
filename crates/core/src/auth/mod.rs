mod config;
mod error;
mod functions;
mod traits;
mod types;

pub use config::{VerifierConfig, DEFAULT_TOKEN_EXPIRATION};
pub use error::AuthError;
pub use functions::{check_max_age, check_origin};
pub use traits::{Result, TokenVerifier};
pub use types::{Claims, TokenUse};
