//! Lambda functions of the task manager.
//!
//! - `post_confirmation`: writes the user record once a sign-up is confirmed
//! - `scheduled_notifications`: the daily job that reminds users of tasks due
//!   tomorrow
//!
//! Handlers take their collaborators as trait objects so they run without
//! AWS in tests; the binaries under `src/bin` wire the real adapters.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;

pub use config::JobConfig;
pub use error::LambdaError;

/// JSON logs without ANSI colors or timestamps; CloudWatch adds its own.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskmanager_lambdas=info,taskmanager_storage=info".into()),
        )
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .init();
}
