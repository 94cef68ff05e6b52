//! Application state with repository-based storage.
//!
//! The shared state passed to all request handlers. Repositories are trait
//! objects so the backend can be chosen at compile time via feature flags.

use std::sync::Arc;

use taskmanager_auth::AuthState;
use taskmanager_core::storage::{NotificationRepository, TaskRepository, UserRepository};

use crate::config::Config;

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "dynamodb", feature = "inmemory"))]
compile_error!("Cannot enable both 'dynamodb' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'dynamodb'");

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskRepository>,
    pub users: Arc<dyn UserRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub auth: AuthState,
}

impl AppState {
    /// Wires every repository to one backend.
    pub fn build<R>(repo: Arc<R>, auth: AuthState) -> Self
    where
        R: TaskRepository + UserRepository + NotificationRepository + 'static,
    {
        Self {
            tasks: repo.clone(),
            users: repo.clone(),
            notifications: repo,
            auth,
        }
    }
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use taskmanager_storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Ok(Self::build(
                Arc::new(InMemoryRepository::new()),
                AuthState::from_config(config.auth.clone()),
            ))
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb {
    use super::*;
    use taskmanager_storage::DynamoDbRepository;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = DynamoDbRepository::from_env().await?;
            tracing::info!(table = %repo.table_name(), "Using DynamoDB storage");
            Ok(Self::build(
                Arc::new(repo),
                AuthState::from_config(config.auth.clone()),
            ))
        }
    }
}
