//! Storage backend implementations.
//!
//! This crate provides concrete implementations of the repository traits
//! defined in `taskmanager_core::storage`. Backends are selected at compile
//! time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): `HashMap`s behind `Arc<RwLock<_>>`, for tests and local runs
//! - `dynamodb`: AWS DynamoDB single-table backend using `aws-sdk-dynamodb`
//!
//! # Examples
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p taskmanager_storage --features dynamodb
//! ```

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p taskmanager_storage --features dynamodb"
);

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbRepository;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;
