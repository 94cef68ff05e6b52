//! Functional core for the task manager services.
//!
//! Pure data types, validation and key templating shared by the HTTP
//! server, the storage backends and the Lambda functions. Nothing in this
//! crate performs I/O; the storage traits are implemented elsewhere.

pub mod auth;
pub mod keys;
pub mod notification;
pub mod serde;
pub mod storage;
pub mod task;
pub mod user;
