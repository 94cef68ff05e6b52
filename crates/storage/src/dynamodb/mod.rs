//! DynamoDB storage backend implementation.
//!
//! One table holds every entity. Users, tasks and notifications of the same
//! user share the `USER#<id>` partition and differ by sort key prefix.

mod conversions;
mod error;
mod expressions;
mod repository;

pub use repository::{
    DynamoDbRepository, DEFAULT_TABLE_NAME, EMAIL_INDEX, NOTIFICATION_TIMESTAMP_INDEX,
    TASK_DUE_NOTIFICATION_INDEX, UPDATED_AT_INDEX,
};
