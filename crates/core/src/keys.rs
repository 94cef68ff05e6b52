//! Partition and sort key generation.
//!
//! Pure functions for the single-table layout. A user record and that
//! user's tasks and notifications share the `USER#<id>` partition.

use uuid::Uuid;

// ============================================================================
// Key prefixes
// ============================================================================

pub const USER_PREFIX: &str = "USER#";
pub const TASK_PREFIX: &str = "TASK#";
pub const NOTIFICATION_PREFIX: &str = "NOTIFICATION#";

// ============================================================================
// User keys
// ============================================================================

/// Generate the partition key for a user's partition.
///
/// Pattern: `USER#<user_id>`
pub fn user_pk(user_id: &str) -> String {
    format!("{USER_PREFIX}{user_id}")
}

/// Generate the sort key of the user record itself.
///
/// Pattern: `USER#<user_id>` (same as PK)
pub fn user_sk(user_id: &str) -> String {
    format!("{USER_PREFIX}{user_id}")
}

/// Returns the id inside a `USER#` key, or the input when it has no prefix.
pub fn strip_user_prefix(pk: &str) -> &str {
    pk.strip_prefix(USER_PREFIX).unwrap_or(pk)
}

// ============================================================================
// Task keys
// ============================================================================

/// Generate the sort key for a task.
///
/// Pattern: `TASK#<task_id>`
pub fn task_sk(task_id: Uuid) -> String {
    format!("{TASK_PREFIX}{task_id}")
}

/// Accepts either a full `TASK#<id>` sort key or a bare id.
pub fn normalize_task_id(task_id: &str) -> String {
    if task_id.starts_with(TASK_PREFIX) {
        task_id.to_string()
    } else {
        format!("{TASK_PREFIX}{task_id}")
    }
}

// ============================================================================
// Notification keys
// ============================================================================

/// Generate the sort key for a notification.
///
/// Pattern: `NOTIFICATION#<notification_id>`
pub fn notification_sk(notification_id: Uuid) -> String {
    format!("{NOTIFICATION_PREFIX}{notification_id}")
}
