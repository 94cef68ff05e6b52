//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and domain types.
//! These are testable in isolation without DynamoDB access.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, NaiveDate, Utc};
use taskmanager_core::notification::Notification;
use taskmanager_core::serde::{parse_iso8601, to_iso8601};
use taskmanager_core::storage::{PageCursor, RepositoryError};
use taskmanager_core::task::{Task, TaskStatus};
use taskmanager_core::user::{NotificationPreferences, User};

pub type Item = HashMap<String, AttributeValue>;

// ============================================================================
// Scalar encoders
// ============================================================================

pub fn s(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

pub fn timestamp(dt: &DateTime<Utc>) -> AttributeValue {
    AttributeValue::S(to_iso8601(dt))
}

pub fn date(d: &NaiveDate) -> AttributeValue {
    AttributeValue::S(d.format("%Y-%m-%d").to_string())
}

pub fn preferences(prefs: &NotificationPreferences) -> AttributeValue {
    AttributeValue::M(HashMap::from([
        ("Email".to_string(), AttributeValue::Bool(prefs.email)),
        ("SMS".to_string(), AttributeValue::Bool(prefs.sms)),
    ]))
}

// ============================================================================
// Task conversions
// ============================================================================

/// Convert a Task to DynamoDB item.
pub fn task_to_item(task: &Task) -> Item {
    let mut item = HashMap::new();

    item.insert("PK".to_string(), s(&task.pk));
    item.insert("SK".to_string(), s(&task.sk));
    item.insert("Title".to_string(), s(&task.title));
    if let Some(description) = &task.description {
        item.insert("Description".to_string(), s(description));
    }
    item.insert("Status".to_string(), s(task.status.as_str()));
    item.insert("CreatedAt".to_string(), timestamp(&task.created_at));
    if let Some(updated_at) = &task.task_updated_at {
        item.insert("TaskUpdatedAt".to_string(), timestamp(updated_at));
    }
    if let Some(completed_at) = &task.task_completed_at {
        item.insert("TaskCompletedAt".to_string(), timestamp(completed_at));
    }
    item.insert(
        "DueDate_NotificationSent".to_string(),
        s(&task.due_date_notification_sent),
    );
    item.insert(
        "NotificationSent".to_string(),
        AttributeValue::Bool(task.notification_sent),
    );
    item.insert("DueDate".to_string(), timestamp(&task.due_date));
    item.insert("DueDateShort".to_string(), date(&task.due_date_short));
    if let Some(reminder) = task.reminder {
        item.insert("Reminder".to_string(), AttributeValue::Bool(reminder));
    }
    if let Some(reminder_time) = &task.reminder_time {
        item.insert("ReminderTime".to_string(), timestamp(reminder_time));
    }

    item
}

/// Convert a DynamoDB item to Task.
pub fn item_to_task(item: &Item) -> Result<Task, RepositoryError> {
    let status = get_string(item, "Status")?;
    let status = status
        .parse::<TaskStatus>()
        .map_err(RepositoryError::InvalidData)?;

    Ok(Task {
        pk: get_string(item, "PK")?,
        sk: get_string(item, "SK")?,
        title: get_string(item, "Title")?,
        description: get_optional_string(item, "Description"),
        status,
        created_at: get_datetime(item, "CreatedAt")?,
        task_updated_at: get_optional_datetime(item, "TaskUpdatedAt")?,
        task_completed_at: get_optional_datetime(item, "TaskCompletedAt")?,
        due_date_notification_sent: get_string(item, "DueDate_NotificationSent")?,
        notification_sent: get_optional_bool(item, "NotificationSent").unwrap_or(false),
        due_date: get_datetime(item, "DueDate")?,
        due_date_short: get_date(item, "DueDateShort")?,
        reminder: get_optional_bool(item, "Reminder"),
        reminder_time: get_optional_datetime(item, "ReminderTime")?,
    })
}

// ============================================================================
// User conversions
// ============================================================================

/// Convert a User to DynamoDB item.
pub fn user_to_item(user: &User) -> Item {
    let mut item = HashMap::new();

    item.insert("PK".to_string(), s(&user.pk));
    item.insert("SK".to_string(), s(&user.sk));
    item.insert("Email".to_string(), s(&user.email));
    if let Some(first_name) = &user.first_name {
        item.insert("FirstName".to_string(), s(first_name));
    }
    if let Some(last_name) = &user.last_name {
        item.insert("LastName".to_string(), s(last_name));
    }
    if let Some(phone_number) = &user.phone_number {
        item.insert("PhoneNumber".to_string(), s(phone_number));
    }
    item.insert(
        "NotificationPreferences".to_string(),
        preferences(&user.notification_preferences),
    );
    item.insert("CreatedAt".to_string(), timestamp(&user.created_at));
    item.insert("UpdatedAt".to_string(), timestamp(&user.updated_at));
    item.insert("LastLogin".to_string(), timestamp(&user.last_login));

    item
}

/// Convert a DynamoDB item to User. Missing preferences default to off.
pub fn item_to_user(item: &Item) -> Result<User, RepositoryError> {
    let notification_preferences = match item.get("NotificationPreferences") {
        Some(AttributeValue::M(prefs)) => NotificationPreferences {
            email: get_optional_bool(prefs, "Email").unwrap_or(false),
            sms: get_optional_bool(prefs, "SMS").unwrap_or(false),
        },
        _ => NotificationPreferences::default(),
    };

    let created_at = get_datetime(item, "CreatedAt")?;
    Ok(User {
        pk: get_string(item, "PK")?,
        sk: get_string(item, "SK")?,
        email: get_string(item, "Email")?,
        first_name: get_optional_string(item, "FirstName"),
        last_name: get_optional_string(item, "LastName"),
        phone_number: get_optional_string(item, "PhoneNumber"),
        notification_preferences,
        created_at,
        updated_at: get_optional_datetime(item, "UpdatedAt")?.unwrap_or(created_at),
        last_login: get_optional_datetime(item, "LastLogin")?.unwrap_or(created_at),
    })
}

// ============================================================================
// Notification conversions
// ============================================================================

/// Convert a Notification to DynamoDB item.
pub fn notification_to_item(notification: &Notification) -> Item {
    let mut item = HashMap::new();

    item.insert("PK".to_string(), s(&notification.pk));
    item.insert("SK".to_string(), s(&notification.sk));
    item.insert("Notif_Task".to_string(), s(&notification.notif_task));
    item.insert(
        "NotificationTimestamp".to_string(),
        timestamp(&notification.notification_timestamp),
    );
    item.insert(
        "NotificationExpiry".to_string(),
        AttributeValue::N(notification.notification_expiry.to_string()),
    );
    item.insert("CreatedAt".to_string(), timestamp(&notification.created_at));
    item.insert("UpdatedAt".to_string(), timestamp(&notification.updated_at));

    item
}

/// Convert a DynamoDB item to Notification.
pub fn item_to_notification(item: &Item) -> Result<Notification, RepositoryError> {
    Ok(Notification {
        pk: get_string(item, "PK")?,
        sk: get_string(item, "SK")?,
        notif_task: get_string(item, "Notif_Task")?,
        notification_timestamp: get_datetime(item, "NotificationTimestamp")?,
        notification_expiry: get_i64(item, "NotificationExpiry")?,
        created_at: get_datetime(item, "CreatedAt")?,
        updated_at: get_datetime(item, "UpdatedAt")?,
    })
}

// ============================================================================
// Pagination cursors
// ============================================================================

/// Turn a `LastEvaluatedKey` into a cursor. Non-string attributes are
/// dropped; every key attribute of this table is a string.
pub fn last_evaluated_key_to_cursor(key: Option<&Item>) -> Option<PageCursor> {
    let key = key?;
    let attributes: BTreeMap<String, String> = key
        .iter()
        .filter_map(|(k, v)| v.as_s().ok().map(|s| (k.clone(), s.clone())))
        .collect();
    (!attributes.is_empty()).then(|| PageCursor::new(attributes))
}

/// Turn a cursor back into an `ExclusiveStartKey`.
pub fn cursor_to_exclusive_start_key(cursor: &PageCursor) -> Item {
    cursor
        .attributes()
        .iter()
        .map(|(k, v)| (k.clone(), s(v)))
        .collect()
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get an optional string attribute. `NULL` and empty strings read as absent.
fn get_optional_string(item: &Item, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn get_optional_bool(item: &Item, key: &str) -> Option<bool> {
    item.get(key).and_then(|v| v.as_bool().ok()).copied()
}

fn get_i64(item: &Item, key: &str) -> Result<i64, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))?
        .parse::<i64>()
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid number {}: {}", key, e)))
}

/// Get a required date attribute (YYYY-MM-DD format).
fn get_date(item: &Item, key: &str) -> Result<NaiveDate, RepositoryError> {
    let s = get_string(item, key)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid date {}: {}", key, e)))
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(item: &Item, key: &str) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    parse_iso8601(&s)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}

fn get_optional_datetime(item: &Item, key: &str) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    match get_optional_string(item, key) {
        Some(s) => parse_iso8601(&s)
            .map(Some)
            .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use taskmanager_core::task::CreateTaskInput;
    use taskmanager_core::user::CreateUserInput;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn sample_task() -> Task {
        let input = CreateTaskInput {
            title: "Renew passport".to_string(),
            description: None,
            due_date: Utc.with_ymd_and_hms(2024, 6, 2, 8, 30, 0).unwrap(),
            reminder: Some(true),
            reminder_time: Some(Utc.with_ymd_and_hms(2024, 6, 2, 7, 0, 0).unwrap()),
        };
        Task::new("alice", &input, now()).with_sk("TASK#550e8400-e29b-41d4-a716-446655440003")
    }

    fn sample_user() -> User {
        let input = CreateUserInput {
            email: "alice@example.com".to_string(),
            first_name: Some("Alice".to_string()),
            last_name: None,
            phone_number: None,
        };
        User::new("alice", &input, now())
    }

    #[test]
    fn test_task_item_attributes() {
        let item = task_to_item(&sample_task());

        assert_eq!(item.get("PK").unwrap().as_s().unwrap(), "USER#alice");
        assert_eq!(item.get("Status").unwrap().as_s().unwrap(), "TODO");
        assert_eq!(item.get("DueDateShort").unwrap().as_s().unwrap(), "2024-06-02");
        assert_eq!(
            item.get("DueDate_NotificationSent").unwrap().as_s().unwrap(),
            "2024-06-02T08:30:00.000Z_false"
        );
        assert_eq!(
            item.get("NotificationSent").unwrap().as_bool().unwrap(),
            &false
        );
        assert!(!item.contains_key("Description"));
        assert!(!item.contains_key("TaskCompletedAt"));
    }

    #[test]
    fn test_task_item_round_trip() {
        let task = sample_task();
        assert_eq!(item_to_task(&task_to_item(&task)).unwrap(), task);
    }

    #[test]
    fn test_item_to_task_rejects_unknown_status() {
        let mut item = task_to_item(&sample_task());
        item.insert("Status".to_string(), s("ARCHIVED"));
        assert!(matches!(
            item_to_task(&item),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_user_item_preferences_map() {
        let mut user = sample_user();
        user.notification_preferences.email = true;
        let item = user_to_item(&user);

        let prefs = item.get("NotificationPreferences").unwrap().as_m().unwrap();
        assert_eq!(prefs.get("Email").unwrap().as_bool().unwrap(), &true);
        assert_eq!(item_to_user(&item).unwrap(), user);
    }

    #[test]
    fn test_confirmation_item_without_preferences() {
        // Records written at sign-up carry null names and no preferences.
        let mut item = user_to_item(&sample_user());
        item.remove("NotificationPreferences");
        item.insert("LastName".to_string(), AttributeValue::Null(true));

        let user = item_to_user(&item).unwrap();
        assert_eq!(user.notification_preferences, NotificationPreferences::default());
        assert_eq!(user.last_name, None);
    }

    #[test]
    fn test_notification_item_round_trip() {
        let n = Notification::new("USER#alice", "TASK#1", now());
        let item = notification_to_item(&n);

        assert!(item.get("NotificationExpiry").unwrap().as_n().is_ok());
        assert_eq!(item_to_notification(&item).unwrap(), n);
    }

    #[test]
    fn test_missing_field_is_invalid_data() {
        let mut item = notification_to_item(&Notification::new("USER#a", "TASK#1", now()));
        item.remove("Notif_Task");
        assert_eq!(
            item_to_notification(&item).unwrap_err(),
            RepositoryError::InvalidData("Missing or invalid field: Notif_Task".to_string())
        );
    }

    #[test]
    fn test_cursor_conversions() {
        let key: Item = HashMap::from([
            ("PK".to_string(), s("USER#alice")),
            ("SK".to_string(), s("TASK#1")),
            ("TaskUpdatedAt".to_string(), s("2024-06-01T12:00:00.000Z")),
        ]);

        let cursor = last_evaluated_key_to_cursor(Some(&key)).unwrap();
        assert_eq!(cursor.get("SK"), Some("TASK#1"));
        assert_eq!(cursor_to_exclusive_start_key(&cursor), key);

        assert!(last_evaluated_key_to_cursor(None).is_none());
        assert!(last_evaluated_key_to_cursor(Some(&HashMap::new())).is_none());
    }
}
