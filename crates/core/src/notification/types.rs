use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keys;
use crate::serde::{deserialize_iso8601, serialize_iso8601};

/// How long a notification record lives before the store expires it.
pub const NOTIFICATION_RETENTION_DAYS: i64 = 365;

/// A record that a reminder was issued for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notification {
    #[serde(rename = "PK")]
    pub pk: String,
    #[serde(rename = "SK")]
    pub sk: String,
    #[serde(rename = "Notif_Task")]
    pub notif_task: String,
    #[serde(
        serialize_with = "serialize_iso8601",
        deserialize_with = "deserialize_iso8601"
    )]
    pub notification_timestamp: DateTime<Utc>,
    /// Unix seconds; the store's TTL attribute.
    pub notification_expiry: i64,
    #[serde(
        serialize_with = "serialize_iso8601",
        deserialize_with = "deserialize_iso8601"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(
        serialize_with = "serialize_iso8601",
        deserialize_with = "deserialize_iso8601"
    )]
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// `user_id` is used verbatim as the partition key.
    pub fn new(user_id: &str, task_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            pk: user_id.to_string(),
            sk: keys::notification_sk(Uuid::new_v4()),
            notif_task: task_id.to_string(),
            notification_timestamp: now,
            notification_expiry: (now + Duration::days(NOTIFICATION_RETENTION_DAYS)).timestamp(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of the service routes that reference a user's task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub task_id: String,
}

impl CreateNotificationRequest {
    pub fn is_complete(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.task_id.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_notification() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let n = Notification::new("USER#alice", "TASK#1", now);

        assert_eq!(n.pk, "USER#alice");
        assert!(n.sk.starts_with("NOTIFICATION#"));
        assert_eq!(n.notif_task, "TASK#1");
        assert_eq!(n.notification_expiry, now.timestamp() + 365 * 24 * 60 * 60);
        assert_eq!(n.created_at, n.updated_at);
    }

    #[test]
    fn test_wire_names() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let json = serde_json::to_value(Notification::new("USER#a", "TASK#1", now)).unwrap();

        assert_eq!(json["Notif_Task"], "TASK#1");
        assert_eq!(json["NotificationTimestamp"], "2024-06-01T12:00:00.000Z");
        assert!(json["NotificationExpiry"].is_i64());
    }

    #[test]
    fn test_request_completeness() {
        let req: CreateNotificationRequest =
            serde_json::from_str(r#"{"userId": "USER#a", "taskId": "TASK#1"}"#).unwrap();
        assert!(req.is_complete());

        let req: CreateNotificationRequest = serde_json::from_str(r#"{"userId": "x"}"#).unwrap();
        assert!(!req.is_complete());
    }
}
