use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keys;
use crate::serde::{
    deserialize_iso8601, deserialize_optional_iso8601, serialize_iso8601,
    serialize_optional_iso8601, to_iso8601,
};

use super::operations::TaskUpdate;
use super::requests::CreateTaskInput;

/// Lifecycle of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Wire representation, as stored in the `Status` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            other => Err(format!("Unknown task status: {other}")),
        }
    }
}

/// Build the `DueDate_NotificationSent` composite attribute.
///
/// Pattern: `<DueDate ISO-8601>_<true|false>`
pub fn due_date_notification_key(due_date: &DateTime<Utc>, notification_sent: bool) -> String {
    format!("{}_{}", to_iso8601(due_date), notification_sent)
}

/// A task owned by a single user, stored under that user's partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(rename = "PK")]
    pub pk: String,
    #[serde(rename = "SK")]
    pub sk: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(
        serialize_with = "serialize_iso8601",
        deserialize_with = "deserialize_iso8601"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        serialize_with = "serialize_optional_iso8601",
        deserialize_with = "deserialize_optional_iso8601"
    )]
    pub task_updated_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        serialize_with = "serialize_optional_iso8601",
        deserialize_with = "deserialize_optional_iso8601"
    )]
    pub task_completed_at: Option<DateTime<Utc>>,
    #[serde(rename = "DueDate_NotificationSent")]
    pub due_date_notification_sent: String,
    pub notification_sent: bool,
    #[serde(
        serialize_with = "serialize_iso8601",
        deserialize_with = "deserialize_iso8601"
    )]
    pub due_date: DateTime<Utc>,
    pub due_date_short: NaiveDate,
    #[serde(default)]
    pub reminder: Option<bool>,
    #[serde(
        default,
        serialize_with = "serialize_optional_iso8601",
        deserialize_with = "deserialize_optional_iso8601"
    )]
    pub reminder_time: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new TODO task for `owner` from validated input.
    pub fn new(owner: &str, input: &CreateTaskInput, now: DateTime<Utc>) -> Self {
        Self {
            pk: keys::user_pk(owner),
            sk: keys::task_sk(Uuid::new_v4()),
            title: input.title.clone(),
            description: input.description.clone(),
            status: TaskStatus::Todo,
            created_at: now,
            task_updated_at: Some(now),
            task_completed_at: None,
            due_date_notification_sent: due_date_notification_key(&input.due_date, false),
            notification_sent: false,
            due_date: input.due_date,
            due_date_short: input.due_date.date_naive(),
            reminder: input.reminder,
            reminder_time: input.reminder_time,
        }
    }

    /// Sets a specific sort key (useful for testing).
    pub fn with_sk(mut self, sk: impl Into<String>) -> Self {
        self.sk = sk.into();
        self
    }

    /// The owning user's id, without the `USER#` prefix.
    pub fn owner(&self) -> &str {
        keys::strip_user_prefix(&self.pk)
    }

    /// Returns true if the task still needs a due-date reminder.
    pub fn awaits_reminder(&self) -> bool {
        !self.notification_sent && self.status != TaskStatus::Completed
    }

    /// Apply a prepared update in place.
    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(completed_at) = update.completed_at {
            self.task_completed_at = Some(completed_at);
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
            self.due_date_short = due_date.date_naive();
            self.notification_sent = false;
            self.due_date_notification_sent = due_date_notification_key(&due_date, false);
        }
        if let Some(reminder) = update.reminder {
            self.reminder = Some(reminder);
        }
        if let Some(reminder_time) = update.reminder_time {
            self.reminder_time = Some(reminder_time);
        }
        self.task_updated_at = Some(update.updated_at);
    }

    /// Record that the due-date reminder went out.
    pub fn mark_notification_sent(&mut self) {
        self.notification_sent = true;
        self.due_date_notification_sent = due_date_notification_key(&self.due_date, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn sample_input() -> CreateTaskInput {
        CreateTaskInput {
            title: "Write report".to_string(),
            description: Some("Quarterly numbers".to_string()),
            due_date: Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(),
            reminder: None,
            reminder_time: None,
        }
    }

    #[test]
    fn test_status_round_trip_strings() {
        for status in [
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("DONE".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("alice", &sample_input(), now());

        assert_eq!(task.pk, "USER#alice");
        assert!(task.sk.starts_with("TASK#"));
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(!task.notification_sent);
        assert_eq!(
            task.due_date_notification_sent,
            "2024-06-03T09:00:00.000Z_false"
        );
        assert_eq!(
            task.due_date_short,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
        );
        assert_eq!(task.task_updated_at, Some(now()));
        assert_eq!(task.task_completed_at, None);
        assert_eq!(task.owner(), "alice");
    }

    #[test]
    fn test_wire_field_names() {
        let task = Task::new("alice", &sample_input(), now());
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["PK"], "USER#alice");
        assert_eq!(json["Title"], "Write report");
        assert_eq!(json["Status"], "TODO");
        assert_eq!(json["CreatedAt"], "2024-06-01T12:00:00.000Z");
        assert_eq!(json["DueDate"], "2024-06-03T09:00:00.000Z");
        assert_eq!(json["DueDateShort"], "2024-06-03");
        assert_eq!(json["NotificationSent"], false);
        assert!(json["TaskCompletedAt"].is_null());
        assert!(json.get("DueDate_NotificationSent").is_some());
    }

    #[test]
    fn test_mark_notification_sent_rewrites_composite() {
        let mut task = Task::new("alice", &sample_input(), now());
        assert!(task.awaits_reminder());

        task.mark_notification_sent();

        assert!(task.notification_sent);
        assert!(!task.awaits_reminder());
        assert_eq!(
            task.due_date_notification_sent,
            "2024-06-03T09:00:00.000Z_true"
        );
    }

    #[test]
    fn test_completed_task_does_not_await_reminder() {
        let mut task = Task::new("alice", &sample_input(), now());
        task.status = TaskStatus::Completed;
        assert!(!task.awaits_reminder());
    }
}
