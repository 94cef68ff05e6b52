//! Pure validation and update planning for tasks.

use chrono::{DateTime, NaiveDate, Utc};

use super::requests::{CreateTaskInput, GraphQLError, UpdateTaskInput};
use super::types::{due_date_notification_key, TaskStatus};

/// The resolved change set for an existing task.
///
/// Produced from an [`UpdateTaskInput`] and applied either in memory
/// ([`super::Task::apply`]) or as a store update expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder: Option<bool>,
    pub reminder_time: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskUpdate {
    /// Resolve a validated input into a change set stamped with `now`.
    ///
    /// An unparseable status is dropped; run [`validate_update`] first.
    pub fn from_input(input: &UpdateTaskInput, now: DateTime<Utc>) -> Self {
        let status = input
            .status
            .as_deref()
            .and_then(|s| s.parse::<TaskStatus>().ok());
        let completed_at = (status == Some(TaskStatus::Completed)).then_some(now);

        Self {
            title: input.title.clone(),
            description: input.description.clone(),
            status,
            due_date: input.due_date,
            reminder: input.reminder,
            reminder_time: input.reminder_time,
            updated_at: now,
            completed_at,
        }
    }

    /// New `DueDateShort` when the due date changes.
    pub fn due_date_short(&self) -> Option<NaiveDate> {
        self.due_date.map(|d| d.date_naive())
    }

    /// New `DueDate_NotificationSent` when the due date changes.
    pub fn due_date_notification_key(&self) -> Option<String> {
        self.due_date
            .as_ref()
            .map(|d| due_date_notification_key(d, false))
    }
}

/// Validate a create request.
pub fn validate_create(
    input: &CreateTaskInput,
    now: DateTime<Utc>,
) -> Result<(), Vec<GraphQLError>> {
    let mut errors = Vec::new();

    if input.title.trim().is_empty() {
        errors.push(GraphQLError::new("Title", "Title is required."));
    }
    check_due_date(Some(&input.due_date), now, &mut errors);
    check_reminder(input.reminder, input.reminder_time.as_ref(), now, &mut errors);

    finish(errors)
}

/// Validate an update request.
pub fn validate_update(
    input: &UpdateTaskInput,
    now: DateTime<Utc>,
) -> Result<(), Vec<GraphQLError>> {
    let mut errors = Vec::new();

    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            errors.push(GraphQLError::new("Title", "Title cannot be empty."));
        }
    }
    if let Some(status) = &input.status {
        if let Err(e) = status.parse::<TaskStatus>() {
            errors.push(GraphQLError::new("Status", e));
        }
    }
    check_due_date(input.due_date.as_ref(), now, &mut errors);
    check_reminder(input.reminder, input.reminder_time.as_ref(), now, &mut errors);

    finish(errors)
}

fn check_due_date(due: Option<&DateTime<Utc>>, now: DateTime<Utc>, errors: &mut Vec<GraphQLError>) {
    if let Some(due) = due {
        if *due < now {
            errors.push(GraphQLError::new("DueDate", "DueDate cannot be in the past."));
        }
    }
}

fn check_reminder(
    reminder: Option<bool>,
    reminder_time: Option<&DateTime<Utc>>,
    now: DateTime<Utc>,
    errors: &mut Vec<GraphQLError>,
) {
    match (reminder, reminder_time) {
        (Some(true), None) => errors.push(GraphQLError::new(
            "ReminderTime",
            "ReminderTime is required when Reminder is enabled.",
        )),
        (Some(false), Some(_)) => errors.push(GraphQLError::new(
            "ReminderTime",
            "ReminderTime cannot be set when Reminder is disabled.",
        )),
        _ => {}
    }

    if let Some(time) = reminder_time {
        if *time < now {
            errors.push(GraphQLError::new(
                "ReminderTime",
                "ReminderTime cannot be in the past.",
            ));
        }
    }
}

fn finish(errors: Vec<GraphQLError>) -> Result<(), Vec<GraphQLError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn create_input() -> CreateTaskInput {
        CreateTaskInput {
            title: "Buy milk".to_string(),
            description: None,
            due_date: now() + Duration::days(2),
            reminder: None,
            reminder_time: None,
        }
    }

    fn keys(errors: &[GraphQLError]) -> Vec<&str> {
        errors.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn test_validate_create_accepts_valid_input() {
        assert!(validate_create(&create_input(), now()).is_ok());
    }

    #[test]
    fn test_validate_create_collects_every_error() {
        let input = CreateTaskInput {
            title: "  ".to_string(),
            due_date: now() - Duration::hours(1),
            reminder: Some(true),
            ..create_input()
        };

        let errors = validate_create(&input, now()).unwrap_err();
        assert_eq!(keys(&errors), vec!["Title", "DueDate", "ReminderTime"]);
    }

    #[test]
    fn test_validate_create_reminder_disabled_with_time() {
        let input = CreateTaskInput {
            reminder: Some(false),
            reminder_time: Some(now() + Duration::hours(1)),
            ..create_input()
        };

        let errors = validate_create(&input, now()).unwrap_err();
        assert_eq!(
            errors[0].error,
            "ReminderTime cannot be set when Reminder is disabled."
        );
    }

    #[test]
    fn test_validate_create_reminder_time_in_past() {
        let input = CreateTaskInput {
            reminder: Some(true),
            reminder_time: Some(now() - Duration::minutes(5)),
            ..create_input()
        };

        let errors = validate_create(&input, now()).unwrap_err();
        assert_eq!(keys(&errors), vec!["ReminderTime"]);
    }

    #[test]
    fn test_validate_update_rejects_unknown_status() {
        let input = UpdateTaskInput {
            status: Some("DONE".to_string()),
            ..Default::default()
        };

        let errors = validate_update(&input, now()).unwrap_err();
        assert_eq!(keys(&errors), vec!["Status"]);
    }

    #[test]
    fn test_validate_update_empty_is_ok() {
        assert!(validate_update(&UpdateTaskInput::default(), now()).is_ok());
    }

    #[test]
    fn test_from_input_completed_sets_completed_at() {
        let input = UpdateTaskInput {
            status: Some("COMPLETED".to_string()),
            ..Default::default()
        };

        let update = TaskUpdate::from_input(&input, now());
        assert_eq!(update.status, Some(TaskStatus::Completed));
        assert_eq!(update.completed_at, Some(now()));
        assert_eq!(update.updated_at, now());
    }

    #[test]
    fn test_from_input_in_progress_leaves_completed_at() {
        let input = UpdateTaskInput {
            status: Some("IN_PROGRESS".to_string()),
            ..Default::default()
        };

        let update = TaskUpdate::from_input(&input, now());
        assert_eq!(update.completed_at, None);
    }

    #[test]
    fn test_apply_new_due_date_resets_notification() {
        let mut task = Task::new("alice", &create_input(), now());
        task.mark_notification_sent();

        let new_due = now() + Duration::days(10);
        let input = UpdateTaskInput {
            due_date: Some(new_due),
            title: Some("Buy oat milk".to_string()),
            ..Default::default()
        };
        let later = now() + Duration::minutes(3);
        let update = TaskUpdate::from_input(&input, later);
        task.apply(&update);

        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.due_date, new_due);
        assert_eq!(task.due_date_short, new_due.date_naive());
        assert!(!task.notification_sent);
        assert_eq!(
            Some(task.due_date_notification_sent.clone()),
            update.due_date_notification_key()
        );
        assert_eq!(task.task_updated_at, Some(later));
    }
}
