//! Update expression planning.
//!
//! Builds `SET` expressions with placeholder names for every attribute so
//! reserved words never collide.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use taskmanager_core::task::{due_date_notification_key, Task, TaskUpdate};
use taskmanager_core::user::UserUpdate;

use super::conversions::{date, preferences, s, timestamp};

/// A `SET a = :a, ...` update with its placeholder maps.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateExpression {
    assignments: Vec<String>,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl UpdateExpression {
    pub fn set(mut self, attribute: &str, value: AttributeValue) -> Self {
        let index = self.assignments.len();
        let name = format!("#a{index}");
        let placeholder = format!(":v{index}");

        self.assignments.push(format!("{name} = {placeholder}"));
        self.names.insert(name, attribute.to_string());
        self.values.insert(placeholder, value);
        self
    }

    fn set_opt(self, attribute: &str, value: Option<AttributeValue>) -> Self {
        match value {
            Some(value) => self.set(attribute, value),
            None => self,
        }
    }

    pub fn expression(&self) -> String {
        format!("SET {}", self.assignments.join(", "))
    }

    pub fn names(&self) -> &HashMap<String, String> {
        &self.names
    }

    pub fn values(&self) -> &HashMap<String, AttributeValue> {
        &self.values
    }

    pub fn into_parts(
        self,
    ) -> (
        String,
        HashMap<String, String>,
        HashMap<String, AttributeValue>,
    ) {
        let expression = self.expression();
        (expression, self.names, self.values)
    }
}

/// Plan the store update for a task change set.
pub fn task_update_expression(update: &TaskUpdate) -> UpdateExpression {
    UpdateExpression::default()
        .set_opt("Title", update.title.as_ref().map(s))
        .set_opt("Description", update.description.as_ref().map(s))
        .set_opt("Status", update.status.map(|st| s(st.as_str())))
        .set_opt("TaskCompletedAt", update.completed_at.as_ref().map(timestamp))
        .set_opt("DueDate", update.due_date.as_ref().map(timestamp))
        .set_opt("DueDateShort", update.due_date_short().as_ref().map(date))
        .set_opt(
            "NotificationSent",
            update.due_date.map(|_| AttributeValue::Bool(false)),
        )
        .set_opt(
            "DueDate_NotificationSent",
            update.due_date_notification_key().map(s),
        )
        .set_opt("Reminder", update.reminder.map(AttributeValue::Bool))
        .set_opt("ReminderTime", update.reminder_time.as_ref().map(timestamp))
        .set("TaskUpdatedAt", timestamp(&update.updated_at))
}

/// Plan the update that flags a task's reminder as sent.
pub fn notification_sent_expression(task: &Task) -> UpdateExpression {
    UpdateExpression::default()
        .set("NotificationSent", AttributeValue::Bool(true))
        .set(
            "DueDate_NotificationSent",
            s(due_date_notification_key(&task.due_date, true)),
        )
}

/// Plan the store update for a user change set.
pub fn user_update_expression(update: &UserUpdate) -> UpdateExpression {
    UpdateExpression::default()
        .set_opt("FirstName", update.first_name.as_ref().map(s))
        .set_opt("LastName", update.last_name.as_ref().map(s))
        .set_opt("PhoneNumber", update.phone_number.as_ref().map(s))
        .set_opt(
            "NotificationPreferences",
            update.notification_preferences.as_ref().map(preferences),
        )
        .set("UpdatedAt", timestamp(&update.updated_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use taskmanager_core::task::{TaskStatus, UpdateTaskInput};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn attribute_values(expr: &UpdateExpression) -> HashMap<String, AttributeValue> {
        expr.names()
            .iter()
            .map(|(name, attribute)| {
                let placeholder = name.replacen("#a", ":v", 1);
                (attribute.clone(), expr.values()[&placeholder].clone())
            })
            .collect()
    }

    #[test]
    fn test_minimal_update_only_touches_timestamp() {
        let update = TaskUpdate::from_input(&UpdateTaskInput::default(), now());
        let expr = task_update_expression(&update);

        assert_eq!(expr.expression(), "SET #a0 = :v0");
        assert_eq!(expr.names()["#a0"], "TaskUpdatedAt");
        assert_eq!(
            expr.values()[":v0"],
            AttributeValue::S("2024-06-01T12:00:00.000Z".to_string())
        );
    }

    #[test]
    fn test_completed_status_sets_completed_at() {
        let input = UpdateTaskInput {
            status: Some(TaskStatus::Completed.to_string()),
            ..Default::default()
        };
        let values = attribute_values(&task_update_expression(&TaskUpdate::from_input(
            &input,
            now(),
        )));

        assert_eq!(values["Status"], AttributeValue::S("COMPLETED".to_string()));
        assert!(values.contains_key("TaskCompletedAt"));
        assert!(!values.contains_key("DueDate"));
    }

    #[test]
    fn test_due_date_rewrites_derived_attributes() {
        let input = UpdateTaskInput {
            due_date: Some(Utc.with_ymd_and_hms(2024, 7, 4, 18, 0, 0).unwrap()),
            ..Default::default()
        };
        let values = attribute_values(&task_update_expression(&TaskUpdate::from_input(
            &input,
            now(),
        )));

        assert_eq!(values["DueDateShort"], AttributeValue::S("2024-07-04".to_string()));
        assert_eq!(values["NotificationSent"], AttributeValue::Bool(false));
        assert_eq!(
            values["DueDate_NotificationSent"],
            AttributeValue::S("2024-07-04T18:00:00.000Z_false".to_string())
        );
    }

    #[test]
    fn test_user_update_expression() {
        let update = UserUpdate {
            first_name: Some("Ana".to_string()),
            last_name: None,
            phone_number: None,
            notification_preferences: None,
            updated_at: now(),
        };
        let (expression, names, values) = user_update_expression(&update).into_parts();

        assert_eq!(expression, "SET #a0 = :v0, #a1 = :v1");
        assert_eq!(names["#a0"], "FirstName");
        assert_eq!(names["#a1"], "UpdatedAt");
        assert_eq!(values.len(), 2);
    }
}
