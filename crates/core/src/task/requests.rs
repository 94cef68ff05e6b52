use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_iso8601, deserialize_optional_iso8601, deserialize_optional_string};

use super::types::Task;

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTaskInput {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_iso8601")]
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub reminder: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_iso8601")]
    pub reminder_time: Option<DateTime<Utc>>,
}

/// Body of `PUT /api/tasks/{taskId}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTaskInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_iso8601")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reminder: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_iso8601")]
    pub reminder_time: Option<DateTime<Utc>>,
}

/// A per-field error, keyed by the offending input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub key: String,
    pub error: String,
}

impl GraphQLError {
    pub fn new(key: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            error: error.into(),
        }
    }
}

/// Envelope returned by every task mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(rename = "Task")]
    pub task: Option<Task>,
    pub errors: Vec<GraphQLError>,
}

impl MutationResponse {
    pub fn ok(task: Task) -> Self {
        Self {
            success: true,
            task: Some(task),
            errors: Vec::new(),
        }
    }

    /// Successful mutation with no task to return (deletes).
    pub fn empty() -> Self {
        Self {
            success: true,
            task: None,
            errors: Vec::new(),
        }
    }

    pub fn failed(errors: Vec<GraphQLError>) -> Self {
        Self {
            success: false,
            task: None,
            errors,
        }
    }

    pub fn error(key: impl Into<String>, error: impl Into<String>) -> Self {
        Self::failed(vec![GraphQLError::new(key, error)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_input_from_wire() {
        let json = r#"{
            "Title": "Pay rent",
            "Description": "",
            "DueDate": "2030-01-01T09:00:00.000Z",
            "Reminder": true,
            "ReminderTime": "2029-12-31T09:00:00.000Z"
        }"#;
        let input: CreateTaskInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.title, "Pay rent");
        assert_eq!(input.description, None);
        assert_eq!(input.reminder, Some(true));
        assert!(input.reminder_time.is_some());
    }

    #[test]
    fn test_create_input_requires_due_date() {
        let result: Result<CreateTaskInput, _> = serde_json::from_str(r#"{"Title": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_input_all_optional() {
        let input: UpdateTaskInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input, UpdateTaskInput::default());
    }

    #[test]
    fn test_mutation_response_shape() {
        let json = serde_json::to_value(MutationResponse::error("CreateError", "boom")).unwrap();

        assert_eq!(json["success"], false);
        assert!(json["Task"].is_null());
        assert_eq!(json["errors"][0]["key"], "CreateError");
        assert_eq!(json["errors"][0]["error"], "boom");
    }
}
