use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{NotificationPreferences, User};

/// Body of `POST /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateUserInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Body of `PATCH /api/users/me`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateUserInput {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub notification_preferences: Option<NotificationPreferences>,
}

/// Resolved change set for a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub notification_preferences: Option<NotificationPreferences>,
    pub updated_at: DateTime<Utc>,
}

impl UserUpdate {
    pub fn from_input(input: &UpdateUserInput, now: DateTime<Utc>) -> Self {
        Self {
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            phone_number: input.phone_number.clone(),
            notification_preferences: input.notification_preferences,
            updated_at: now,
        }
    }
}

/// Error entry in a [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl ResolverError {
    pub const UNKNOWN: &'static str = "UNKNOWN_ERROR";

    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: error_type.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(message, Self::UNKNOWN)
    }
}

/// Envelope returned by the user mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub success: bool,
    pub errors: Vec<ResolverError>,
    pub user: Option<User>,
}

impl UserResponse {
    pub fn ok(user: User) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            user: Some(user),
        }
    }

    pub fn failed(errors: Vec<ResolverError>) -> Self {
        Self {
            success: false,
            errors,
            user: None,
        }
    }
}

/// Validate a create-profile request.
pub fn validate_create_user(input: &CreateUserInput) -> Result<(), Vec<ResolverError>> {
    let email = input.email.trim();
    if email.is_empty() {
        return Err(vec![ResolverError::new(
            "Email is required.",
            "VALIDATION_ERROR",
        )]);
    }
    if !email.contains('@') {
        return Err(vec![ResolverError::new(
            "Email is not a valid address.",
            "VALIDATION_ERROR",
        )]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input(email: &str) -> CreateUserInput {
        CreateUserInput {
            email: email.to_string(),
            first_name: None,
            last_name: None,
            phone_number: None,
        }
    }

    #[test]
    fn test_validate_create_user() {
        assert!(validate_create_user(&input("ana@example.com")).is_ok());
        assert!(validate_create_user(&input("")).is_err());
        assert!(validate_create_user(&input("not-an-email")).is_err());
    }

    #[test]
    fn test_apply_update_keeps_untouched_fields() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut user = User::new(
            "sub-1",
            &CreateUserInput {
                first_name: Some("Ana".to_string()),
                ..input("ana@example.com")
            },
            now,
        );

        let later = now + chrono::Duration::hours(1);
        let update = UserUpdate::from_input(
            &UpdateUserInput {
                last_name: Some("Lima".to_string()),
                notification_preferences: Some(NotificationPreferences {
                    email: true,
                    sms: false,
                }),
                ..Default::default()
            },
            later,
        );
        user.apply(&update);

        assert_eq!(user.first_name.as_deref(), Some("Ana"));
        assert_eq!(user.last_name.as_deref(), Some("Lima"));
        assert!(user.notification_preferences.email);
        assert_eq!(user.updated_at, later);
        assert_eq!(user.created_at, now);
    }

    #[test]
    fn test_resolver_error_wire_shape() {
        let json = serde_json::to_value(ResolverError::unknown("boom")).unwrap();
        assert_eq!(json["message"], "boom");
        assert_eq!(json["type"], "UNKNOWN_ERROR");
    }
}
