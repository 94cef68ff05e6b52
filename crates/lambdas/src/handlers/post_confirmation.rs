//! Post-confirmation trigger of the user pool.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use taskmanager_core::storage::UserRepository;
use taskmanager_core::user::User;

use crate::LambdaError;

/// The only trigger source that writes a user record.
pub const CONFIRM_SIGN_UP: &str = "PostConfirmation_ConfirmSignUp";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerEvent {
    #[serde(default)]
    trigger_source: String,
    #[serde(default)]
    request: TriggerRequest,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerRequest {
    #[serde(default)]
    user_attributes: HashMap<String, Value>,
}

impl TriggerRequest {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.user_attributes
            .get(name)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Write the user record for a confirmed sign-up.
///
/// The event is returned unchanged; the user pool expects it back. `users`
/// is `None` when no table is configured.
pub async fn handle_post_confirmation(
    event: Value,
    users: Option<&dyn UserRepository>,
    now: DateTime<Utc>,
) -> Result<Value, LambdaError> {
    // Unknown shapes are passed through like any other trigger
    let trigger: TriggerEvent = serde_json::from_value(event.clone()).unwrap_or_default();
    if trigger.trigger_source != CONFIRM_SIGN_UP {
        tracing::debug!(trigger = %trigger.trigger_source, "Ignoring trigger");
        return Ok(event);
    }

    let request = &trigger.request;
    let (Some(sub), Some(email)) = (request.attribute("sub"), request.attribute("email")) else {
        tracing::error!("User sub or email is missing in the event");
        return Err(LambdaError::MissingAttributes);
    };

    let users = users.ok_or(LambdaError::MissingConfig("DYNAMODB_TABLE_NAME"))?;

    let user = User::from_confirmation(
        sub,
        email,
        request.attribute("given_name"),
        request.attribute("family_name"),
        now,
    );
    users.create_user(&user).await.map_err(|err| {
        tracing::error!(user = %user.pk, error = %err, "Error adding user to the database");
        LambdaError::UserNotSaved(err)
    })?;

    tracing::info!(user = %user.pk, "Stored confirmed user");
    Ok(event)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;
    use taskmanager_storage::InMemoryRepository;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn event(trigger: &str, attributes: Value) -> Value {
        json!({
            "version": "1",
            "triggerSource": trigger,
            "region": "us-east-1",
            "userPoolId": "us-east-1_pool",
            "userName": "alice",
            "request": { "userAttributes": attributes },
            "response": {}
        })
    }

    #[tokio::test]
    async fn test_confirmation_writes_user() {
        let repo = InMemoryRepository::new();
        let input = event(
            CONFIRM_SIGN_UP,
            json!({
                "sub": "sub-1",
                "email": "alice@example.com",
                "email_verified": "true",
                "given_name": "Alice"
            }),
        );

        let output = handle_post_confirmation(input.clone(), Some(&repo), now())
            .await
            .unwrap();
        assert_eq!(output, input);

        let user = repo.get_user("sub-1").await.unwrap().unwrap();
        assert_eq!(user.pk, "USER#sub-1");
        assert_eq!(user.sk, "USER#sub-1");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.first_name.as_deref(), Some("Alice"));
        assert_eq!(user.last_name, None);
        assert_eq!(user.last_login, now());
    }

    #[tokio::test]
    async fn test_other_triggers_pass_through() {
        let repo = InMemoryRepository::new();
        let input = event(
            "PostConfirmation_ConfirmForgotPassword",
            json!({ "sub": "sub-1", "email": "alice@example.com" }),
        );

        let output = handle_post_confirmation(input.clone(), Some(&repo), now())
            .await
            .unwrap();
        assert_eq!(output, input);
        assert!(repo.get_user("sub-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_email() {
        let repo = InMemoryRepository::new();
        let input = event(CONFIRM_SIGN_UP, json!({ "sub": "sub-1" }));

        let err = handle_post_confirmation(input, Some(&repo), now())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User attributes are missing");
    }

    #[tokio::test]
    async fn test_missing_table() {
        let input = event(
            CONFIRM_SIGN_UP,
            json!({ "sub": "sub-1", "email": "alice@example.com" }),
        );

        let err = handle_post_confirmation(input, None, now()).await.unwrap_err();
        assert!(matches!(err, LambdaError::MissingConfig("DYNAMODB_TABLE_NAME")));
    }
}
