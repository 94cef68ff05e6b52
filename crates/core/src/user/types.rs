use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keys;
use crate::serde::{deserialize_iso8601, serialize_iso8601};

use super::requests::{CreateUserInput, UserUpdate};

/// Which channels a user accepts reminders on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(rename = "Email", default)]
    pub email: bool,
    #[serde(rename = "SMS", default)]
    pub sms: bool,
}

/// A registered user. Identified by the identity provider's `sub`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "PK")]
    pub pk: String,
    #[serde(rename = "SK")]
    pub sk: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub notification_preferences: NotificationPreferences,
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
    #[serde(
        serialize_with = "serialize_iso8601",
        deserialize_with = "deserialize_iso8601"
    )]
    pub last_login: DateTime<Utc>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl User {
    /// Creates a user record from the profile form.
    pub fn new(sub: &str, input: &CreateUserInput, now: DateTime<Utc>) -> Self {
        Self {
            pk: keys::user_pk(sub),
            sk: keys::user_sk(sub),
            email: input.email.clone(),
            first_name: non_empty(input.first_name.as_deref()),
            last_name: non_empty(input.last_name.as_deref()),
            phone_number: non_empty(input.phone_number.as_deref()),
            notification_preferences: NotificationPreferences::default(),
            created_at: now,
            updated_at: now,
            last_login: now,
        }
    }

    /// Creates a user record from a confirmed sign-up.
    pub fn from_confirmation(
        sub: &str,
        email: &str,
        given_name: Option<&str>,
        family_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let input = CreateUserInput {
            email: email.to_string(),
            first_name: given_name.map(str::to_string),
            last_name: family_name.map(str::to_string),
            phone_number: None,
        };
        Self::new(sub, &input, now)
    }

    /// The identity provider's subject, without the `USER#` prefix.
    pub fn sub(&self) -> &str {
        keys::strip_user_prefix(&self.pk)
    }

    /// Returns the address to send reminder email to, if the user opted in.
    pub fn reminder_email(&self) -> Option<&str> {
        if self.notification_preferences.email && !self.email.trim().is_empty() {
            Some(self.email.as_str())
        } else {
            None
        }
    }

    pub fn apply(&mut self, update: &UserUpdate) {
        if let Some(first_name) = &update.first_name {
            self.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = Some(last_name.clone());
        }
        if let Some(phone_number) = &update.phone_number {
            self.phone_number = Some(phone_number.clone());
        }
        if let Some(preferences) = update.notification_preferences {
            self.notification_preferences = preferences;
        }
        self.updated_at = update.updated_at;
    }
}
