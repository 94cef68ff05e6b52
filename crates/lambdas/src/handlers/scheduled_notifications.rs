//! Daily reminder job.
//!
//! Finds the tasks due tomorrow (UTC) that still await a reminder, emails
//! owners who opted in, then records a notification and flags each task
//! through the task manager's service routes.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use taskmanager_core::keys::strip_user_prefix;
use taskmanager_core::storage::{TaskRepository, UserRepository};
use taskmanager_core::task::Task;

use crate::adapters::{Mailer, ServiceClient};
use crate::{JobConfig, LambdaError};

pub const REMINDER_SUBJECT: &str = "Reminder: Task Due Tomorrow";

/// Plain-text body of the reminder email.
pub fn reminder_body(title: &str) -> String {
    format!(
        "Hello,\n\n\
         This is a friendly reminder that your task '{title}' is due tomorrow. \
         Please take necessary actions.\n\n\
         Best regards,\n\
         Your Task Management System"
    )
}

/// Result of a run, in the shape scheduled invocations expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub status_code: u16,
    pub body: String,
}

impl JobResponse {
    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: "Notifications processed successfully!".to_string(),
        }
    }

    pub fn failure() -> Self {
        Self {
            status_code: 500,
            body: "Error processing notifications!".to_string(),
        }
    }
}

pub struct ReminderJob {
    pub tasks: Arc<dyn TaskRepository>,
    pub users: Arc<dyn UserRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub services: Arc<dyn ServiceClient>,
    pub config: JobConfig,
}

impl ReminderJob {
    /// Run once. Failures to notify a single user are logged and skipped;
    /// missing configuration or a failed store call fails the run.
    pub async fn run(&self, now: DateTime<Utc>) -> JobResponse {
        match self.process(now).await {
            Ok(processed) => {
                tracing::info!(processed, "Notifications processed");
                JobResponse::success()
            }
            Err(err) => {
                tracing::error!(error = %err, "Error processing notifications");
                JobResponse::failure()
            }
        }
    }

    async fn process(&self, now: DateTime<Utc>) -> Result<usize, LambdaError> {
        let notification_url = self.config.notification_api_url()?;
        let task_url = self.config.task_api_url()?;

        let tomorrow = (now + Duration::days(1)).date_naive();
        tracing::info!(%tomorrow, "Looking up tasks due tomorrow");

        let due = self.tasks.tasks_due_on(tomorrow).await?;
        let mut processed = 0;

        for task in &due {
            tracing::info!(task = %task.sk, user = %task.pk, "Processing task");

            let Some(user) = self.users.get_user(strip_user_prefix(&task.pk)).await? else {
                tracing::warn!(user = %task.pk, "No user record for task owner");
                continue;
            };

            if let Some(email) = user.reminder_email() {
                self.send_reminder(email, task).await;
            }

            if let Err(err) = self
                .services
                .create_notification(notification_url, &task.pk, &task.sk)
                .await
            {
                tracing::warn!(task = %task.sk, error = %err, "Failed to create notification");
            }

            if let Err(err) = self
                .services
                .mark_notification_sent(task_url, &task.pk, &task.sk)
                .await
            {
                tracing::warn!(task = %task.sk, error = %err, "Failed to update task notification");
            }

            processed += 1;
        }

        Ok(processed)
    }

    async fn send_reminder(&self, email: &str, task: &Task) {
        tracing::info!(%email, task = %task.title, "Sending email notification");
        if let Err(err) = self
            .mailer
            .send(email, REMINDER_SUBJECT, &reminder_body(&task.title))
            .await
        {
            tracing::warn!(%email, error = %err, "Failed to send email");
        }
    }
}
