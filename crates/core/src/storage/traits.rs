use async_trait::async_trait;
use chrono::NaiveDate;

use crate::notification::Notification;
use crate::task::{Task, TaskUpdate};
use crate::user::{User, UserUpdate};

use super::{Page, PageCursor, Result};

/// Repository for task operations.
///
/// `owner` is the bare user id; implementations build the `USER#` key.
/// `task_id` is either a bare id or a full `TASK#` sort key.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Lists a user's tasks, most recently updated first.
    async fn list_tasks(&self, owner: &str, cursor: Option<&PageCursor>) -> Result<Page<Task>>;

    /// Gets a single task.
    async fn get_task(&self, owner: &str, task_id: &str) -> Result<Option<Task>>;

    /// Creates a new task. Fails with `AlreadyExists` on a key collision.
    async fn create_task(&self, task: &Task) -> Result<()>;

    /// Applies an update and returns the full task. `NotFound` when absent.
    async fn update_task(&self, owner: &str, task_id: &str, update: &TaskUpdate) -> Result<Task>;

    /// Deletes a task. Deleting a missing task succeeds.
    async fn delete_task(&self, owner: &str, task_id: &str) -> Result<()>;

    /// Tasks due on `date` that still await a reminder.
    async fn tasks_due_on(&self, date: NaiveDate) -> Result<Vec<Task>>;

    /// Flags a task's reminder as sent.
    async fn mark_notification_sent(&self, owner: &str, task_id: &str) -> Result<()>;
}

/// Repository for user operations. Users are keyed by identity subject.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by subject.
    async fn get_user(&self, sub: &str) -> Result<Option<User>>;

    /// Gets the first user with the given email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Writes a user record, replacing any existing one.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Applies an update and returns the full user. `NotFound` when absent.
    async fn update_user(&self, sub: &str, update: &UserUpdate) -> Result<User>;
}

/// Repository for notification operations.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Lists a user's notifications, newest first.
    async fn list_notifications(
        &self,
        owner: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<Page<Notification>>;

    /// Creates a notification. Fails with `AlreadyExists` on a key collision.
    async fn create_notification(&self, notification: &Notification) -> Result<()>;
}
