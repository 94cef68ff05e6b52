//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use taskmanager_core::keys;
use taskmanager_core::notification::Notification;
use taskmanager_core::serde::to_iso8601;
use taskmanager_core::storage::{
    NotificationRepository, Page, PageCursor, RepositoryError, Result, TaskRepository,
    UserRepository,
};
use taskmanager_core::task::{Task, TaskUpdate};
use taskmanager_core::user::{User, UserUpdate};

/// Items per page for list operations.
pub const PAGE_SIZE: usize = 25;

type Key = (String, String);

/// In-memory storage backend for testing.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    tasks: Arc<RwLock<HashMap<Key, Task>>>,
    users: Arc<RwLock<HashMap<String, User>>>,
    notifications: Arc<RwLock<HashMap<Key, Notification>>>,
    page_size: usize,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
            notifications: Arc::new(RwLock::new(HashMap::new())),
            page_size: PAGE_SIZE,
        }
    }

    /// Overrides the page size (useful for testing pagination).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// Newest-first page over `(sort value, SK)` ordered items, resuming after
/// the cursor's position. The cursor mirrors a store key: PK, SK and the
/// index sort attribute.
fn paginate<T: Clone>(
    mut rows: Vec<(String, T)>,
    pk: &str,
    sort_attribute: &str,
    cursor: Option<&PageCursor>,
    page_size: usize,
    sk_of: impl Fn(&T) -> &str,
) -> Page<T> {
    rows.sort_by(|(a_sort, a), (b_sort, b)| {
        (b_sort.as_str(), sk_of(b)).cmp(&(a_sort.as_str(), sk_of(a)))
    });

    if let Some(cursor) = cursor {
        let after = (
            cursor.get(sort_attribute).unwrap_or_default(),
            cursor.get("SK").unwrap_or_default(),
        );
        rows.retain(|(sort, item)| (sort.as_str(), sk_of(item)) < after);
    }

    let has_more = rows.len() > page_size;
    rows.truncate(page_size);

    let last_evaluated_key = match rows.last() {
        Some((sort, item)) if has_more => Some(PageCursor::from([
            ("PK", pk),
            ("SK", sk_of(item)),
            (sort_attribute, sort.as_str()),
        ])),
        _ => None,
    };

    Page::new(rows.into_iter().map(|(_, item)| item).collect(), last_evaluated_key)
}

#[async_trait]
impl TaskRepository for InMemoryRepository {
    async fn list_tasks(&self, owner: &str, cursor: Option<&PageCursor>) -> Result<Page<Task>> {
        let pk = keys::user_pk(owner);
        let tasks = self.tasks.read().await;
        let rows = tasks
            .values()
            .filter(|t| t.pk == pk)
            .filter_map(|t| t.task_updated_at.map(|at| (to_iso8601(&at), t.clone())))
            .collect();

        Ok(paginate(
            rows,
            &pk,
            "TaskUpdatedAt",
            cursor,
            self.page_size,
            |t: &Task| t.sk.as_str(),
        ))
    }

    async fn get_task(&self, owner: &str, task_id: &str) -> Result<Option<Task>> {
        let key = (keys::user_pk(owner), keys::normalize_task_id(task_id));
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&key).cloned())
    }

    async fn create_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        let key = (task.pk.clone(), task.sk.clone());
        if tasks.contains_key(&key) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Task",
                id: task.sk.clone(),
            });
        }
        tasks.insert(key, task.clone());
        Ok(())
    }

    async fn update_task(&self, owner: &str, task_id: &str, update: &TaskUpdate) -> Result<Task> {
        let key = (keys::user_pk(owner), keys::normalize_task_id(task_id));
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&key).ok_or_else(|| RepositoryError::NotFound {
            entity_type: "Task",
            id: key.1.clone(),
        })?;
        task.apply(update);
        Ok(task.clone())
    }

    async fn delete_task(&self, owner: &str, task_id: &str) -> Result<()> {
        let key = (keys::user_pk(owner), keys::normalize_task_id(task_id));
        self.tasks.write().await.remove(&key);
        Ok(())
    }

    async fn tasks_due_on(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut due: Vec<Task> = tasks
            .values()
            .filter(|t| t.due_date_short == date && t.awaits_reminder())
            .cloned()
            .collect();
        due.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        Ok(due)
    }

    async fn mark_notification_sent(&self, owner: &str, task_id: &str) -> Result<()> {
        let key = (keys::user_pk(owner), keys::normalize_task_id(task_id));
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&key).ok_or_else(|| RepositoryError::NotFound {
            entity_type: "Task",
            id: key.1.clone(),
        })?;
        task.mark_notification_sent();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, sub: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&keys::user_pk(sub)).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        let mut matches: Vec<&User> = users.values().filter(|u| u.email == email).collect();
        matches.sort_by(|a, b| a.pk.cmp(&b.pk));
        Ok(matches.first().map(|u| (*u).clone()))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.pk.clone(), user.clone());
        Ok(())
    }

    async fn update_user(&self, sub: &str, update: &UserUpdate) -> Result<User> {
        let pk = keys::user_pk(sub);
        let mut users = self.users.write().await;
        let user = users.get_mut(&pk).ok_or_else(|| RepositoryError::NotFound {
            entity_type: "User",
            id: pk.clone(),
        })?;
        user.apply(update);
        Ok(user.clone())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryRepository {
    async fn list_notifications(
        &self,
        owner: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<Page<Notification>> {
        let pk = keys::user_pk(owner);
        let notifications = self.notifications.read().await;
        let rows = notifications
            .values()
            .filter(|n| n.pk == pk)
            .map(|n| (to_iso8601(&n.notification_timestamp), n.clone()))
            .collect();

        Ok(paginate(
            rows,
            &pk,
            "NotificationTimestamp",
            cursor,
            self.page_size,
            |n: &Notification| n.sk.as_str(),
        ))
    }

    async fn create_notification(&self, notification: &Notification) -> Result<()> {
        let mut notifications = self.notifications.write().await;
        let key = (notification.pk.clone(), notification.sk.clone());
        if notifications.contains_key(&key) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Notification",
                id: notification.sk.clone(),
            });
        }
        notifications.insert(key, notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use taskmanager_core::task::{CreateTaskInput, TaskStatus, UpdateTaskInput};
    use taskmanager_core::user::{CreateUserInput, NotificationPreferences, UpdateUserInput};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn task_due(owner: &str, title: &str, due: DateTime<Utc>, created: DateTime<Utc>) -> Task {
        let input = CreateTaskInput {
            title: title.to_string(),
            description: None,
            due_date: due,
            reminder: None,
            reminder_time: None,
        };
        Task::new(owner, &input, created)
    }

    fn user(sub: &str, email: &str) -> User {
        let input = CreateUserInput {
            email: email.to_string(),
            first_name: None,
            last_name: None,
            phone_number: None,
        };
        User::new(sub, &input, now())
    }

    // ==================== Task Tests ====================

    #[tokio::test]
    async fn test_task_create_and_get_by_either_id_form() {
        let repo = InMemoryRepository::new();
        let task = task_due("alice", "Pay rent", now() + Duration::days(1), now());
        repo.create_task(&task).await.unwrap();

        let bare_id = task.sk.trim_start_matches(keys::TASK_PREFIX);
        assert_eq!(
            repo.get_task("alice", bare_id).await.unwrap(),
            Some(task.clone())
        );
        assert_eq!(repo.get_task("alice", &task.sk).await.unwrap(), Some(task));
    }

    #[tokio::test]
    async fn test_task_get_other_owner_is_none() {
        let repo = InMemoryRepository::new();
        let task = task_due("alice", "Pay rent", now() + Duration::days(1), now());
        repo.create_task(&task).await.unwrap();

        assert!(repo.get_task("bob", &task.sk).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_task_create_duplicate_fails() {
        let repo = InMemoryRepository::new();
        let task = task_due("alice", "Pay rent", now() + Duration::days(1), now());
        repo.create_task(&task).await.unwrap();

        let result = repo.create_task(&task).await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_task_update_returns_full_task() {
        let repo = InMemoryRepository::new();
        let task = task_due("alice", "Pay rent", now() + Duration::days(1), now());
        repo.create_task(&task).await.unwrap();

        let input = UpdateTaskInput {
            status: Some("COMPLETED".to_string()),
            ..Default::default()
        };
        let later = now() + Duration::hours(2);
        let updated = repo
            .update_task("alice", &task.sk, &TaskUpdate::from_input(&input, later))
            .await
            .unwrap();

        assert_eq!(updated.title, "Pay rent");
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.task_completed_at, Some(later));
        assert_eq!(updated.task_updated_at, Some(later));
    }

    #[tokio::test]
    async fn test_task_update_missing_is_not_found() {
        let repo = InMemoryRepository::new();
        let update = TaskUpdate::from_input(&UpdateTaskInput::default(), now());

        let result = repo.update_task("alice", "TASK#missing", &update).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_task_delete_is_idempotent() {
        let repo = InMemoryRepository::new();
        let task = task_due("alice", "Pay rent", now() + Duration::days(1), now());
        repo.create_task(&task).await.unwrap();

        repo.delete_task("alice", &task.sk).await.unwrap();
        repo.delete_task("alice", &task.sk).await.unwrap();
        assert!(repo.get_task("alice", &task.sk).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_tasks_newest_first_with_cursor() {
        let repo = InMemoryRepository::new().with_page_size(2);
        for i in 0..5 {
            let created = now() + Duration::minutes(i);
            let task = task_due("alice", &format!("t{i}"), now() + Duration::days(3), created);
            repo.create_task(&task).await.unwrap();
        }
        repo.create_task(&task_due("bob", "other", now() + Duration::days(3), now()))
            .await
            .unwrap();

        let first = repo.list_tasks("alice", None).await.unwrap();
        let titles: Vec<_> = first.items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["t4", "t3"]);

        let cursor = first.last_evaluated_key.unwrap();
        let token = cursor.encode();
        let second = repo
            .list_tasks("alice", Some(&PageCursor::decode(&token).unwrap()))
            .await
            .unwrap();
        let titles: Vec<_> = second.items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["t2", "t1"]);

        let third = repo
            .list_tasks("alice", second.last_evaluated_key.as_ref())
            .await
            .unwrap();
        assert_eq!(third.items.len(), 1);
        assert!(third.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn test_tasks_due_on_filters_sent_and_completed() {
        let repo = InMemoryRepository::new();
        let due = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();

        let pending = task_due("alice", "pending", due, now());
        let mut sent = task_due("alice", "sent", due, now());
        sent.mark_notification_sent();
        let mut done = task_due("alice", "done", due, now());
        done.status = TaskStatus::Completed;
        let later = task_due("alice", "later", due + Duration::days(1), now());

        for task in [&pending, &sent, &done, &later] {
            repo.create_task(task).await.unwrap();
        }

        let found = repo.tasks_due_on(due.date_naive()).await.unwrap();
        assert_eq!(found, vec![pending]);
    }

    #[tokio::test]
    async fn test_mark_notification_sent() {
        let repo = InMemoryRepository::new();
        let task = task_due("alice", "Pay rent", now() + Duration::days(1), now());
        repo.create_task(&task).await.unwrap();

        repo.mark_notification_sent("alice", &task.sk).await.unwrap();

        let stored = repo.get_task("alice", &task.sk).await.unwrap().unwrap();
        assert!(stored.notification_sent);
        assert!(stored.due_date_notification_sent.ends_with("_true"));
        assert!(matches!(
            repo.mark_notification_sent("alice", "TASK#nope").await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    // ==================== User Tests ====================

    #[tokio::test]
    async fn test_user_create_overwrites_and_get() {
        let repo = InMemoryRepository::new();
        repo.create_user(&user("sub-1", "old@example.com"))
            .await
            .unwrap();
        repo.create_user(&user("sub-1", "new@example.com"))
            .await
            .unwrap();

        let stored = repo.get_user("sub-1").await.unwrap().unwrap();
        assert_eq!(stored.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_user_get_by_email() {
        let repo = InMemoryRepository::new();
        repo.create_user(&user("sub-1", "ana@example.com"))
            .await
            .unwrap();

        let found = repo.get_user_by_email("ana@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.pk), Some("USER#sub-1".to_string()));
        assert!(repo
            .get_user_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_user_update() {
        let repo = InMemoryRepository::new();
        repo.create_user(&user("sub-1", "ana@example.com"))
            .await
            .unwrap();

        let input = UpdateUserInput {
            notification_preferences: Some(NotificationPreferences {
                email: true,
                sms: false,
            }),
            ..Default::default()
        };
        let updated = repo
            .update_user("sub-1", &UserUpdate::from_input(&input, now()))
            .await
            .unwrap();
        assert!(updated.notification_preferences.email);

        let missing = repo
            .update_user("ghost", &UserUpdate::from_input(&input, now()))
            .await;
        assert!(matches!(missing, Err(RepositoryError::NotFound { .. })));
    }

    // ==================== Notification Tests ====================

    #[tokio::test]
    async fn test_notifications_newest_first() {
        let repo = InMemoryRepository::new();
        let older = Notification::new("USER#alice", "TASK#1", now());
        let newer = Notification::new("USER#alice", "TASK#2", now() + Duration::hours(1));
        let foreign = Notification::new("USER#bob", "TASK#3", now());
        for n in [&older, &newer, &foreign] {
            repo.create_notification(n).await.unwrap();
        }

        let page = repo.list_notifications("alice", None).await.unwrap();
        assert_eq!(page.items, vec![newer, older]);
        assert!(page.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn test_notification_duplicate_key_fails() {
        let repo = InMemoryRepository::new();
        let n = Notification::new("USER#alice", "TASK#1", now());
        repo.create_notification(&n).await.unwrap();

        assert!(matches!(
            repo.create_notification(&n).await,
            Err(RepositoryError::AlreadyExists { .. })
        ));
    }
}
