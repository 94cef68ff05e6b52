//! DynamoDB repository implementation.
//!
//! Implements the repository traits from `taskmanager_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use chrono::NaiveDate;

use taskmanager_core::keys;
use taskmanager_core::notification::Notification;
use taskmanager_core::storage::{
    NotificationRepository, Page, PageCursor, RepositoryError, Result, TaskRepository,
    UserRepository,
};
use taskmanager_core::task::{Task, TaskStatus, TaskUpdate};
use taskmanager_core::user::{User, UserUpdate};

use super::conversions::{
    cursor_to_exclusive_start_key, item_to_notification, Item, item_to_task, item_to_user,
    last_evaluated_key_to_cursor, notification_to_item, s, task_to_item, user_to_item,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_update_item_error,
};
use super::expressions::{
    notification_sent_expression, task_update_expression, user_update_expression,
    UpdateExpression,
};

pub const DEFAULT_TABLE_NAME: &str = "TaskManagement";

/// Tasks of a user by `TaskUpdatedAt`.
pub const UPDATED_AT_INDEX: &str = "UpdatedAtIndex";
/// Notifications of a user by `NotificationTimestamp`.
pub const NOTIFICATION_TIMESTAMP_INDEX: &str = "NotificationTimestampIndex";
/// Users by `Email`.
pub const EMAIL_INDEX: &str = "EmailIndex";
/// Tasks by `DueDateShort`.
pub const TASK_DUE_NOTIFICATION_INDEX: &str = "TaskDueNotificationIndex";

/// DynamoDB-based repository implementation.
///
/// Provides async access to DynamoDB storage for all entity types.
#[derive(Debug, Clone)]
pub struct DynamoDbRepository {
    client: Client,
    table_name: String,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a new repository from environment configuration.
    ///
    /// Uses the AWS SDK default credential chain, honors `AWS_ENDPOINT_URL`
    /// for local DynamoDB, and reads the table name from
    /// `DYNAMODB_TABLE_NAME` (defaults to "TaskManagement").
    pub async fn from_env() -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Ok(endpoint) = std::env::var("AWS_ENDPOINT_URL") {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;
        let client = Client::new(&config);
        let table_name = std::env::var("DYNAMODB_TABLE_NAME")
            .unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string());

        Ok(Self::new(client, table_name))
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Newest-first page of one user's items through a per-user index.
    async fn query_partition_desc(
        &self,
        index: &str,
        owner: &str,
        sk_prefix: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<Page<Item>> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(index)
            .key_condition_expression("PK = :pk")
            .filter_expression("begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", s(keys::user_pk(owner)))
            .expression_attribute_values(":sk_prefix", s(sk_prefix))
            .scan_index_forward(false)
            .set_exclusive_start_key(cursor.map(cursor_to_exclusive_start_key))
            .send()
            .await
            .map_err(map_query_error)?;

        let last_evaluated_key = last_evaluated_key_to_cursor(result.last_evaluated_key());
        Ok(Page::new(result.items.unwrap_or_default(), last_evaluated_key))
    }

    async fn update_item(
        &self,
        pk: String,
        sk: String,
        expression: UpdateExpression,
        entity_type: &'static str,
    ) -> Result<Item> {
        let (update_expression, names, values) = expression.into_parts();

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("PK", s(pk))
            .key("SK", s(sk.clone()))
            .update_expression(update_expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .condition_expression("attribute_exists(PK)")
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, entity_type, sk))?;

        result.attributes.ok_or_else(|| {
            RepositoryError::QueryFailed("UpdateItem returned no attributes".to_string())
        })
    }
}

// ============================================================================
// TaskRepository implementation
// ============================================================================

#[async_trait]
impl TaskRepository for DynamoDbRepository {
    async fn list_tasks(&self, owner: &str, cursor: Option<&PageCursor>) -> Result<Page<Task>> {
        let page = self
            .query_partition_desc(UPDATED_AT_INDEX, owner, keys::TASK_PREFIX, cursor)
            .await?;

        let tasks = page.items.iter().map(item_to_task).collect::<Result<_>>()?;
        Ok(Page::new(tasks, page.last_evaluated_key))
    }

    async fn get_task(&self, owner: &str, task_id: &str) -> Result<Option<Task>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", s(keys::user_pk(owner)))
            .key("SK", s(keys::normalize_task_id(task_id)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_task(&item)?)),
            None => Ok(None),
        }
    }

    async fn create_task(&self, task: &Task) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(task_to_item(task)))
            .condition_expression("attribute_not_exists(PK) AND attribute_not_exists(SK)")
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "Task", task.sk.clone()))?;

        Ok(())
    }

    async fn update_task(&self, owner: &str, task_id: &str, update: &TaskUpdate) -> Result<Task> {
        let item = self
            .update_item(
                keys::user_pk(owner),
                keys::normalize_task_id(task_id),
                task_update_expression(update),
                "Task",
            )
            .await?;

        item_to_task(&item)
    }

    async fn delete_task(&self, owner: &str, task_id: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("PK", s(keys::user_pk(owner)))
            .key("SK", s(keys::normalize_task_id(task_id)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }

    async fn tasks_due_on(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        let mut start_key = None;

        loop {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(TASK_DUE_NOTIFICATION_INDEX)
                .key_condition_expression("#dueDateShort = :due_date_short")
                .filter_expression("#notificationSent = :sent AND #status <> :completed")
                .expression_attribute_names("#dueDateShort", "DueDateShort")
                .expression_attribute_names("#notificationSent", "NotificationSent")
                .expression_attribute_names("#status", "Status")
                .expression_attribute_values(
                    ":due_date_short",
                    s(date.format("%Y-%m-%d").to_string()),
                )
                .expression_attribute_values(":sent", AttributeValue::Bool(false))
                .expression_attribute_values(":completed", s(TaskStatus::Completed.as_str()))
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(map_query_error)?;

            for item in result.items() {
                tasks.push(item_to_task(item)?);
            }

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(%date, count = tasks.len(), "Queried tasks due on date");
        Ok(tasks)
    }

    async fn mark_notification_sent(&self, owner: &str, task_id: &str) -> Result<()> {
        let task = self
            .get_task(owner, task_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "Task",
                id: keys::normalize_task_id(task_id),
            })?;

        self.update_item(
            task.pk.clone(),
            task.sk.clone(),
            notification_sent_expression(&task),
            "Task",
        )
        .await?;

        Ok(())
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for DynamoDbRepository {
    async fn get_user(&self, sub: &str) -> Result<Option<User>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", s(keys::user_pk(sub)))
            .key("SK", s(keys::user_sk(sub)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_user(&item)?)),
            None => Ok(None),
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(EMAIL_INDEX)
            .key_condition_expression("Email = :email")
            .expression_attribute_values(":email", s(email))
            .send()
            .await
            .map_err(map_query_error)?;

        match result.items().first() {
            Some(item) => Ok(Some(item_to_user(item)?)),
            None => Ok(None),
        }
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(user_to_item(user)))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "User", user.pk.clone()))?;

        Ok(())
    }

    async fn update_user(&self, sub: &str, update: &UserUpdate) -> Result<User> {
        let item = self
            .update_item(
                keys::user_pk(sub),
                keys::user_sk(sub),
                user_update_expression(update),
                "User",
            )
            .await?;

        item_to_user(&item)
    }
}

// ============================================================================
// NotificationRepository implementation
// ============================================================================

#[async_trait]
impl NotificationRepository for DynamoDbRepository {
    async fn list_notifications(
        &self,
        owner: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<Page<Notification>> {
        let page = self
            .query_partition_desc(
                NOTIFICATION_TIMESTAMP_INDEX,
                owner,
                keys::NOTIFICATION_PREFIX,
                cursor,
            )
            .await?;

        let notifications = page
            .items
            .iter()
            .map(item_to_notification)
            .collect::<Result<_>>()?;
        Ok(Page::new(notifications, page.last_evaluated_key))
    }

    async fn create_notification(&self, notification: &Notification) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(notification_to_item(notification)))
            .condition_expression("attribute_not_exists(PK) AND attribute_not_exists(SK)")
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "Notification", notification.sk.clone()))?;

        Ok(())
    }
}
