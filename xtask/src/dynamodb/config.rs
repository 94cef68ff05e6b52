//! Table configuration types (Functional Core - pure data).

use taskmanager_storage::dynamodb::{
    DEFAULT_TABLE_NAME, EMAIL_INDEX, NOTIFICATION_TIMESTAMP_INDEX, TASK_DUE_NOTIFICATION_INDEX,
    UPDATED_AT_INDEX,
};

/// Attribute holding the notification expiry epoch.
pub const TTL_ATTRIBUTE: &str = "NotificationExpiry";

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub gsis: Vec<GsiConfig>,
    /// Attribute DynamoDB expires items by, if any.
    pub ttl_attribute: Option<String>,
}

/// A string key attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
}

impl KeyAttribute {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Global Secondary Index configuration. Every index projects all attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiConfig {
    pub name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
}

impl GsiConfig {
    fn new(name: &str, partition_key: &str, sort_key: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            partition_key: KeyAttribute::named(partition_key),
            sort_key: sort_key.map(KeyAttribute::named),
        }
    }

    /// Names of the key attributes, partition key first.
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.partition_key.name.as_str())
            .chain(self.sort_key.iter().map(|k| k.name.as_str()))
    }
}

impl TableConfig {
    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }

    /// Every attribute used as a key by the table or one of its indexes, deduplicated.
    pub fn key_attribute_names(&self) -> Vec<&str> {
        let mut names = vec![self.partition_key.name.as_str()];
        names.extend(self.sort_key.iter().map(|k| k.name.as_str()));
        for name in self.gsis.iter().flat_map(|g| g.key_names()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Returns the table layout the task manager stores users, tasks and
/// notifications in.
pub fn task_management_table_config() -> TableConfig {
    TableConfig {
        table_name: DEFAULT_TABLE_NAME.to_string(),
        partition_key: KeyAttribute::named("PK"),
        sort_key: Some(KeyAttribute::named("SK")),
        gsis: vec![
            GsiConfig::new(UPDATED_AT_INDEX, "PK", Some("TaskUpdatedAt")),
            GsiConfig::new(
                NOTIFICATION_TIMESTAMP_INDEX,
                "PK",
                Some("NotificationTimestamp"),
            ),
            GsiConfig::new(EMAIL_INDEX, "Email", None),
            GsiConfig::new(TASK_DUE_NOTIFICATION_INDEX, "DueDateShort", None),
        ],
        ttl_attribute: Some(TTL_ATTRIBUTE.to_string()),
    }
}
