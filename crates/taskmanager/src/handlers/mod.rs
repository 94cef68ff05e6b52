pub mod error;
pub mod notifications;
pub mod tasks;
pub mod users;

use serde::Deserialize;
use taskmanager_core::storage::{PageCursor, RepositoryError};

pub use error::AppError;

/// `?lastEvaluatedKey=<cursor>` on list routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub last_evaluated_key: Option<String>,
}

impl PageQuery {
    pub fn cursor(&self) -> Result<Option<PageCursor>, RepositoryError> {
        self.last_evaluated_key
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(PageCursor::decode)
            .transpose()
    }
}
