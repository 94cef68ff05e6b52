mod error;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use traits::{NotificationRepository, TaskRepository, UserRepository};
pub use types::{Page, PageCursor};
