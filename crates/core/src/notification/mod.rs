mod types;

pub use types::{CreateNotificationRequest, Notification, NOTIFICATION_RETENTION_DAYS};
