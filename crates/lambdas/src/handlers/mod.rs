pub mod post_confirmation;
pub mod scheduled_notifications;

pub use post_confirmation::{handle_post_confirmation, CONFIRM_SIGN_UP};
pub use scheduled_notifications::{reminder_body, JobResponse, ReminderJob, REMINDER_SUBJECT};
