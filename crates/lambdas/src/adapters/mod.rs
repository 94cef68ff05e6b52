//! Outbound side effects of the reminder job.

pub mod mailer;
pub mod services;

pub use mailer::{Mailer, SesMailer};
pub use services::{HttpServiceClient, ServiceClient};
