mod operations;
mod requests;
mod types;

pub use operations::{validate_create, validate_update, TaskUpdate};
pub use requests::{CreateTaskInput, GraphQLError, MutationResponse, UpdateTaskInput};
pub use types::{due_date_notification_key, Task, TaskStatus};
