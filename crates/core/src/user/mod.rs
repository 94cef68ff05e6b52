mod requests;
mod types;

pub use requests::{
    validate_create_user, CreateUserInput, ResolverError, UpdateUserInput, UserResponse,
    UserUpdate,
};
pub use types::{NotificationPreferences, User};
