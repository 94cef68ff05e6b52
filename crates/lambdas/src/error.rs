use taskmanager_core::storage::RepositoryError;
use thiserror::Error;

/// Errors raised by the lambda handlers and their adapters.
#[derive(Debug, Error)]
pub enum LambdaError {
    #[error("User attributes are missing")]
    MissingAttributes,

    #[error("{0} environment variable is not set.")]
    MissingConfig(&'static str),

    #[error("Error adding user to the database")]
    UserNotSaved(#[source] RepositoryError),

    #[error(transparent)]
    Storage(#[from] RepositoryError),

    #[error("Failed to send email: {0}")]
    Mail(String),

    #[error("Service call failed: {0}")]
    Service(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            LambdaError::MissingAttributes.to_string(),
            "User attributes are missing"
        );
        assert_eq!(
            LambdaError::MissingConfig("TASK_MICROSERVICE_API_URL").to_string(),
            "TASK_MICROSERVICE_API_URL environment variable is not set."
        );
        assert_eq!(
            LambdaError::UserNotSaved(RepositoryError::ConnectionFailed("x".to_string()))
                .to_string(),
            "Error adding user to the database"
        );
    }
}
