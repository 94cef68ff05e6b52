use thiserror::Error;

/// Failure of a repository call, independent of the backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    /// The backend could not be reached at all.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// A stored item could not be turned back into a domain type.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Caller-supplied data was rejected, e.g. a malformed pagination cursor.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// HTTP status a route reports this failure with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::AlreadyExists { .. } => 409,
            Self::InvalidData(_) => 400,
            Self::ConnectionFailed(_) => 503,
            Self::QueryFailed(_) | Self::Serialization(_) => 500,
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
