use thiserror::Error;

/// Failures reported by a `UserRepository`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store rejected the write because the email is already taken.
    #[error("email already taken: {0}")]
    Conflict(String),
    #[error("repository error: {0}")]
    Backend(String),
}

impl RepositoryError {
    /// Human-readable failure text, never empty.
    pub fn detail(&self) -> String {
        let raw = match self {
            RepositoryError::Conflict(msg) | RepositoryError::Backend(msg) => msg.trim(),
        };
        if raw.is_empty() {
            "unknown persistence failure".to_string()
        } else {
            raw.to_string()
        }
    }
}

impl From<models::errors::ModelError> for RepositoryError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::UniqueViolation(msg) => RepositoryError::Conflict(msg),
            other => RepositoryError::Backend(other.to_string()),
        }
    }
}
