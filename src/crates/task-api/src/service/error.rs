//! Task service error taxonomy

use thiserror::Error;

use crate::db::DatabaseError;

/// Failure of a task lifecycle operation
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Malformed or missing input, or an unrecognized enumeration value
    #[error("{0}")]
    Validation(String),

    /// No task with the given id
    #[error("Task not found with id: {0}")]
    NotFound(i64),

    /// The store failed; not retried
    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

impl TaskServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TaskServiceError::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskServiceError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TaskServiceError::Validation(_))
    }
}

/// Result type for task service operations
pub type ServiceResult<T> = std::result::Result<T, TaskServiceError>;
