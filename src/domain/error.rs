use thiserror::Error;

use super::TaskId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Task with ID {0} already exists")]
    DuplicateId(TaskId),

    #[error("Task {0} not found")]
    NotFound(TaskId),

    #[error("Required field missing: {0}")]
    MissingField(String),

    #[error("Invalid date: {0} (expected YYYY-MM-DD, YYYY-MM-DD HH:MM or RFC 3339)")]
    InvalidDate(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
