//! Domain Layer - Errors
//!
//! Every variant describes a rejected intent. The engine guarantees that an
//! operation returning an error left the planner state untouched.

use thiserror::Error;

use super::category::Category;
use super::task::TaskId;

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The task id has no registry entry
    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),

    #[error("Capacity exceeded: {category} allows {limit} open tasks")]
    CapacityExceeded { category: Category, limit: u32 },

    /// Empty or whitespace-only title
    #[error("Invalid title: title must not be empty")]
    InvalidTitle,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence backend failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        DomainError::Storage(err.to_string())
    }
}
