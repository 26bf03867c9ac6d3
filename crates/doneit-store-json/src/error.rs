//! Error types for doneit store operations.

use thiserror::Error;

/// Errors that can occur during `JsonStore` operations.
#[derive(Error, Debug)]
pub enum JsonStoreError {
    /// Task was not found in the store.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// A task with the same id already exists.
    #[error("Task already exists: {0}")]
    TaskExists(String),

    /// The record has no id.
    #[error("Task id must not be empty")]
    EmptyTaskId,

    /// A write would move an existing record to another owner.
    #[error("Task {0} belongs to another owner")]
    OwnerMismatch(String),

    /// Failed to parse or serialize the backing file.
    #[error("Invalid task file: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to move the rewritten file into place.
    #[error("Failed to persist task file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Failed to acquire the store lock.
    #[error("Store lock error")]
    LockError,

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other unclassified error.
    #[error("Other error: {0}")]
    Other(String),
}
