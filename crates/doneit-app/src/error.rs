//! Error type for coordinator operations.

use doneit_core::{Failure, FailureKind, OwnerId, TaskId, ValidationError};
use thiserror::Error;

/// Why a task operation did not succeed.
#[derive(Debug, Error)]
pub enum TaskError {
    /// No session owner is available.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The stored record belongs to someone else.
    #[error("unauthorized to {action} task {task}")]
    Unauthorized {
        /// Attempted operation.
        action: &'static str,
        /// Target task.
        task: TaskId,
    },
    /// Listing tasks for an owner other than the session owner.
    #[error("unauthorized to load tasks of {0}")]
    ForeignOwner(OwnerId),
    /// A point lookup found nothing.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// Backing store failure, message passed through verbatim.
    #[error("{0}")]
    Store(String),
    /// Input rejected before any store call.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl TaskError {
    /// Wrap a store-specific error.
    pub fn store<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::Store(err.into().to_string())
    }

    /// Failure classification.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::NotAuthenticated => FailureKind::NotAuthenticated,
            Self::Unauthorized { .. } | Self::ForeignOwner(_) => FailureKind::Unauthorized,
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Store(_) => FailureKind::Store,
            Self::Validation(_) => FailureKind::Validation,
        }
    }
}

impl From<TaskError> for Failure {
    fn from(err: TaskError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_keep_kind_and_message() {
        let failure = Failure::from(TaskError::Unauthorized {
            action: "update",
            task: TaskId::from("t-1"),
        });
        assert_eq!(failure.kind, FailureKind::Unauthorized);
        assert_eq!(failure.message, "unauthorized to update task t-1");
    }

    #[test]
    fn store_errors_pass_message_through() {
        let err = TaskError::store(anyhow::anyhow!("quota exceeded"));
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(err.kind(), FailureKind::Store);
    }

    #[test]
    fn validation_errors_convert() {
        let failure = Failure::from(TaskError::from(ValidationError::EmptyTitle));
        assert_eq!(failure.kind, FailureKind::Validation);
        assert_eq!(failure.message, "task name is required");
    }
}
