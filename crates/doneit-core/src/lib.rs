//! Domain types and view-state logic for doneit task lists.

/// Board view state (partition, filter, staleness guards).
pub mod board;
/// Due date type.
pub mod due_date;
/// Identifier types.
pub mod id;
/// Tri-state operation outcome.
pub mod outcome;
/// Field-level task writes.
pub mod patch;
/// Filter and sort pipeline.
pub mod pipeline;
/// Priority labels.
pub mod priority;
/// Completion-state reconciler.
pub mod reconciler;
mod record;
pub mod validate;

pub use board::{BoardTicket, BoardView, TaskBoard};
pub use due_date::DueDate;
pub use id::{OwnerId, TaskId};
pub use outcome::{Failure, FailureKind, Outcome};
pub use patch::TaskPatch;
pub use pipeline::{empty_message, render};
pub use priority::Priority;
pub use reconciler::{Partition, TaskListReconciler};
pub use record::TaskRecord;
pub use validate::{ValidationError, validate_record};
