use serde::{Deserialize, Serialize};

use crate::due_date::{self, DueDate};
use crate::id::{OwnerId, TaskId};
use crate::priority::Priority;

/// A persisted task as held by the store and mirrored in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Store-wide identifier (empty until assigned).
    #[serde(default)]
    pub id: TaskId,
    /// Identity of the owner, stamped at creation.
    #[serde(default)]
    pub owner_id: OwnerId,
    /// Short human-readable title.
    pub title: String,
    /// Optional free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Priority label.
    pub priority: Priority,
    /// Optional due date (`dd-MM-yyyy` on the wire).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "due_date::deserialize_optional"
    )]
    pub due_date: Option<DueDate>,
    /// Optional location text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
}

impl TaskRecord {
    /// Draft a new, incomplete task without id or owner.
    #[must_use]
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: TaskId::default(),
            owner_id: OwnerId::default(),
            title: title.into(),
            description: None,
            priority,
            due_date: None,
            location: None,
            completed: false,
        }
    }

    /// Set the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the owner.
    #[must_use]
    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner_id = owner;
        self
    }

    /// Set the description (blank text clears it).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into());
        self
    }

    /// Set the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DueDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the location (blank text clears it).
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = non_blank(location.into());
        self
    }

    /// Set the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Returns true when `owner` owns this record.
    #[must_use]
    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        self.owner_id == *owner
    }
}

fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}
