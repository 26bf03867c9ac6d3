use crate::TaskRecord;
use crate::due_date::DueDate;
use crate::priority::Priority;

/// Field-level write sent to a store's `update`.
///
/// `None` leaves a field untouched. For the optional text fields and the due
/// date, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Overwrite the title.
    pub title: Option<String>,
    /// Overwrite or clear the description.
    pub description: Option<Option<String>>,
    /// Overwrite the priority.
    pub priority: Option<Priority>,
    /// Overwrite or clear the due date.
    pub due_date: Option<Option<DueDate>>,
    /// Overwrite or clear the location.
    pub location: Option<Option<String>>,
    /// Overwrite the completion flag.
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Patch carrying every user-editable field of `task`.
    ///
    /// Never touches `completed` or the owner.
    #[must_use]
    pub fn editable_fields(task: &TaskRecord) -> Self {
        Self {
            title: Some(task.title.clone()),
            description: Some(task.description.clone()),
            priority: Some(task.priority.clone()),
            due_date: Some(task.due_date),
            location: Some(task.location.clone()),
            completed: None,
        }
    }

    /// Patch that only sets the completion flag.
    #[must_use]
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Returns true when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.location.is_none()
            && self.completed.is_none()
    }

    /// Names of the fields this patch writes, in record order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.title.is_some() {
            names.push("title");
        }
        if self.description.is_some() {
            names.push("description");
        }
        if self.priority.is_some() {
            names.push("priority");
        }
        if self.due_date.is_some() {
            names.push("dueDate");
        }
        if self.location.is_some() {
            names.push("location");
        }
        if self.completed.is_some() {
            names.push("completed");
        }
        names
    }

    /// Merge the patch into `task`.
    pub fn apply_to(&self, task: &mut TaskRecord) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(priority) = &self.priority {
            task.priority = priority.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(location) = &self.location {
            task.location.clone_from(location);
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}
