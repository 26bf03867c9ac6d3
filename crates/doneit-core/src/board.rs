//! Presentation-facing view state built on top of the reconciler.

use crate::TaskRecord;
use crate::id::TaskId;
use crate::pipeline::{empty_message, render};
use crate::priority::Priority;
use crate::reconciler::{Partition, TaskListReconciler};

/// Snapshot of the board generation taken when a request is issued.
///
/// A completion carrying a ticket from before the last [`TaskBoard::discard`]
/// is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardTicket {
    generation: u64,
}

/// Everything a renderer needs to draw the task list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardView {
    /// Partition being shown.
    pub partition: Partition,
    /// Active priority filter.
    pub priority_filter: Option<Priority>,
    /// Filtered, ordered records.
    pub tasks: Vec<TaskRecord>,
    /// Whether done/edit controls apply to the shown records.
    pub show_completion_controls: bool,
    /// Placeholder for an empty list.
    pub empty_message: String,
    /// False until the first load has been applied.
    pub loaded: bool,
}

/// Reconciled task set plus the selected partition and priority filter.
#[derive(Debug, Default)]
pub struct TaskBoard {
    reconciler: TaskListReconciler,
    partition: Partition,
    priority_filter: Option<Priority>,
    loaded: bool,
    generation: u64,
    applied_load: u64,
}

impl TaskBoard {
    /// Empty, unloaded board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current generation for a request about to be issued.
    #[must_use]
    pub const fn ticket(&self) -> BoardTicket {
        BoardTicket {
            generation: self.generation,
        }
    }

    const fn is_current(&self, ticket: BoardTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Replace the task set with a full load result.
    ///
    /// `seq` orders loads by issue time; a load older than the last applied one
    /// is dropped, as is any load issued before a [`discard`](Self::discard).
    /// Accepting a load clears the priority filter. Returns whether it was applied.
    pub fn apply_load(&mut self, ticket: BoardTicket, seq: u64, tasks: Vec<TaskRecord>) -> bool {
        if !self.is_current(ticket) || seq <= self.applied_load {
            return false;
        }
        self.reconciler.replace_all(tasks);
        self.applied_load = seq;
        self.loaded = true;
        self.priority_filter = None;
        true
    }

    /// Apply a single successful write. Returns whether it was applied.
    pub fn apply_update(&mut self, ticket: BoardTicket, task: TaskRecord) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.reconciler.apply_update(task);
        true
    }

    /// Apply a successful delete. Returns whether the ticket was current.
    pub fn apply_removal(&mut self, ticket: BoardTicket, id: &TaskId) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.reconciler.apply_removal(id);
        true
    }

    /// Forget every record and invalidate outstanding tickets.
    pub fn discard(&mut self) {
        self.reconciler = TaskListReconciler::default();
        self.priority_filter = None;
        self.loaded = false;
        self.applied_load = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Show another partition.
    pub const fn select_partition(&mut self, partition: Partition) {
        self.partition = partition;
    }

    /// Restrict the view to one priority.
    pub fn set_priority_filter(&mut self, priority: Priority) {
        self.priority_filter = Some(priority);
    }

    /// Show every priority.
    pub fn clear_priority_filter(&mut self) {
        self.priority_filter = None;
    }

    /// Selected partition.
    #[must_use]
    pub const fn partition(&self) -> Partition {
        self.partition
    }

    /// Active priority filter.
    #[must_use]
    pub const fn priority_filter(&self) -> Option<&Priority> {
        self.priority_filter.as_ref()
    }

    /// Returns true once a load has been applied since the last discard.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Read access to the reconciled task set.
    #[must_use]
    pub const fn reconciler(&self) -> &TaskListReconciler {
        &self.reconciler
    }

    /// Render the selected partition with the active filter.
    #[must_use]
    pub fn view(&self) -> BoardView {
        let filter = self.priority_filter.as_ref();
        let tasks = render(self.reconciler.partition(self.partition), filter)
            .into_iter()
            .cloned()
            .collect();
        BoardView {
            partition: self.partition,
            priority_filter: self.priority_filter.clone(),
            tasks,
            show_completion_controls: self.partition == Partition::Incomplete,
            empty_message: empty_message(filter),
            loaded: self.loaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, priority: Priority, completed: bool) -> TaskRecord {
        TaskRecord::new(format!("task {id}"), priority)
            .with_id(id)
            .with_completed(completed)
    }

    fn view_ids(board: &TaskBoard) -> Vec<String> {
        board.view().tasks.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn view_renders_selected_partition() {
        let mut board = TaskBoard::new();
        let ticket = board.ticket();
        assert!(board.apply_load(
            ticket,
            1,
            vec![
                task("a", Priority::Low, false),
                task("b", Priority::High, false),
                task("c", Priority::High, true),
            ],
        ));

        assert_eq!(view_ids(&board), vec!["b", "a"]);
        assert!(board.view().show_completion_controls);

        board.select_partition(Partition::Complete);
        let view = board.view();
        assert_eq!(view.tasks.len(), 1);
        assert!(!view.show_completion_controls);
    }

    #[test]
    fn unloaded_board_differs_from_empty_result() {
        let mut board = TaskBoard::new();
        assert!(!board.view().loaded);

        let ticket = board.ticket();
        board.apply_load(ticket, 1, Vec::new());
        let view = board.view();
        assert!(view.loaded);
        assert!(view.tasks.is_empty());
        assert_eq!(view.empty_message, "No tasks found");
    }

    #[test]
    fn load_resets_priority_filter() {
        let mut board = TaskBoard::new();
        board.set_priority_filter(Priority::High);
        let ticket = board.ticket();
        board.apply_load(ticket, 1, vec![task("a", Priority::Low, false)]);
        assert_eq!(board.priority_filter(), None);
        assert_eq!(view_ids(&board), vec!["a"]);
    }

    #[test]
    fn filter_narrows_view_and_message() {
        let mut board = TaskBoard::new();
        let ticket = board.ticket();
        board.apply_load(ticket, 1, vec![task("a", Priority::Low, false)]);
        board.set_priority_filter(Priority::High);

        let view = board.view();
        assert!(view.tasks.is_empty());
        assert_eq!(view.empty_message, "No High priority tasks");

        board.clear_priority_filter();
        assert_eq!(view_ids(&board), vec!["a"]);
    }

    #[test]
    fn older_load_does_not_overwrite_newer_one() {
        let mut board = TaskBoard::new();
        let ticket = board.ticket();
        assert!(board.apply_load(ticket, 2, vec![task("new", Priority::High, false)]));
        assert!(!board.apply_load(ticket, 1, vec![task("old", Priority::High, false)]));
        assert_eq!(view_ids(&board), vec!["new"]);
    }

    #[test]
    fn discard_invalidates_outstanding_tickets() {
        let mut board = TaskBoard::new();
        let stale = board.ticket();
        board.apply_load(stale, 1, vec![task("a", Priority::High, false)]);

        board.discard();
        assert!(!board.apply_update(stale, task("b", Priority::High, false)));
        assert!(!board.apply_load(stale, 5, vec![task("c", Priority::High, false)]));
        assert!(board.reconciler().is_empty());
        assert!(!board.is_loaded());

        let fresh = board.ticket();
        assert!(board.apply_update(fresh, task("d", Priority::Low, false)));
        assert_eq!(view_ids(&board), vec!["d"]);
    }

    #[test]
    fn removal_updates_view() {
        let mut board = TaskBoard::new();
        let ticket = board.ticket();
        board.apply_load(ticket, 1, vec![task("a", Priority::High, false), task("b", Priority::Low, false)]);
        assert!(board.apply_removal(ticket, &TaskId::from("a")));
        assert!(board.apply_removal(ticket, &TaskId::from("a")));
        assert_eq!(view_ids(&board), vec!["b"]);
    }
}
