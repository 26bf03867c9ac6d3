//! Task operations against the store, reconciled into the board.

use std::sync::atomic::{AtomicU64, Ordering};

use doneit_core::{
    BoardTicket, BoardView, Outcome, OwnerId, Partition, Priority, TaskBoard, TaskId, TaskPatch,
    TaskRecord, validate_record,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::TaskError;
use crate::session::SessionProvider;
use crate::status::Statuses;
use crate::task_store::TaskStore;

/// Issues task operations for the signed-in owner and keeps the board in step.
///
/// Every operation returns the terminal [`Outcome`] of that invocation and
/// publishes `Loading` followed by the same outcome on its channel in
/// [`statuses`](Self::statuses). No lock is held while a store call is pending.
pub struct TaskCoordinator<S, A> {
    store: S,
    session: A,
    board: RwLock<TaskBoard>,
    load_seq: AtomicU64,
    statuses: Statuses,
}

impl<S, A> TaskCoordinator<S, A>
where
    S: TaskStore,
    A: SessionProvider,
{
    /// Coordinator with an empty board.
    #[must_use]
    pub fn new(store: S, session: A) -> Self {
        Self::with_board(store, session, TaskBoard::new())
    }

    /// Coordinator starting from a prepared board (e.g. a configured partition).
    #[must_use]
    pub fn with_board(store: S, session: A, board: TaskBoard) -> Self {
        Self {
            store,
            session,
            board: RwLock::new(board),
            load_seq: AtomicU64::new(0),
            statuses: Statuses::default(),
        }
    }

    /// Status channels for every operation.
    #[must_use]
    pub const fn statuses(&self) -> &Statuses {
        &self.statuses
    }

    /// Expose a reference to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Load every task of `owner`, who must be the session owner.
    pub async fn load(&self, owner: &OwnerId) -> Outcome<Vec<TaskRecord>> {
        self.statuses.load.track(self.load_tasks(owner)).await
    }

    /// Load every task of the session owner.
    pub async fn reload(&self) -> Outcome<Vec<TaskRecord>> {
        self.statuses
            .load
            .track(async {
                let owner = self.session_owner()?;
                self.load_tasks(&owner).await
            })
            .await
    }

    /// Create a task owned by the session owner; an empty id is generated.
    pub async fn add(&self, task: TaskRecord) -> Outcome<TaskRecord> {
        self.statuses.add.track(self.add_task(task)).await
    }

    /// Write the editable fields of `task` after re-checking ownership.
    pub async fn update(&self, task: &TaskRecord) -> Outcome<TaskRecord> {
        self.statuses.update.track(self.update_task(task)).await
    }

    /// Delete `task` after re-checking ownership.
    pub async fn delete(&self, task: &TaskRecord) -> Outcome<TaskRecord> {
        self.statuses.delete.track(self.delete_task(task)).await
    }

    /// Flip the completion state of `task` after re-checking ownership.
    pub async fn toggle_done(&self, task: &TaskRecord) -> Outcome<TaskRecord> {
        self.statuses.toggle.track(self.toggle_task(task)).await
    }

    /// Store many records in one atomic batch.
    ///
    /// Records owned by anyone but the session owner are skipped. The payload
    /// is the number of records written.
    pub async fn bulk_store(&self, tasks: Vec<TaskRecord>) -> Outcome<usize> {
        self.statuses.bulk.track(self.store_batch(tasks)).await
    }

    /// Read one task owned by the session owner.
    pub async fn fetch(&self, id: &TaskId) -> Outcome<TaskRecord> {
        self.statuses
            .fetch
            .track(async {
                let owner = self.session_owner()?;
                self.owned_remote(&owner, id, "read").await
            })
            .await
    }

    /// Current board contents for rendering.
    pub async fn view(&self) -> BoardView {
        self.board.read().await.view()
    }

    /// Show another partition.
    pub async fn select_partition(&self, partition: Partition) {
        self.board.write().await.select_partition(partition);
    }

    /// Restrict the view to one priority.
    pub async fn set_priority_filter(&self, priority: Priority) {
        self.board.write().await.set_priority_filter(priority);
    }

    /// Show every priority.
    pub async fn clear_priority_filter(&self) {
        self.board.write().await.clear_priority_filter();
    }

    /// Forget the board; completions of requests already issued are ignored.
    pub async fn discard(&self) {
        self.board.write().await.discard();
        debug!("Discarded task board");
    }

    fn session_owner(&self) -> Result<OwnerId, TaskError> {
        self.session
            .current_owner_id()
            .filter(|owner| !owner.is_empty())
            .ok_or(TaskError::NotAuthenticated)
    }

    async fn ticket(&self) -> BoardTicket {
        self.board.read().await.ticket()
    }

    async fn load_tasks(&self, owner: &OwnerId) -> Result<Vec<TaskRecord>, TaskError> {
        let caller = self.session_owner()?;
        if *owner != caller {
            return Err(TaskError::ForeignOwner(owner.clone()));
        }

        let ticket = self.ticket().await;
        let seq = self.load_seq.fetch_add(1, Ordering::AcqRel) + 1;
        let fetched = self.store.query(&caller).await.map_err(TaskError::store)?;

        let (tasks, foreign): (Vec<_>, Vec<_>) =
            fetched.into_iter().partition(|task| task.is_owned_by(&caller));
        if !foreign.is_empty() {
            warn!(owner = %caller, dropped = foreign.len(), "Dropped tasks owned by another user");
        }

        if self.board.write().await.apply_load(ticket, seq, tasks.clone()) {
            info!(owner = %caller, count = tasks.len(), "Loaded tasks");
        } else {
            debug!(seq, "Ignored stale load");
        }
        Ok(tasks)
    }

    async fn add_task(&self, mut task: TaskRecord) -> Result<TaskRecord, TaskError> {
        let owner = self.session_owner()?;
        validate_record(&task)?;
        if task.id.is_empty() {
            task.id = TaskId::generate();
        }
        task.owner_id = owner.clone();

        let ticket = self.ticket().await;
        let stored = self.store.create(&task).await.map_err(TaskError::store)?;
        if !stored.is_owned_by(&owner) {
            warn!(task = %stored.id, owner = %stored.owner_id, "Store returned a task owned by another user");
            return Err(TaskError::Unauthorized {
                action: "add",
                task: stored.id,
            });
        }

        self.apply_update(ticket, stored.clone()).await;
        info!(task = %stored.id, "Added task");
        Ok(stored)
    }

    async fn update_task(&self, task: &TaskRecord) -> Result<TaskRecord, TaskError> {
        let owner = self.session_owner()?;
        validate_record(task)?;

        let ticket = self.ticket().await;
        let mut remote = self.owned_remote(&owner, &task.id, "update").await?;
        let patch = TaskPatch::editable_fields(task);
        self.store
            .update(&task.id, &patch)
            .await
            .map_err(TaskError::store)?;
        patch.apply_to(&mut remote);

        self.apply_update(ticket, remote.clone()).await;
        info!(task = %remote.id, fields = ?patch.field_names(), "Updated task");
        Ok(remote)
    }

    async fn delete_task(&self, task: &TaskRecord) -> Result<TaskRecord, TaskError> {
        let owner = self.session_owner()?;

        let ticket = self.ticket().await;
        let remote = self.owned_remote(&owner, &task.id, "delete").await?;
        self.store.delete(&task.id).await.map_err(TaskError::store)?;

        if !self.board.write().await.apply_removal(ticket, &remote.id) {
            debug!(task = %remote.id, "Ignored delete issued before discard");
        }
        info!(task = %remote.id, "Deleted task");
        Ok(remote)
    }

    async fn toggle_task(&self, task: &TaskRecord) -> Result<TaskRecord, TaskError> {
        let owner = self.session_owner()?;

        let ticket = self.ticket().await;
        let mut remote = self.owned_remote(&owner, &task.id, "update").await?;
        let patch = TaskPatch::completion(!task.completed);
        self.store
            .update(&task.id, &patch)
            .await
            .map_err(TaskError::store)?;
        patch.apply_to(&mut remote);

        self.apply_update(ticket, remote.clone()).await;
        info!(task = %remote.id, completed = remote.completed, "Toggled task");
        Ok(remote)
    }

    async fn store_batch(&self, tasks: Vec<TaskRecord>) -> Result<usize, TaskError> {
        let owner = self.session_owner()?;

        let requested = tasks.len();
        let mut candidates = Vec::with_capacity(requested);
        for mut task in tasks {
            if !task.is_owned_by(&owner) {
                debug!(task = %task.id, owner = %task.owner_id, "Skipped task owned by another user");
                continue;
            }
            let existing = !task.id.is_empty();
            if !existing {
                task.id = TaskId::generate();
            }
            validate_record(&task)?;
            candidates.push((task, existing));
        }

        let ticket = self.ticket().await;
        let mut owned = Vec::with_capacity(candidates.len());
        for (task, existing) in candidates {
            // A caller-supplied id may already name someone else's record.
            if existing {
                let remote = self.store.get(&task.id).await.map_err(TaskError::store)?;
                if let Some(remote) = remote.filter(|remote| !remote.is_owned_by(&owner)) {
                    warn!(task = %task.id, owner = %remote.owner_id, "Skipped task stored under another user");
                    continue;
                }
            }
            owned.push(task);
        }
        if owned.is_empty() {
            debug!(requested, "Nothing to store");
            return Ok(0);
        }

        self.store
            .batch_write(&owned)
            .await
            .map_err(TaskError::store)?;

        let stored = owned.len();
        let mut board = self.board.write().await;
        for task in owned {
            board.apply_update(ticket, task);
        }
        drop(board);

        info!(stored, skipped = requested - stored, "Stored task batch");
        Ok(stored)
    }

    /// Re-read `id` from the store and make sure `owner` may act on it.
    async fn owned_remote(
        &self,
        owner: &OwnerId,
        id: &TaskId,
        action: &'static str,
    ) -> Result<TaskRecord, TaskError> {
        let remote = self
            .store
            .get(id)
            .await
            .map_err(TaskError::store)?
            .ok_or_else(|| TaskError::NotFound(id.clone()))?;
        if !remote.is_owned_by(owner) {
            warn!(task = %id, action, "Refused operation on task owned by another user");
            return Err(TaskError::Unauthorized {
                action,
                task: id.clone(),
            });
        }
        Ok(remote)
    }

    async fn apply_update(&self, ticket: BoardTicket, task: TaskRecord) {
        let id = task.id.clone();
        if !self.board.write().await.apply_update(ticket, task) {
            debug!(task = %id, "Ignored write issued before discard");
        }
    }
}
