//! Async storage abstraction consumed by the coordinator.

use anyhow::Error;
use doneit_core::{OwnerId, TaskId, TaskPatch, TaskRecord};
use doneit_store_json::{JsonStore, JsonStoreError};
use std::sync::Arc;

/// Remote task document store.
///
/// Every call resolves exactly once. Only [`batch_write`](Self::batch_write)
/// touches more than one record, and it succeeds or fails as a whole.
#[allow(async_fn_in_trait)]
pub trait TaskStore: Send + Sync {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error> + Send;

    /// Persist a new record and return it as stored.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    async fn create(&self, task: &TaskRecord) -> Result<TaskRecord, Self::Error>;

    /// Fetch one record, `None` when it does not exist.
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    async fn get(&self, id: &TaskId) -> Result<Option<TaskRecord>, Self::Error>;

    /// Overwrite the fields named by `patch`.
    ///
    /// # Errors
    /// Returns a store-specific error when the record is missing or the write fails.
    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), Self::Error>;

    /// Remove a record.
    ///
    /// # Errors
    /// Returns a store-specific error when the delete fails.
    async fn delete(&self, id: &TaskId) -> Result<(), Self::Error>;

    /// Every record owned by `owner`, in no particular order.
    ///
    /// # Errors
    /// Returns a store-specific error when the query fails.
    async fn query(&self, owner: &OwnerId) -> Result<Vec<TaskRecord>, Self::Error>;

    /// Upsert many records atomically.
    ///
    /// # Errors
    /// Returns a store-specific error when the batch is rejected.
    async fn batch_write(&self, records: &[TaskRecord]) -> Result<(), Self::Error>;
}

impl<S: TaskStore> TaskStore for Arc<S> {
    type Error = S::Error;

    async fn create(&self, task: &TaskRecord) -> Result<TaskRecord, Self::Error> {
        (**self).create(task).await
    }

    async fn get(&self, id: &TaskId) -> Result<Option<TaskRecord>, Self::Error> {
        (**self).get(id).await
    }

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), Self::Error> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &TaskId) -> Result<(), Self::Error> {
        (**self).delete(id).await
    }

    async fn query(&self, owner: &OwnerId) -> Result<Vec<TaskRecord>, Self::Error> {
        (**self).query(owner).await
    }

    async fn batch_write(&self, records: &[TaskRecord]) -> Result<(), Self::Error> {
        (**self).batch_write(records).await
    }
}

/// Run a blocking store call off the async executor.
async fn blocking<T, F>(store: &JsonStore, op: F) -> Result<T, JsonStoreError>
where
    T: Send + 'static,
    F: FnOnce(&JsonStore) -> Result<T, JsonStoreError> + Send + 'static,
{
    // Clones share the map; the file write happens on the blocking pool.
    let store = store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| JsonStoreError::Other(format!("Task join error: {e}")))?
}

impl TaskStore for JsonStore {
    type Error = JsonStoreError;

    async fn create(&self, task: &TaskRecord) -> Result<TaskRecord, Self::Error> {
        let task = task.clone();
        blocking(self, move |store| store.create(&task)).await
    }

    async fn get(&self, id: &TaskId) -> Result<Option<TaskRecord>, Self::Error> {
        let id = id.clone();
        blocking(self, move |store| store.get(&id)).await
    }

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), Self::Error> {
        let id = id.clone();
        let patch = patch.clone();
        blocking(self, move |store| store.update(&id, &patch)).await
    }

    async fn delete(&self, id: &TaskId) -> Result<(), Self::Error> {
        let id = id.clone();
        blocking(self, move |store| store.delete(&id)).await
    }

    async fn query(&self, owner: &OwnerId) -> Result<Vec<TaskRecord>, Self::Error> {
        let owner = owner.clone();
        blocking(self, move |store| store.query(&owner)).await
    }

    async fn batch_write(&self, records: &[TaskRecord]) -> Result<(), Self::Error> {
        let records = records.to_vec();
        blocking(self, move |store| store.batch_write(&records)).await
    }
}
