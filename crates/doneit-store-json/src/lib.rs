//! Document-map task store for doneit, optionally mirrored to a JSON file.

pub mod error;

use doneit_core::{OwnerId, TaskId, TaskPatch, TaskRecord};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub use error::JsonStoreError;

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, JsonStoreError>;

type TaskMap = BTreeMap<TaskId, TaskRecord>;

/// Task documents keyed by id.
///
/// Clones share the same underlying map. When opened from a path, every
/// successful write rewrites the whole file before the in-memory map changes,
/// so a failed write leaves both untouched.
#[derive(Clone, Debug)]
pub struct JsonStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    path: Option<PathBuf>,
    tasks: TaskMap,
}

impl JsonStore {
    /// Store that lives only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_parts(None, TaskMap::new())
    }

    /// Open the store mirrored at `path`; a missing file starts empty.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tasks = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                TaskMap::new()
            } else {
                let records: Vec<TaskRecord> = serde_json::from_str(&contents)?;
                records
                    .into_iter()
                    .map(|record| (record.id.clone(), record))
                    .collect()
            }
        } else {
            TaskMap::new()
        };
        debug!(path = %path.display(), tasks = tasks.len(), "Opened task file");
        Ok(Self::from_parts(Some(path), tasks))
    }

    fn from_parts(path: Option<PathBuf>, tasks: TaskMap) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { path, tasks })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| JsonStoreError::LockError)
    }

    /// Backing file, if any.
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned.
    pub fn path(&self) -> Result<Option<PathBuf>> {
        Ok(self.lock()?.path.clone())
    }

    /// Insert a new record.
    ///
    /// # Errors
    /// Fails when the id is empty or already taken, or the file cannot be written.
    pub fn create(&self, task: &TaskRecord) -> Result<TaskRecord> {
        if task.id.is_empty() {
            return Err(JsonStoreError::EmptyTaskId);
        }
        let mut inner = self.lock()?;
        if inner.tasks.contains_key(&task.id) {
            return Err(JsonStoreError::TaskExists(task.id.to_string()));
        }

        let mut next = inner.tasks.clone();
        next.insert(task.id.clone(), task.clone());
        inner.commit(next)?;

        info!(task = %task.id, owner = %task.owner_id, "Created task");
        Ok(task.clone())
    }

    /// Fetch one record.
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned.
    pub fn get(&self, id: &TaskId) -> Result<Option<TaskRecord>> {
        Ok(self.lock()?.tasks.get(id).cloned())
    }

    /// Merge `patch` into an existing record.
    ///
    /// # Errors
    /// Fails when the record does not exist or the file cannot be written.
    pub fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<()> {
        let mut inner = self.lock()?;
        let mut next = inner.tasks.clone();
        let record = next
            .get_mut(id)
            .ok_or_else(|| JsonStoreError::TaskNotFound(id.to_string()))?;
        patch.apply_to(record);
        inner.commit(next)?;

        info!(task = %id, fields = ?patch.field_names(), "Updated task");
        Ok(())
    }

    /// Remove a record; removing a missing id succeeds.
    ///
    /// # Errors
    /// Fails when the file cannot be written.
    pub fn delete(&self, id: &TaskId) -> Result<()> {
        let mut inner = self.lock()?;
        if !inner.tasks.contains_key(id) {
            debug!(task = %id, "Delete of missing task ignored");
            return Ok(());
        }
        let mut next = inner.tasks.clone();
        next.remove(id);
        inner.commit(next)?;

        info!(task = %id, "Deleted task");
        Ok(())
    }

    /// Every record owned by `owner`.
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned.
    pub fn query(&self, owner: &OwnerId) -> Result<Vec<TaskRecord>> {
        Ok(self
            .lock()?
            .tasks
            .values()
            .filter(|task| task.is_owned_by(owner))
            .cloned()
            .collect())
    }

    /// Upsert many records as one all-or-nothing write.
    ///
    /// # Errors
    /// Fails without writing anything when any record has an empty id, would
    /// change the owner of a stored record, or the file cannot be written.
    pub fn batch_write(&self, records: &[TaskRecord]) -> Result<()> {
        if records.iter().any(|record| record.id.is_empty()) {
            return Err(JsonStoreError::EmptyTaskId);
        }
        let mut inner = self.lock()?;
        let mut next = inner.tasks.clone();
        for record in records {
            if next
                .get(&record.id)
                .is_some_and(|stored| stored.owner_id != record.owner_id)
            {
                return Err(JsonStoreError::OwnerMismatch(record.id.to_string()));
            }
            next.insert(record.id.clone(), record.clone());
        }
        inner.commit(next)?;

        info!(count = records.len(), "Stored task batch");
        Ok(())
    }

    /// Number of stored records.
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.tasks.len())
    }

    /// Returns true when the store holds no records.
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.tasks.is_empty())
    }
}

impl Inner {
    /// Mirror `next` to disk, then make it the live map.
    fn commit(&mut self, next: TaskMap) -> Result<()> {
        if let Some(path) = &self.path {
            write_file(path, &next)?;
        }
        self.tasks = next;
        Ok(())
    }
}

fn write_file(path: &Path, tasks: &TaskMap) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let records: Vec<&TaskRecord> = tasks.values().collect();
    let file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(file.as_file());
        serde_json::to_writer_pretty(&mut writer, &records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    file.as_file().sync_all()?;
    file.persist(path)?;
    Ok(())
}
