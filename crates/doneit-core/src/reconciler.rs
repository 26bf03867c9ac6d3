//! In-memory task set split into completion-state partitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::TaskRecord;
use crate::id::TaskId;

/// Completion-state bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Tasks with `completed == false`.
    #[default]
    Incomplete,
    /// Tasks with `completed == true`.
    Complete,
}

impl Partition {
    /// Partition a record belongs to.
    #[must_use]
    pub const fn of(task: &TaskRecord) -> Self {
        if task.completed { Self::Complete } else { Self::Incomplete }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
        }
    }
}

/// Owns the canonical task list and its two partitions.
///
/// `incomplete` and `complete` always split `all` without overlap or omission.
/// Every mutation goes through [`replace_all`](Self::replace_all),
/// [`apply_update`](Self::apply_update) or [`apply_removal`](Self::apply_removal);
/// none of them can fail.
#[derive(Debug, Default, Clone)]
pub struct TaskListReconciler {
    all: Vec<TaskRecord>,
    index: HashMap<TaskId, usize>,
    incomplete: Vec<TaskId>,
    complete: Vec<TaskId>,
}

impl TaskListReconciler {
    /// Build a reconciler from a full task list.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = TaskRecord>) -> Self {
        let mut reconciler = Self::default();
        reconciler.replace_all(tasks);
        reconciler
    }

    /// Discard prior state and repartition every record.
    ///
    /// A repeated id keeps its first position and its last value.
    pub fn replace_all(&mut self, tasks: impl IntoIterator<Item = TaskRecord>) {
        self.all.clear();
        self.index.clear();

        for task in tasks {
            if let Some(&idx) = self.index.get(&task.id) {
                self.all[idx] = task;
            } else {
                self.index.insert(task.id.clone(), self.all.len());
                self.all.push(task);
            }
        }

        self.rebuild_partitions();
    }

    /// Insert or replace a single record.
    ///
    /// The record leaves whichever partition held it and is appended to the
    /// partition matching its `completed` flag. Applying the same record twice
    /// leaves the same state as applying it once.
    pub fn apply_update(&mut self, task: TaskRecord) {
        let id = task.id.clone();
        let target = Partition::of(&task);

        if let Some(&idx) = self.index.get(&id) {
            self.all[idx] = task;
        } else {
            self.index.insert(id.clone(), self.all.len());
            self.all.push(task);
        }

        self.incomplete.retain(|existing| *existing != id);
        self.complete.retain(|existing| *existing != id);
        self.bucket_mut(target).push(id);
    }

    /// Remove a record if present. Returns whether anything was removed.
    pub fn apply_removal(&mut self, id: &TaskId) -> bool {
        let Some(idx) = self.index.remove(id) else {
            return false;
        };

        self.all.remove(idx);
        for (pos, task) in self.all.iter().enumerate().skip(idx) {
            self.index.insert(task.id.clone(), pos);
        }
        self.incomplete.retain(|existing| existing != id);
        self.complete.retain(|existing| existing != id);
        true
    }

    fn rebuild_partitions(&mut self) {
        self.incomplete.clear();
        self.complete.clear();

        for task in &self.all {
            match Partition::of(task) {
                Partition::Incomplete => self.incomplete.push(task.id.clone()),
                Partition::Complete => self.complete.push(task.id.clone()),
            }
        }
    }

    fn bucket(&self, partition: Partition) -> &[TaskId] {
        match partition {
            Partition::Incomplete => &self.incomplete,
            Partition::Complete => &self.complete,
        }
    }

    fn bucket_mut(&mut self, partition: Partition) -> &mut Vec<TaskId> {
        match partition {
            Partition::Incomplete => &mut self.incomplete,
            Partition::Complete => &mut self.complete,
        }
    }

    /// Every record in load order.
    #[must_use]
    pub fn all(&self) -> &[TaskRecord] {
        &self.all
    }

    /// Records of one partition in partition order.
    pub fn partition(&self, partition: Partition) -> impl Iterator<Item = &TaskRecord> {
        self.bucket(partition).iter().filter_map(|id| self.get(id))
    }

    /// Ids of one partition in partition order.
    #[must_use]
    pub fn partition_ids(&self, partition: Partition) -> Vec<TaskId> {
        self.bucket(partition).to_vec()
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&TaskRecord> {
        self.index.get(id).and_then(|&idx| self.all.get(idx))
    }

    /// Returns true when a record with `id` is held.
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of held records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns true when nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
