//! Task Cache
//!
//! Owned snapshot of the last known collection. The snapshot is never
//! mutated in place: every effective change builds a new `Vec` and swaps
//! the `Arc`, so a reader holding a snapshot never sees a half-applied
//! update.

use std::collections::HashSet;
use std::sync::Arc;

use crate::models::{Snapshot, Task, TaskId};

#[derive(Debug, Default)]
pub struct TaskCache {
    snapshot: Option<Snapshot>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, or `None` if the collection was never loaded.
    pub fn get(&self) -> Option<Snapshot> {
        self.snapshot.clone()
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|tasks| tasks.iter().any(|task| &task.id == id))
    }

    /// Overwrite the whole snapshot. Duplicate ids keep their first occurrence.
    pub fn replace(&mut self, tasks: Vec<Task>) {
        let mut seen = HashSet::with_capacity(tasks.len());
        let total = tasks.len();
        let unique: Vec<Task> = tasks
            .into_iter()
            .filter(|task| seen.insert(task.id.clone()))
            .collect();
        if unique.len() != total {
            log::warn!(
                "dropped {} task(s) with duplicate ids from the collection",
                total - unique.len()
            );
        }
        self.snapshot = Some(Arc::new(unique));
    }

    /// Overlay `task` onto the entry with the same id. Returns false (and
    /// leaves the snapshot untouched) when there is no such entry.
    pub fn apply_update(&mut self, task: &Task) -> bool {
        let Some(current) = &self.snapshot else {
            return false;
        };
        let Some(index) = current.iter().position(|existing| existing.id == task.id) else {
            return false;
        };

        let mut next = current.as_ref().clone();
        next[index] = current[index].merged_with(task);
        self.snapshot = Some(Arc::new(next));
        true
    }

    /// Remove the entry with `id`, keeping the order of the rest. Returns
    /// false when there is no such entry.
    pub fn apply_delete(&mut self, id: &TaskId) -> bool {
        let Some(current) = &self.snapshot else {
            return false;
        };
        if !current.iter().any(|task| &task.id == id) {
            return false;
        }

        let next: Vec<Task> = current.iter().filter(|task| &task.id != id).cloned().collect();
        self.snapshot = Some(Arc::new(next));
        true
    }
}
