use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use taskd_types::{Task, TaskDraft, TaskId};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::page::{Page, PageInfo, PageRequest};
use crate::traits::TaskStore;

/// In-memory task store.
///
/// Tasks sit in a `Vec` in insertion order, and a `HashMap` maps each id to
/// its slot. Both live in one [`TaskTable`] behind a single `RwLock`, so
/// writers replace them as a unit and readers always see them agree.
///
/// Deleting swaps the last task into the vacated slot (O(1)). After a delete
/// the vector is no longer strictly in insertion order.
pub struct InMemoryTaskStore {
    table: RwLock<TaskTable>,
}

/// The record vector and its position index.
#[derive(Default)]
struct TaskTable {
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
}

impl TaskTable {
    fn position(&self, id: &TaskId) -> StoreResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or(StoreError::NotFound(*id))
    }

    fn push(&mut self, task: Task) {
        self.index.insert(task.id, self.tasks.len());
        self.tasks.push(task);
    }

    /// Remove `id`, moving the last task into its slot.
    fn swap_remove(&mut self, id: &TaskId) -> StoreResult<Task> {
        let slot = self.position(id)?;
        let removed = self.tasks.swap_remove(slot);
        // If the removed task was not last, the old last task now sits at `slot`.
        if let Some(moved) = self.tasks.get(slot) {
            self.index.insert(moved.id, slot);
        }
        self.index.remove(id);
        Ok(removed)
    }

    fn page(&self, request: PageRequest) -> Page<Task> {
        let request = request.normalized();
        let total = self.tasks.len();
        let data = match request.range(total) {
            Some(range) => self.tasks[range].to_vec(),
            None => Vec::new(),
        };
        Page {
            data,
            pagination: PageInfo::compute(request, total),
        }
    }

    fn clear(&mut self) {
        self.tasks.clear();
        self.index.clear();
    }

    fn check_integrity(&self) -> StoreResult<()> {
        if self.tasks.len() != self.index.len() {
            return Err(StoreError::IntegrityViolation {
                slot: self.tasks.len(),
                reason: format!(
                    "{} tasks but {} index entries",
                    self.tasks.len(),
                    self.index.len()
                ),
            });
        }
        for (slot, task) in self.tasks.iter().enumerate() {
            match self.index.get(&task.id) {
                Some(&indexed) if indexed == slot => {}
                Some(&indexed) => {
                    return Err(StoreError::IntegrityViolation {
                        slot,
                        reason: format!("task {} indexed at slot {indexed}", task.id),
                    });
                }
                None => {
                    return Err(StoreError::IntegrityViolation {
                        slot,
                        reason: format!("task {} missing from index", task.id),
                    });
                }
            }
        }
        Ok(())
    }
}

impl InMemoryTaskStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(TaskTable::default()),
        }
    }

    /// Number of tasks currently stored.
    pub fn len(&self) -> usize {
        match self.table.read() {
            Ok(table) => table.tasks.len(),
            Err(poisoned) => poisoned.into_inner().tasks.len(),
        }
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verify that every task is indexed at its own slot and nothing else is
    /// indexed.
    pub fn check_integrity(&self) -> StoreResult<()> {
        self.read_table()?.check_integrity()
    }

    fn read_table(&self) -> StoreResult<RwLockReadGuard<'_, TaskTable>> {
        self.table.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_table(&self) -> StoreResult<RwLockWriteGuard<'_, TaskTable>> {
        self.table.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn list(&self, request: PageRequest) -> StoreResult<Page<Task>> {
        Ok(self.read_table()?.page(request))
    }

    fn get(&self, id: &TaskId) -> StoreResult<Task> {
        let table = self.read_table()?;
        let slot = table.position(id)?;
        Ok(table.tasks[slot].clone())
    }

    fn create(&self, draft: TaskDraft) -> StoreResult<Task> {
        let task = Task::from_draft(TaskId::generate(), draft);
        self.write_table()?.push(task.clone());
        debug!(id = %task.id, "task created");
        Ok(task)
    }

    fn update(&self, id: &TaskId, draft: TaskDraft) -> StoreResult<Task> {
        let mut table = self.write_table()?;
        let slot = table.position(id)?;
        let task = &mut table.tasks[slot];
        task.apply(draft);
        debug!(id = %id, slot, "task updated");
        Ok(task.clone())
    }

    fn delete(&self, id: &TaskId) -> StoreResult<()> {
        self.write_table()?.swap_remove(id)?;
        debug!(id = %id, "task deleted");
        Ok(())
    }

    fn delete_all(&self) -> StoreResult<()> {
        let mut table = self.write_table()?;
        let count = table.tasks.len();
        table.clear();
        debug!(count, "all tasks deleted");
        Ok(())
    }

    fn exists(&self, id: &TaskId) -> StoreResult<bool> {
        Ok(self.read_table()?.index.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTaskStore")
            .field("task_count", &self.len())
            .finish()
    }
}
