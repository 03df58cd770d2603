use taskd_types::{Task, TaskDraft, TaskId};

use crate::error::{StoreError, StoreResult};
use crate::page::{Page, PageRequest};

/// Storage backend for tasks.
///
/// All implementations must satisfy these invariants:
/// - Every mutation (create, update, delete, delete_all) is atomic with
///   respect to every other operation on the same store.
/// - Reads never observe a partially applied mutation.
/// - Ids are generated by the store; `update` never changes an id.
/// - A missing id is reported as [`StoreError::NotFound`], never as `Ok`.
pub trait TaskStore: Send + Sync {
    /// Return one page of tasks.
    ///
    /// A page past the end yields empty `data` with accurate metadata; it is
    /// not an error.
    fn list(&self, request: PageRequest) -> StoreResult<Page<Task>>;

    /// Fetch a copy of the task with this id.
    fn get(&self, id: &TaskId) -> StoreResult<Task>;

    /// Assign a fresh id to `draft`, append it, and return the stored task.
    fn create(&self, draft: TaskDraft) -> StoreResult<Task>;

    /// Overwrite name and status of an existing task in place.
    fn update(&self, id: &TaskId, draft: TaskDraft) -> StoreResult<Task>;

    /// Remove a task.
    fn delete(&self, id: &TaskId) -> StoreResult<()>;

    /// Remove every task. Succeeds on an empty store.
    fn delete_all(&self) -> StoreResult<()>;

    /// Check whether a task exists.
    ///
    /// Default implementation calls `get()` and maps `NotFound` to `false`.
    fn exists(&self, id: &TaskId) -> StoreResult<bool> {
        match self.get(id) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
