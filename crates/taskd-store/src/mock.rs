//! Scriptable task store for handler tests.
//!
//! [`MockTaskStore`] lets a test replace any single operation with a closure
//! (for example, make `create` fail with a backend error) and counts how many
//! times each operation was reached.

use std::sync::atomic::{AtomicUsize, Ordering};

use taskd_types::{Task, TaskDraft, TaskId};

use crate::error::{StoreError, StoreResult};
use crate::page::{Page, PageRequest};
use crate::traits::TaskStore;

type ListFn = Box<dyn Fn(PageRequest) -> StoreResult<Page<Task>> + Send + Sync>;
type GetFn = Box<dyn Fn(&TaskId) -> StoreResult<Task> + Send + Sync>;
type CreateFn = Box<dyn Fn(TaskDraft) -> StoreResult<Task> + Send + Sync>;
type UpdateFn = Box<dyn Fn(&TaskId, TaskDraft) -> StoreResult<Task> + Send + Sync>;
type DeleteFn = Box<dyn Fn(&TaskId) -> StoreResult<()> + Send + Sync>;
type DeleteAllFn = Box<dyn Fn() -> StoreResult<()> + Send + Sync>;

/// Per-operation call counts observed by a [`MockTaskStore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub get: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub delete_all: usize,
}

impl CallCounts {
    /// Sum over all operations.
    pub fn total(&self) -> usize {
        self.list + self.get + self.create + self.update + self.delete + self.delete_all
    }
}

#[derive(Default)]
struct Counters {
    list: AtomicUsize,
    get: AtomicUsize,
    create: AtomicUsize,
    update: AtomicUsize,
    delete: AtomicUsize,
    delete_all: AtomicUsize,
}

/// A [`TaskStore`] whose behavior is injected per operation.
///
/// Operations without an injected closure fall back to:
/// - `list`: empty page
/// - `get`, `update`, `delete`: `NotFound`
/// - `create`: echo the draft under [`MockTaskStore::PLACEHOLDER_ID`]
/// - `delete_all`: `Ok(())`
#[derive(Default)]
pub struct MockTaskStore {
    on_list: Option<ListFn>,
    on_get: Option<GetFn>,
    on_create: Option<CreateFn>,
    on_update: Option<UpdateFn>,
    on_delete: Option<DeleteFn>,
    on_delete_all: Option<DeleteAllFn>,
    counters: Counters,
}

impl MockTaskStore {
    /// Id given to tasks created through the default `create` behavior.
    pub const PLACEHOLDER_ID: TaskId = TaskId::nil();

    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_list(
        mut self,
        f: impl Fn(PageRequest) -> StoreResult<Page<Task>> + Send + Sync + 'static,
    ) -> Self {
        self.on_list = Some(Box::new(f));
        self
    }

    pub fn on_get(
        mut self,
        f: impl Fn(&TaskId) -> StoreResult<Task> + Send + Sync + 'static,
    ) -> Self {
        self.on_get = Some(Box::new(f));
        self
    }

    pub fn on_create(
        mut self,
        f: impl Fn(TaskDraft) -> StoreResult<Task> + Send + Sync + 'static,
    ) -> Self {
        self.on_create = Some(Box::new(f));
        self
    }

    pub fn on_update(
        mut self,
        f: impl Fn(&TaskId, TaskDraft) -> StoreResult<Task> + Send + Sync + 'static,
    ) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn on_delete(
        mut self,
        f: impl Fn(&TaskId) -> StoreResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.on_delete = Some(Box::new(f));
        self
    }

    pub fn on_delete_all(
        mut self,
        f: impl Fn() -> StoreResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.on_delete_all = Some(Box::new(f));
        self
    }

    /// Snapshot of how often each operation has been called.
    pub fn calls(&self) -> CallCounts {
        let c = &self.counters;
        CallCounts {
            list: c.list.load(Ordering::SeqCst),
            get: c.get.load(Ordering::SeqCst),
            create: c.create.load(Ordering::SeqCst),
            update: c.update.load(Ordering::SeqCst),
            delete: c.delete.load(Ordering::SeqCst),
            delete_all: c.delete_all.load(Ordering::SeqCst),
        }
    }
}

impl TaskStore for MockTaskStore {
    fn list(&self, request: PageRequest) -> StoreResult<Page<Task>> {
        self.counters.list.fetch_add(1, Ordering::SeqCst);
        match &self.on_list {
            Some(f) => f(request),
            None => Ok(Page::empty(request)),
        }
    }

    fn get(&self, id: &TaskId) -> StoreResult<Task> {
        self.counters.get.fetch_add(1, Ordering::SeqCst);
        match &self.on_get {
            Some(f) => f(id),
            None => Err(StoreError::NotFound(*id)),
        }
    }

    fn create(&self, draft: TaskDraft) -> StoreResult<Task> {
        self.counters.create.fetch_add(1, Ordering::SeqCst);
        match &self.on_create {
            Some(f) => f(draft),
            None => Ok(Task::from_draft(Self::PLACEHOLDER_ID, draft)),
        }
    }

    fn update(&self, id: &TaskId, draft: TaskDraft) -> StoreResult<Task> {
        self.counters.update.fetch_add(1, Ordering::SeqCst);
        match &self.on_update {
            Some(f) => f(id, draft),
            None => Err(StoreError::NotFound(*id)),
        }
    }

    fn delete(&self, id: &TaskId) -> StoreResult<()> {
        self.counters.delete.fetch_add(1, Ordering::SeqCst);
        match &self.on_delete {
            Some(f) => f(id),
            None => Err(StoreError::NotFound(*id)),
        }
    }

    fn delete_all(&self) -> StoreResult<()> {
        self.counters.delete_all.fetch_add(1, Ordering::SeqCst);
        match &self.on_delete_all {
            Some(f) => f(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for MockTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTaskStore")
            .field("calls", &self.calls())
            .finish()
    }
}
