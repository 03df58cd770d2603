//! Concurrent in-memory task storage for taskd.
//!
//! This crate owns all task state. Records live in a dense vector in
//! insertion order, with a `HashMap` from task id to vector position next to
//! it. Point lookups go through the map; deletes swap the last record into
//! the freed slot so they never shift the tail.
//!
//! # Storage Backends
//!
//! All backends implement the [`TaskStore`] trait:
//!
//! - [`InMemoryTaskStore`] -- the production engine
//! - [`MockTaskStore`] -- a test double with per-operation injected behavior
//!
//! # Design Rules
//!
//! 1. The vector and the position map change together under one write lock.
//! 2. Reads (get, list) share a read lock and never see a half-applied delete.
//! 3. Ids are assigned by the store and never change afterwards.
//! 4. A delete may relocate the last record; listing guarantees every record
//!    appears exactly once, not that insertion order survives deletes.
//! 5. The only domain error is [`StoreError::NotFound`].

pub mod error;
pub mod memory;
pub mod mock;
pub mod page;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryTaskStore;
pub use mock::{CallCounts, MockTaskStore};
pub use page::{Page, PageInfo, PageRequest, DEFAULT_PAGE_LIMIT};
pub use traits::TaskStore;
