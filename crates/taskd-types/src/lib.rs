//! Domain types for taskd.
//!
//! Every other taskd crate depends on `taskd-types`. The types here carry no
//! storage or transport behavior; they only describe what a task is.
//!
//! # Key Types
//!
//! - [`TaskId`]: Store-assigned random identifier (UUID v4)
//! - [`TaskStatus`]: Two-state status, serialized as `0` or `1`
//! - [`Task`]: A stored record: id, name, status
//! - [`TaskDraft`]: The id-less input used to create or update a task

pub mod error;
pub mod id;
pub mod task;

pub use error::TypeError;
pub use id::TaskId;
pub use task::{Task, TaskDraft, TaskStatus};
