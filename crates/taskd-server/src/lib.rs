//! HTTP server for taskd.
//!
//! Translates REST requests into [`TaskStore`](taskd_store::TaskStore) calls
//! and store outcomes back into status codes and JSON bodies. The store is
//! passed in explicitly as `Arc<dyn TaskStore>`; nothing here is global.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod validation;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{AppState, HealthResponse, MessageResponse};
pub use server::TaskServer;
pub use validation::{parse_task_request, ValidationError};
