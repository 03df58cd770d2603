use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use taskd_store::{InMemoryTaskStore, TaskStore};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// taskd HTTP server.
pub struct TaskServer {
    config: ServerConfig,
    store: Arc<dyn TaskStore>,
}

impl TaskServer {
    /// Server backed by a fresh in-memory store.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_store(config, Arc::new(InMemoryTaskStore::new()))
    }

    /// Server backed by the given store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn TaskStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        build_router(AppState::new(Arc::clone(&self.store)), &self.config)
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.config.validate()?;
        let app = self.router()?;
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("taskd server listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!("taskd server stopped");
        Ok(())
    }
}
