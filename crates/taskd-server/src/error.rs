use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use taskd_store::StoreError;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("task not found")]
    TaskNotFound,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The request body could not be read, e.g. it exceeded the size limit.
    #[error("{0}")]
    Body(#[from] BytesRejection),

    /// A store failure other than `NotFound`; `context` is what the client sees.
    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Map a store error, keeping `NotFound` distinct and labelling the rest
    /// with `context` (e.g. "failed to create task").
    pub fn from_store(err: StoreError, context: &'static str) -> Self {
        match err {
            StoreError::NotFound(_) => Self::TaskNotFound,
            source => Self::Store { context, source },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::TaskNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Body(rejection) => rejection.status(),
            Self::Store { .. } | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to a client.
    pub fn public_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => "internal server error".into(),
            other => other.to_string(),
        }
    }
}

/// Body of every error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            match &self {
                Self::Store { context, source } => {
                    tracing::error!(error = %source, "{context}");
                }
                other => tracing::error!(error = %other, "request failed"),
            }
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use taskd_types::TaskId;

    #[test]
    fn not_found_maps_to_404() {
        let err = ServerError::from_store(
            StoreError::NotFound(TaskId::generate()),
            "failed to get task",
        );
        assert!(matches!(err, ServerError::TaskNotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "task not found");
    }

    #[test]
    fn other_store_errors_map_to_500_with_context() {
        let err = ServerError::from_store(StoreError::LockPoisoned, "failed to create task");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "failed to create task");
    }

    #[test]
    fn validation_maps_to_400() {
        let err = ServerError::from(ValidationError::EmptyName);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "name cannot be empty");
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = ServerError::Internal("serializer exploded at 0xdeadbeef".into());
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn into_response_sets_status() {
        let response = ServerError::TaskNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
