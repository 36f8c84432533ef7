use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Application error types surfaced through the REST layer.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors raised by the series and checkpoint stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint encoding error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Failures inside the synchronization pipeline.
///
/// `Fetch`, `Timeout` and `Parse` are absorbed per chunk. `Persistence`
/// aborts the affected instrument only; `Worker` tags a sync task that
/// died before reporting.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("parse failed: {0}")]
    Parse(String),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("sync worker failed: {0}")]
    Worker(String),
}

impl SyncError {
    /// Whether the error only invalidates the current chunk.
    pub fn is_chunk_local(&self) -> bool {
        matches!(
            self,
            SyncError::Fetch(_) | SyncError::Timeout(_) | SyncError::Parse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_local_classification() {
        assert!(SyncError::Fetch("503".into()).is_chunk_local());
        assert!(SyncError::Timeout(Duration::from_secs(1)).is_chunk_local());
        assert!(SyncError::Parse("no table".into()).is_chunk_local());
        assert!(!SyncError::Persistence(StoreError::Poisoned).is_chunk_local());
        assert!(!SyncError::Worker("panicked".into()).is_chunk_local());
    }

    #[test]
    fn test_conflict_status() {
        let response = AppError::Conflict("busy".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_store_error_is_internal() {
        let response = AppError::from(StoreError::Poisoned).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
