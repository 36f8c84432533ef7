//! Sync trigger and status endpoints.

use crate::error::{AppError, Result};
use crate::types::BatchReport;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

/// Create sync API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(trigger_sync))
        .route("/status", get(get_sync_status))
}

/// Run a sync batch and return its report.
async fn trigger_sync(State(state): State<AppState>) -> Result<Json<BatchReport>> {
    let report = state
        .sync
        .run_now()
        .await
        .ok_or_else(|| AppError::Conflict("A sync run is already in progress".into()))?;
    Ok(Json(report))
}

/// Report of the most recent sync run.
async fn get_sync_status(State(state): State<AppState>) -> Result<Json<BatchReport>> {
    state
        .sync
        .last_report()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No sync run has finished yet".into()))
}
