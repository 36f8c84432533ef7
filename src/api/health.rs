use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    sync_running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_sync_at: Option<DateTime<Utc>>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let last_sync_at = state.sync.last_report().await.map(|r| r.finished_at);
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sync_running: state.sync.is_running(),
        last_sync_at,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
