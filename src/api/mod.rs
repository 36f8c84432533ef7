pub mod analysis;
pub mod health;
pub mod series;
pub mod sync;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(series::router())
        .merge(analysis::router())
        .nest("/api/sync", sync::router())
}
