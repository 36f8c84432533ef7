//! Technical analysis endpoint.

use super::series::PublisherQuery;
use crate::error::{AppError, Result};
use crate::types::{TechnicalAnalysis, Timeframe};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

/// Query parameters for the analysis endpoint.
#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    pub publisher: Option<String>,
    /// Bar size: 1D, 1W or 1M (defaults to 1D).
    pub tf: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/technical_analysis", get(get_technical_analysis))
}

/// Indicators and consensus for an instrument.
async fn get_technical_analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<TechnicalAnalysis>> {
    let publisher = PublisherQuery {
        publisher: query.publisher,
    }
    .instrument()?;

    let timeframe = match query.tf.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Timeframe::default(),
        Some(label) => Timeframe::from_label(label)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown timeframe: {}", label)))?,
    };

    let analysis = state.analysis.analyze(&publisher, timeframe)?;
    Ok(Json(analysis))
}
