//! Instrument list and stored history endpoints.

use crate::error::{AppError, Result};
use crate::types::{InstrumentCode, SeriesRecord};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Query parameters naming an instrument.
#[derive(Debug, Deserialize)]
pub struct PublisherQuery {
    pub publisher: Option<String>,
}

impl PublisherQuery {
    /// Validated instrument code; a missing or malformed code is a bad request.
    pub fn instrument(&self) -> Result<InstrumentCode> {
        let raw = self
            .publisher
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::BadRequest("Missing 'publisher' query param".into()))?;

        InstrumentCode::parse(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid publisher code: {}", raw)))
    }
}

#[derive(Debug, Serialize)]
pub struct PublishersResponse {
    pub publishers: Vec<InstrumentCode>,
}

/// One stored row with its source text values.
#[derive(Debug, Serialize)]
pub struct StoredRow {
    pub date: NaiveDate,
    pub price: String,
    pub volume: String,
    pub max: String,
    pub min: String,
    pub avg: String,
    pub percent_change: String,
    pub total_turnover: String,
}

impl From<SeriesRecord> for StoredRow {
    fn from(record: SeriesRecord) -> Self {
        Self {
            date: record.date,
            price: record.close_price,
            volume: record.volume,
            max: record.day_high,
            min: record.day_low,
            avg: record.day_average,
            percent_change: record.percent_change,
            total_turnover: record.total_turnover,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StockDataResponse {
    pub publisher: InstrumentCode,
    pub records: Vec<StoredRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/publishers", get(get_publishers))
        .route("/api/stock_data", get(get_stock_data))
}

/// List known instrument codes.
async fn get_publishers(State(state): State<AppState>) -> Result<Json<PublishersResponse>> {
    let publishers = state.store.instruments()?;
    Ok(Json(PublishersResponse { publishers }))
}

/// Stored history of one instrument, oldest first.
async fn get_stock_data(
    State(state): State<AppState>,
    Query(query): Query<PublisherQuery>,
) -> Result<Json<StockDataResponse>> {
    let publisher = query.instrument()?;
    let records: Vec<StoredRow> = state
        .store
        .all_records(&publisher)?
        .into_iter()
        .map(StoredRow::from)
        .collect();

    let msg = records
        .is_empty()
        .then(|| format!("No data found for {}", publisher));

    Ok(Json(StockDataResponse {
        publisher,
        records,
        msg,
    }))
}
