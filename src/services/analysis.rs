//! Technical analysis of stored series, with a short-lived cache.

use crate::config::IndicatorConfig;
use crate::error::StoreError;
use crate::services::signals::cleaning::{clean_series, resample};
use crate::services::signals::{compute_indicators, ConsensusReport};
use crate::services::{Cache, SeriesStore};
use crate::types::{Horizon, InstrumentCode, PriceRecord, TechnicalAnalysis, Timeframe};
use std::sync::Arc;
use tracing::debug;

/// Horizon whose signals are voted into the consensus summaries.
const VOTING_HORIZON: Horizon = Horizon::Medium;

/// Computes and caches [`TechnicalAnalysis`] per instrument and timeframe.
pub struct AnalysisService {
    store: Arc<SeriesStore>,
    config: IndicatorConfig,
    cache: Cache<(InstrumentCode, Timeframe), TechnicalAnalysis>,
}

impl AnalysisService {
    pub fn new(store: Arc<SeriesStore>, config: IndicatorConfig) -> Self {
        let cache = Cache::new(config.cache_ttl);
        Self {
            store,
            config,
            cache,
        }
    }

    /// Analysis of an instrument's stored history.
    ///
    /// Missing or unusable data yields an empty analysis with an explanatory
    /// message rather than an error.
    pub fn analyze(
        &self,
        instrument: &InstrumentCode,
        timeframe: Timeframe,
    ) -> Result<TechnicalAnalysis, StoreError> {
        let key = (instrument.clone(), timeframe);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let analysis = self.compute(instrument, timeframe)?;
        // Codes without usable rows are not cached; any syntactically valid
        // code can be requested.
        if !analysis.records.is_empty() {
            self.cache.insert(key, analysis.clone());
        }
        Ok(analysis)
    }

    /// Drop cached analyses, e.g. after new rows were merged.
    pub fn invalidate(&self) {
        debug!("Clearing {} cached analyses", self.cache.len());
        self.cache.clear();
    }

    fn compute(
        &self,
        instrument: &InstrumentCode,
        timeframe: Timeframe,
    ) -> Result<TechnicalAnalysis, StoreError> {
        let records = self.store.all_records(instrument)?;
        if records.is_empty() {
            return Ok(TechnicalAnalysis::without_data(
                instrument.clone(),
                timeframe,
                "No data found",
            ));
        }

        let daily = clean_series(&records);
        if daily.is_empty() {
            return Ok(TechnicalAnalysis::without_data(
                instrument.clone(),
                timeframe,
                "All records invalid.",
            ));
        }

        let bars = resample(&daily, timeframe);
        let indicators = compute_indicators(&bars, &self.config);
        let consensus = ConsensusReport::from_results(&indicators, VOTING_HORIZON);

        debug!(
            "Analyzed {} ({}): {} bars, overall {:?}",
            instrument,
            timeframe.label(),
            bars.len(),
            consensus.overall.final_signal
        );

        Ok(TechnicalAnalysis {
            publisher: instrument.clone(),
            timeframe,
            msg: format!("Found {} rows (tf={})", bars.len(), timeframe.label()),
            records: bars
                .iter()
                .map(|b| PriceRecord {
                    date: b.date,
                    close: round2(b.close),
                })
                .collect(),
            indicators,
            osc_summary: consensus.oscillators,
            ma_summary: consensus.moving_averages,
            overall_summary: consensus.overall,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
