//! Per-instrument backfill and catch-up.

use super::chunks::chunk_windows;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::services::SeriesStore;
use crate::sources::HistoryFetcher;
use crate::types::{CheckpointPolicy, DateWindow, InstrumentCode, SeriesRecord, SyncOutcome};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Fetches missing history for one instrument at a time and merges it into
/// the series store.
///
/// Chunks are fetched sequentially. A fetch, timeout or parse failure skips
/// the chunk and the run continues; a persistence failure aborts the
/// instrument.
pub struct Synchronizer {
    fetcher: Arc<dyn HistoryFetcher>,
    store: Arc<SeriesStore>,
    config: SyncConfig,
}

impl Synchronizer {
    pub fn new(fetcher: Arc<dyn HistoryFetcher>, store: Arc<SeriesStore>, config: SyncConfig) -> Self {
        Self {
            fetcher,
            store,
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Fetch the full lookback history of an instrument that has no checkpoint.
    pub async fn backfill(
        &self,
        instrument: &InstrumentCode,
        today: NaiveDate,
    ) -> Result<SyncOutcome, SyncError> {
        let start = today
            .checked_sub_signed(Duration::days(i64::from(self.config.lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        let window = DateWindow::new(start, today);

        info!(
            "Backfilling {} from {} to {} ({} days)",
            instrument,
            window.start,
            window.end,
            window.days()
        );
        self.sync_window(instrument, window, None).await
    }

    /// Fetch everything published after `last_known`.
    ///
    /// Only records strictly newer than `last_known` are merged. A checkpoint
    /// at or past today is a no-op.
    pub async fn catch_up(
        &self,
        instrument: &InstrumentCode,
        last_known: NaiveDate,
        today: NaiveDate,
    ) -> Result<SyncOutcome, SyncError> {
        let start = last_known.succ_opt().unwrap_or(last_known);
        let window = DateWindow::new(start, today);

        if window.is_empty() || start == last_known {
            debug!("{} is up to date (last known {})", instrument, last_known);
            return Ok(SyncOutcome::empty(window));
        }

        info!(
            "Catching up {} from {} to {}",
            instrument, window.start, window.end
        );
        self.sync_window(instrument, window, Some(last_known)).await
    }

    async fn sync_window(
        &self,
        instrument: &InstrumentCode,
        window: DateWindow,
        newer_than: Option<NaiveDate>,
    ) -> Result<SyncOutcome, SyncError> {
        let mut outcome = SyncOutcome::empty(window);
        let mut coverage = Coverage::default();

        for chunk in chunk_windows(window, self.config.chunk_days) {
            outcome.chunks_attempted += 1;

            let records = match self.fetch_chunk(instrument, chunk).await {
                Ok(records) => records,
                Err(e) if e.is_chunk_local() => {
                    warn!(
                        "Skipping {} chunk {} - {}: {}",
                        instrument, chunk.start, chunk.end, e
                    );
                    outcome.chunks_failed += 1;
                    coverage.missed();
                    continue;
                }
                Err(e) => return Err(e),
            };

            let fresh: Vec<SeriesRecord> = match newer_than {
                Some(last_known) => records.into_iter().filter(|r| r.date > last_known).collect(),
                None => records,
            };

            if fresh.is_empty() {
                debug!(
                    "{} chunk {} - {} had no new rows",
                    instrument, chunk.start, chunk.end
                );
                outcome.chunks_empty += 1;
            } else {
                let merged = self.store.upsert_batch(&fresh).map_err(|e| {
                    error!("Failed to persist {} chunk {}: {}", instrument, chunk.start, e);
                    SyncError::Persistence(e)
                })?;
                debug!(
                    "{} chunk {} - {} merged {} rows",
                    instrument, chunk.start, chunk.end, merged
                );
                outcome.chunks_merged += 1;
                outcome.records_merged += merged as u64;
            }
            coverage.covered(chunk);
        }

        outcome.checkpoint = match self.config.checkpoint_policy {
            CheckpointPolicy::Contiguous => coverage.through,
            CheckpointPolicy::Attempted => Some(window.end),
        };

        info!(
            "{} synced: {} rows merged, {}/{} chunks failed, checkpoint {:?}",
            instrument,
            outcome.records_merged,
            outcome.chunks_failed,
            outcome.chunks_attempted,
            outcome.checkpoint
        );
        Ok(outcome)
    }

    async fn fetch_chunk(
        &self,
        instrument: &InstrumentCode,
        chunk: DateWindow,
    ) -> Result<Vec<SeriesRecord>, SyncError> {
        let timeout = self.config.fetch_timeout;
        tokio::time::timeout(timeout, self.fetcher.fetch_history(instrument, chunk))
            .await
            .map_err(|_| SyncError::Timeout(timeout))?
    }
}

/// End of the unbroken run of covered chunks from the window start.
#[derive(Debug, Default)]
struct Coverage {
    through: Option<NaiveDate>,
    broken: bool,
}

impl Coverage {
    fn covered(&mut self, chunk: DateWindow) {
        if !self.broken {
            self.through = Some(chunk.end);
        }
    }

    fn missed(&mut self) {
        self.broken = true;
    }
}
