//! Batch coordination across instruments.

use super::Synchronizer;
use crate::error::SyncError;
use crate::services::{CheckpointStore, SeriesStore};
use crate::sources::InstrumentDiscovery;
use crate::types::{BatchReport, InstrumentCode, InstrumentReport, SyncMode, SyncOutcome};
use chrono::{Local, NaiveDate, Utc};
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Runs one synchronization batch: plan, fan out, merge, checkpoint.
pub struct Pipeline {
    synchronizer: Arc<Synchronizer>,
    store: Arc<SeriesStore>,
    checkpoints: Arc<CheckpointStore>,
    discovery: Option<Arc<dyn InstrumentDiscovery>>,
    workers: usize,
}

impl Pipeline {
    pub fn new(
        synchronizer: Synchronizer,
        store: Arc<SeriesStore>,
        checkpoints: Arc<CheckpointStore>,
    ) -> Self {
        let workers = synchronizer.config().workers.max(1);
        Self {
            synchronizer: Arc::new(synchronizer),
            store,
            checkpoints,
            discovery: None,
            workers,
        }
    }

    /// Refresh the instrument list from a remote listing before each run.
    pub fn with_discovery(mut self, discovery: Arc<dyn InstrumentDiscovery>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// Discover instruments and synchronize all of them up to today.
    pub async fn run(&self) -> BatchReport {
        let instruments = self.resolve_instruments().await;
        self.run_batch(instruments, Local::now().date_naive()).await
    }

    /// Instruments to synchronize: freshly discovered when possible, otherwise
    /// the list stored by the previous discovery.
    pub async fn resolve_instruments(&self) -> Vec<InstrumentCode> {
        if let Some(discovery) = &self.discovery {
            match discovery.discover().await {
                Ok(codes) => {
                    info!("Discovered {} instruments", codes.len());
                    if let Err(e) = self.store.replace_instruments(&codes) {
                        error!("Failed to store instrument list: {}", e);
                    }
                    return codes;
                }
                Err(e) => warn!("Instrument discovery failed, using stored list: {}", e),
            }
        }

        self.store.instruments().unwrap_or_else(|e| {
            error!("Failed to read stored instruments: {}", e);
            Vec::new()
        })
    }

    /// Synchronize the given instruments with a bounded worker pool.
    ///
    /// Checkpoints are read once up front and committed once after every
    /// worker has reported. A failed or panicked worker only loses its own
    /// checkpoint update.
    pub async fn run_batch(&self, instruments: Vec<InstrumentCode>, today: NaiveDate) -> BatchReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            "Sync run {} starting for {} instruments ({} workers)",
            run_id,
            instruments.len(),
            self.workers
        );

        let checkpoints = self.checkpoints.snapshot();
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut planned: Vec<(InstrumentCode, SyncMode)> = Vec::with_capacity(instruments.len());
        let mut handles = Vec::with_capacity(instruments.len());

        for instrument in instruments {
            let mode = match checkpoints.get(&instrument) {
                Some(last_known) => SyncMode::CatchUp {
                    last_known: *last_known,
                },
                None => SyncMode::Backfill,
            };

            let semaphore = semaphore.clone();
            let synchronizer = self.synchronizer.clone();
            let code = instrument.clone();
            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| SyncError::Worker(e.to_string()))?;
                match mode {
                    SyncMode::Backfill => synchronizer.backfill(&code, today).await,
                    SyncMode::CatchUp { last_known } => {
                        synchronizer.catch_up(&code, last_known, today).await
                    }
                }
            });
            planned.push((instrument, mode));
            handles.push(handle);
        }

        let joined = join_all(handles).await;
        let mut reports = Vec::with_capacity(planned.len());
        let mut completed = BTreeMap::new();

        for ((instrument, mode), joined) in planned.into_iter().zip(joined) {
            let result: Result<SyncOutcome, SyncError> = match joined {
                Ok(result) => result,
                Err(e) => Err(SyncError::Worker(e.to_string())),
            };

            match result {
                Ok(outcome) => {
                    if let Some(checkpoint) = outcome.checkpoint {
                        completed.insert(instrument.clone(), checkpoint);
                    }
                    reports.push(InstrumentReport {
                        instrument,
                        mode,
                        outcome: Some(outcome),
                        error: None,
                    });
                }
                Err(e) => {
                    error!("Sync of {} failed: {}", instrument, e);
                    reports.push(InstrumentReport {
                        instrument,
                        mode,
                        outcome: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let checkpoint_error = if completed.is_empty() {
            None
        } else {
            match self.checkpoints.commit(&completed) {
                Ok(()) => None,
                Err(e) => {
                    error!("Failed to commit checkpoints for run {}: {}", run_id, e);
                    Some(e.to_string())
                }
            }
        };

        let report = BatchReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            instruments: reports,
            checkpoint_error,
        };

        info!(
            "Sync run {} finished: {} ok, {} failed, {} rows merged",
            run_id,
            report.succeeded_count(),
            report.failed_count(),
            report.records_merged()
        );
        report
    }
}
