use super::Pipeline;
use crate::services::AnalysisService;
use crate::types::BatchReport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Serializes pipeline runs and remembers the latest report.
pub struct SyncRunner {
    pipeline: Pipeline,
    analysis: Arc<AnalysisService>,
    running: Mutex<()>,
    last: RwLock<Option<BatchReport>>,
}

impl SyncRunner {
    pub fn new(pipeline: Pipeline, analysis: Arc<AnalysisService>) -> Self {
        Self {
            pipeline,
            analysis,
            running: Mutex::new(()),
            last: RwLock::new(None),
        }
    }

    /// Run a batch now. Returns None when another run is in progress.
    pub async fn run_now(&self) -> Option<BatchReport> {
        let Ok(_guard) = self.running.try_lock() else {
            debug!("Sync already running, skipping");
            return None;
        };

        let report = self.pipeline.run().await;
        self.analysis.invalidate();
        *self.last.write().await = Some(report.clone());
        Some(report)
    }

    pub fn is_running(&self) -> bool {
        self.running.try_lock().is_err()
    }

    /// Report of the most recent finished run.
    pub async fn last_report(&self) -> Option<BatchReport> {
        self.last.read().await.clone()
    }

    /// Start the background sync loop.
    ///
    /// A zero interval disables the loop; `on_startup` still triggers a single
    /// run in that case.
    pub fn spawn_periodic(self: &Arc<Self>, interval: Duration, on_startup: bool) -> Option<JoinHandle<()>> {
        if interval.is_zero() && !on_startup {
            info!("Periodic sync disabled");
            return None;
        }

        let runner = self.clone();
        Some(tokio::spawn(async move {
            if on_startup {
                runner.run_now().await;
            }
            if interval.is_zero() {
                return;
            }

            info!("Periodic sync every {:?}", interval);
            loop {
                tokio::time::sleep(interval).await;
                runner.run_now().await;
            }
        }))
    }
}
