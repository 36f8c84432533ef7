pub mod mse;

pub use mse::MseClient;

use crate::error::SyncError;
use crate::types::{DateWindow, InstrumentCode, SeriesRecord};
use async_trait::async_trait;

/// Remote source of daily history rows.
#[async_trait]
pub trait HistoryFetcher: Send + Sync {
    /// Fetch every published row for `instrument` inside `window`.
    ///
    /// An empty Vec means the page parsed but held no rows. Transport
    /// failures and non-success statuses are `SyncError::Fetch`; a page
    /// without a results table is `SyncError::Parse`.
    async fn fetch_history(
        &self,
        instrument: &InstrumentCode,
        window: DateWindow,
    ) -> Result<Vec<SeriesRecord>, SyncError>;
}

/// Remote listing of instrument codes.
#[async_trait]
pub trait InstrumentDiscovery: Send + Sync {
    /// Deduplicated, uppercase, purely alphabetic codes.
    async fn discover(&self) -> Result<Vec<InstrumentCode>, SyncError>;
}
