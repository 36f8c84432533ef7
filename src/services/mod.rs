pub mod analysis;
pub mod cache;
pub mod checkpoint_store;
pub mod series_store;
pub mod signals;
pub mod sync;

pub use analysis::AnalysisService;
pub use cache::Cache;
pub use checkpoint_store::CheckpointStore;
pub use series_store::SeriesStore;
pub use sync::{Pipeline, SyncRunner, Synchronizer};
