//! Incremental synchronization of exchange history.
//!
//! Instruments without a checkpoint are backfilled over the configured
//! lookback; the rest are caught up from the day after their checkpoint.
//! Both paths fetch in bounded chunks and merge through upserts, so any run
//! can be repeated safely.

mod batch;
pub mod chunks;
mod runner;
mod synchronizer;

pub use batch::Pipeline;
pub use chunks::chunk_windows;
pub use runner::SyncRunner;
pub use synchronizer::Synchronizer;
