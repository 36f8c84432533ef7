use super::InstrumentCode;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of calendar dates covered (0 when empty).
    pub fn days(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// How far a finished sync may move an instrument's checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointPolicy {
    /// Advance only through the last chunk of an unbroken run of covered chunks.
    #[default]
    Contiguous,
    /// Advance to today once every chunk was attempted, even if some failed.
    Attempted,
}

impl CheckpointPolicy {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "contiguous" => Some(Self::Contiguous),
            "attempted" => Some(Self::Attempted),
            _ => None,
        }
    }
}

/// Which synchronizer handled an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum SyncMode {
    Backfill,
    CatchUp { last_known: NaiveDate },
}

/// Result of synchronizing a single instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub window: DateWindow,
    pub chunks_attempted: u32,
    /// Chunks that produced at least one merged record.
    pub chunks_merged: u32,
    /// Chunks that fetched and parsed but held nothing new.
    pub chunks_empty: u32,
    /// Chunks skipped because of a fetch, timeout or parse failure.
    pub chunks_failed: u32,
    pub records_merged: u64,
    /// New checkpoint for the instrument; None leaves the old one in place.
    pub checkpoint: Option<NaiveDate>,
}

impl SyncOutcome {
    pub fn empty(window: DateWindow) -> Self {
        Self {
            window,
            chunks_attempted: 0,
            chunks_merged: 0,
            chunks_empty: 0,
            chunks_failed: 0,
            records_merged: 0,
            checkpoint: None,
        }
    }
}

/// Per-instrument line of a batch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentReport {
    pub instrument: InstrumentCode,
    #[serde(flatten)]
    pub mode: SyncMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SyncOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InstrumentReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of one synchronization batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub instruments: Vec<InstrumentReport>,
    /// Set when the checkpoint commit at the end of the batch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint_error: Option<String>,
}

impl BatchReport {
    pub fn succeeded_count(&self) -> usize {
        self.instruments.iter().filter(|r| r.succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.instruments.len() - self.succeeded_count()
    }

    pub fn records_merged(&self) -> u64 {
        self.instruments
            .iter()
            .filter_map(|r| r.outcome.as_ref())
            .map(|o| o.records_merged)
            .sum()
    }
}
