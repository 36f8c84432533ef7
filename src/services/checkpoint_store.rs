//! Per-instrument checkpoints persisted as a JSON map.
//!
//! The file is read once when the store opens and rewritten only by
//! [`CheckpointStore::commit`], which the batch coordinator calls once at the
//! end of a run. A crash mid-batch therefore leaves the previous values.

use crate::error::StoreError;
use crate::types::InstrumentCode;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

/// Durable map of instrument to last synchronized date.
pub struct CheckpointStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<InstrumentCode, NaiveDate>>,
}

impl CheckpointStore {
    /// Open the checkpoint file, starting empty if it does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        info!(
            "Loaded {} checkpoints from {}",
            entries.len(),
            path.display()
        );
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Last synchronized date for an instrument.
    pub fn get(&self, instrument: &InstrumentCode) -> Option<NaiveDate> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(instrument).copied()
    }

    /// Set a single checkpoint and persist it.
    pub fn set(&self, instrument: InstrumentCode, date: NaiveDate) -> Result<(), StoreError> {
        let mut updates = BTreeMap::new();
        updates.insert(instrument, date);
        self.commit(&updates)
    }

    /// Merge a batch of checkpoint updates and persist them in one write.
    ///
    /// Instruments absent from `updates` keep their previous checkpoint.
    pub fn commit(&self, updates: &BTreeMap<InstrumentCode, NaiveDate>) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let mut merged = entries.clone();
        merged.extend(updates.iter().map(|(k, v)| (k.clone(), *v)));

        self.persist(&merged)?;
        *entries = merged;
        debug!("Committed {} checkpoint updates", updates.len());
        Ok(())
    }

    /// Copy of every checkpoint.
    pub fn snapshot(&self) -> BTreeMap<InstrumentCode, NaiveDate> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn persist(&self, entries: &BTreeMap<InstrumentCode, NaiveDate>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write then rename so readers never see a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
