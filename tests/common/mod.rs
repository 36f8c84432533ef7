//! Scripted in-memory source shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bourse::error::SyncError;
use bourse::sources::{HistoryFetcher, InstrumentDiscovery};
use bourse::types::{DateWindow, InstrumentCode, SeriesRecord};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn code(raw: &str) -> InstrumentCode {
    InstrumentCode::parse(raw).unwrap()
}

/// One row per calendar date, priced off the day of the year.
pub fn record(instrument: &InstrumentCode, date: NaiveDate) -> SeriesRecord {
    use chrono::Datelike;
    let close = 1000 + date.ordinal();
    SeriesRecord {
        instrument: instrument.clone(),
        date,
        close_price: format!("{}.{:03},00", close / 1000, close % 1000),
        day_high: format!("{}.{:03},00", (close + 5) / 1000, (close + 5) % 1000),
        day_low: format!("{}.{:03},00", (close - 5) / 1000, (close - 5) % 1000),
        day_average: format!("{}.{:03},00", close / 1000, close % 1000),
        percent_change: "0,10".into(),
        volume: "120".into(),
        best_turnover: "0".into(),
        total_turnover: "120.000".into(),
    }
}

/// Fetcher that serves one row per date of the requested window.
///
/// Individual chunks can be scripted to fail, to hang, or to panic, and
/// `overlap_days` makes each response reach back before the chunk start the
/// way the exchange pages sometimes do. Concurrent calls are tracked so tests
/// can check the worker pool width.
#[derive(Default)]
pub struct ScriptedFetcher {
    pub overlap_days: i64,
    failing_dates: HashSet<NaiveDate>,
    hanging_dates: HashSet<NaiveDate>,
    panicking: HashSet<InstrumentCode>,
    listed_on: Option<NaiveDate>,
    latency: Option<std::time::Duration>,
    calls: Mutex<Vec<(InstrumentCode, DateWindow)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Decrements the in-flight count however the call ends.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any chunk containing `date`.
    pub fn fail_on(mut self, date: NaiveDate) -> Self {
        self.failing_dates.insert(date);
        self
    }

    /// Never answer a chunk containing `date`.
    pub fn hang_on(mut self, date: NaiveDate) -> Self {
        self.hanging_dates.insert(date);
        self
    }

    pub fn panic_for(mut self, instrument: &str) -> Self {
        self.panicking.insert(code(instrument));
        self
    }

    /// Pages for windows ending before `date` come back without a results
    /// table, as for an instrument not yet listed.
    pub fn listed_on(mut self, date: NaiveDate) -> Self {
        self.listed_on = Some(date);
        self
    }

    /// Hold every call for `latency` before answering.
    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Highest number of calls that were in progress at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn with_overlap(mut self, days: i64) -> Self {
        self.overlap_days = days;
        self
    }

    pub fn calls(&self) -> Vec<(InstrumentCode, DateWindow)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, instrument: &str) -> usize {
        let instrument = code(instrument);
        self.calls().iter().filter(|(c, _)| *c == instrument).count()
    }
}

#[async_trait]
impl HistoryFetcher for ScriptedFetcher {
    async fn fetch_history(
        &self,
        instrument: &InstrumentCode,
        window: DateWindow,
    ) -> Result<Vec<SeriesRecord>, SyncError> {
        self.calls.lock().unwrap().push((instrument.clone(), window));
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.panicking.contains(instrument) {
            panic!("scripted panic for {}", instrument);
        }
        if self.failing_dates.iter().any(|d| window.contains(*d)) {
            return Err(SyncError::Fetch("HTTP 503 Service Unavailable".into()));
        }
        if self.listed_on.is_some_and(|listed| window.end < listed) {
            return Err(SyncError::Parse("results table missing".into()));
        }
        if self.hanging_dates.iter().any(|d| window.contains(*d)) {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        }

        let mut day = window.start - Duration::days(self.overlap_days);
        let mut records = Vec::new();
        while day <= window.end {
            records.push(record(instrument, day));
            day = day.succ_opt().unwrap();
        }
        Ok(records)
    }
}

/// Discovery that returns a fixed list, or fails when the list is None.
pub struct ScriptedDiscovery(pub Option<Vec<InstrumentCode>>);

#[async_trait]
impl InstrumentDiscovery for ScriptedDiscovery {
    async fn discover(&self) -> Result<Vec<InstrumentCode>, SyncError> {
        self.0
            .clone()
            .ok_or_else(|| SyncError::Fetch("HTTP 502 Bad Gateway".into()))
    }
}
