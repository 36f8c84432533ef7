//! SQLite persistence for daily instrument history.
//!
//! Rows are keyed by `(publisher_code, date)` and written with an upsert, so
//! replaying a chunk leaves the table unchanged. Dates are ISO text so that
//! `MAX(date)` and `ORDER BY date` follow calendar order.

use crate::error::StoreError;
use crate::types::{InstrumentCode, SeriesRecord};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

const UPSERT_SQL: &str = "INSERT INTO stock_data
        (publisher_code, date, price, max, min, avg, percent_change, quantity,
         best_turnover, total_turnover)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
     ON CONFLICT(publisher_code, date) DO UPDATE SET
        price = excluded.price,
        max = excluded.max,
        min = excluded.min,
        avg = excluded.avg,
        percent_change = excluded.percent_change,
        quantity = excluded.quantity,
        best_turnover = excluded.best_turnover,
        total_turnover = excluded.total_turnover";

/// Durable series store shared by the sync workers and the REST layer.
pub struct SeriesStore {
    conn: Mutex<Connection>,
}

impl SeriesStore {
    /// Open (or create) the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("Series store opened at {}", path.display());
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory series store initialized");
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS stock_data (
                publisher_code TEXT NOT NULL,
                date TEXT NOT NULL,
                price TEXT,
                max TEXT,
                min TEXT,
                avg TEXT,
                percent_change TEXT,
                quantity TEXT,
                best_turnover TEXT,
                total_turnover TEXT,
                PRIMARY KEY (publisher_code, date)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS instruments (
                publisher_code TEXT PRIMARY KEY
            )",
            [],
        )?;

        Ok(())
    }

    /// Insert a record, replacing any row for the same instrument and date.
    pub fn upsert(&self, record: &SeriesRecord) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(UPSERT_SQL)?;
        execute_upsert(&mut stmt, record)?;
        Ok(())
    }

    /// Upsert a batch of records in a single transaction.
    ///
    /// Either every record lands or none does.
    pub fn upsert_batch(&self, records: &[SeriesRecord]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT_SQL)?;
            for record in records {
                execute_upsert(&mut stmt, record)?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// Latest stored date for an instrument.
    pub fn max_date(&self, instrument: &InstrumentCode) -> Result<Option<NaiveDate>, StoreError> {
        let conn = self.conn()?;
        let latest: Option<String> = conn
            .query_row(
                "SELECT MAX(date) FROM stock_data WHERE publisher_code = ?1",
                params![instrument.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        Ok(latest.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()))
    }

    /// Every record for an instrument, ascending by date.
    pub fn all_records(&self, instrument: &InstrumentCode) -> Result<Vec<SeriesRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT date, price, max, min, avg, percent_change, quantity,
                    best_turnover, total_turnover
             FROM stock_data
             WHERE publisher_code = ?1
             ORDER BY date ASC",
        )?;

        let rows = stmt.query_map(params![instrument.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                [
                    text_column(row, 1)?,
                    text_column(row, 2)?,
                    text_column(row, 3)?,
                    text_column(row, 4)?,
                    text_column(row, 5)?,
                    text_column(row, 6)?,
                    text_column(row, 7)?,
                    text_column(row, 8)?,
                ],
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (date, [close, high, low, avg, change, volume, best, total]) = row?;
            let Ok(date) = NaiveDate::parse_from_str(&date, "%Y-%m-%d") else {
                warn!("Skipping {} row with malformed date {:?}", instrument, date);
                continue;
            };
            records.push(SeriesRecord {
                instrument: instrument.clone(),
                date,
                close_price: close,
                day_high: high,
                day_low: low,
                day_average: avg,
                percent_change: change,
                volume,
                best_turnover: best,
                total_turnover: total,
            });
        }

        Ok(records)
    }

    /// Number of stored rows for an instrument.
    pub fn record_count(&self, instrument: &InstrumentCode) -> Result<u64, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM stock_data WHERE publisher_code = ?1",
            params![instrument.as_str()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Replace the known instrument list with a freshly discovered one.
    pub fn replace_instruments(&self, instruments: &[InstrumentCode]) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM instruments", [])?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT OR IGNORE INTO instruments (publisher_code) VALUES (?1)")?;
            for code in instruments {
                stmt.execute(params![code.as_str()])?;
            }
        }
        tx.commit()?;
        info!("Stored {} instrument codes", instruments.len());
        Ok(())
    }

    /// Known instruments, sorted by code.
    pub fn instruments(&self) -> Result<Vec<InstrumentCode>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT publisher_code FROM instruments ORDER BY publisher_code")?;
        let codes = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(codes.iter().filter_map(|c| InstrumentCode::parse(c)).collect())
    }

    /// Drop every stored series row.
    pub fn reset(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM stock_data", [])?;
        warn!("Series store reset, {} rows removed", removed);
        Ok(())
    }
}

fn execute_upsert(stmt: &mut rusqlite::Statement<'_>, record: &SeriesRecord) -> rusqlite::Result<usize> {
    let date = record.date.format("%Y-%m-%d").to_string();
    stmt.execute(params![
        record.instrument.as_str(),
        date,
        record.close_price,
        record.day_high,
        record.day_low,
        record.day_average,
        record.percent_change,
        record.volume,
        record.best_turnover,
        record.total_turnover,
    ])
}

fn text_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}
