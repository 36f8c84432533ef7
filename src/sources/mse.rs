//! Macedonian Stock Exchange history pages.
//!
//! The exchange publishes no API, so rows are scraped from the symbol
//! history page. Each request covers at most one year; the sync layer
//! splits longer windows into chunks before calling in here.

use super::{HistoryFetcher, InstrumentDiscovery};
use crate::config::SourceConfig;
use crate::error::SyncError;
use crate::types::{DateWindow, InstrumentCode, SeriesRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::debug;

/// Date format used in query strings and result cells.
const MSE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Cells per result row: date, close, high, low, average, % change,
/// volume, best turnover, total turnover.
const RESULT_COLUMNS: usize = 9;

/// HTTP client for the exchange's history and listing pages.
pub struct MseClient {
    client: Client,
    base_url: String,
    discovery_url: String,
    timeout: Duration,
}

impl MseClient {
    /// Create a new client.
    pub fn new(source: &SourceConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: source.base_url.clone(),
            discovery_url: source.discovery_url.clone(),
            timeout,
        })
    }

    async fn get_page(&self, request: reqwest::RequestBuilder) -> Result<String, SyncError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(SyncError::Fetch(format!("HTTP {}", response.status())));
        }

        response.text().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, e: reqwest::Error) -> SyncError {
        if e.is_timeout() {
            SyncError::Timeout(self.timeout)
        } else {
            SyncError::Fetch(format!("Request failed: {}", e))
        }
    }
}

#[async_trait]
impl HistoryFetcher for MseClient {
    async fn fetch_history(
        &self,
        instrument: &InstrumentCode,
        window: DateWindow,
    ) -> Result<Vec<SeriesRecord>, SyncError> {
        let url = format!("{}{}", self.base_url, instrument);
        let from = window.start.format(MSE_DATE_FORMAT).to_string();
        let to = window.end.format(MSE_DATE_FORMAT).to_string();

        debug!("Fetching {} history {} - {}", instrument, from, to);

        let request = self.client.get(&url).query(&[
            ("FromDate", from.as_str()),
            ("ToDate", to.as_str()),
            ("Code", instrument.as_str()),
        ]);
        let html = self.get_page(request).await?;

        parse_history_table(instrument, &html)
    }
}

#[async_trait]
impl InstrumentDiscovery for MseClient {
    async fn discover(&self) -> Result<Vec<InstrumentCode>, SyncError> {
        debug!("Fetching instrument list from {}", self.discovery_url);
        let html = self.get_page(self.client.get(&self.discovery_url)).await?;
        let codes = parse_instrument_codes(&html);
        if codes.is_empty() {
            return Err(SyncError::Parse("instrument selector missing or empty".into()));
        }
        Ok(codes)
    }
}

fn selector(css: &str) -> Result<Selector, SyncError> {
    Selector::parse(css).map_err(|e| SyncError::Parse(format!("bad selector {}: {:?}", css, e)))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Parse the `resultsTable` of a history page.
///
/// A page without the table is a parse failure. Rows with too few cells or an
/// unreadable date are dropped; the header row has no `td` cells and falls out
/// the same way.
pub fn parse_history_table(
    instrument: &InstrumentCode,
    html: &str,
) -> Result<Vec<SeriesRecord>, SyncError> {
    let document = Html::parse_document(html);
    let table_selector = selector("table#resultsTable")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| SyncError::Parse("results table not found".into()))?;

    let mut records = Vec::new();
    for row in table.select(&row_selector) {
        let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();
        if cells.len() < RESULT_COLUMNS {
            continue;
        }
        let Ok(date) = NaiveDate::parse_from_str(&cells[0], MSE_DATE_FORMAT) else {
            continue;
        };

        let mut values = cells.into_iter().skip(1);
        let mut next = || values.next().unwrap_or_default();
        records.push(SeriesRecord {
            instrument: instrument.clone(),
            date,
            close_price: next(),
            day_high: next(),
            day_low: next(),
            day_average: next(),
            percent_change: next(),
            volume: next(),
            best_turnover: next(),
            total_turnover: next(),
        });
    }

    Ok(records)
}

/// Read instrument codes from the `select#Code` dropdown.
///
/// Non-alphabetic option values (bonds, placeholders) are skipped.
pub fn parse_instrument_codes(html: &str) -> Vec<InstrumentCode> {
    let document = Html::parse_document(html);
    let Ok(option_selector) = Selector::parse("select#Code option") else {
        return Vec::new();
    };

    document
        .select(&option_selector)
        .filter_map(|option| option.value().attr("value"))
        .filter_map(InstrumentCode::parse)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY_PAGE: &str = r#"
        <html><body>
        <table id="resultsTable">
          <thead><tr><th>Датум</th><th>Цена</th></tr></thead>
          <tbody>
            <tr>
              <td>14.03.2024</td><td>21.600,00</td><td>21.700,00</td><td>21.500,00</td>
              <td>21.620,45</td><td>0,47</td><td>120</td><td>2.594.454</td><td>2.594.454</td>
            </tr>
            <tr>
              <td>13.03.2024</td><td>21.500,00</td><td></td><td></td>
              <td>21.500,00</td><td>0,00</td><td>0</td><td>0</td><td>0</td>
            </tr>
            <tr><td>broken</td><td>1</td><td>1</td><td>1</td><td>1</td><td>1</td><td>1</td><td>1</td><td>1</td></tr>
            <tr><td>12.03.2024</td><td>only two</td></tr>
          </tbody>
        </table>
        </body></html>"#;

    fn code(s: &str) -> InstrumentCode {
        InstrumentCode::parse(s).unwrap()
    }

    #[test]
    fn test_parse_history_rows() {
        let records = parse_history_table(&code("ALK"), HISTORY_PAGE).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
        assert_eq!(first.close_price, "21.600,00");
        assert_eq!(first.day_average, "21.620,45");
        assert_eq!(first.volume, "120");
        assert_eq!(first.total_turnover, "2.594.454");

        assert_eq!(records[1].day_high, "");
    }

    #[test]
    fn test_missing_table_is_parse_error() {
        let result = parse_history_table(&code("ALK"), "<html><p>maintenance</p></html>");
        assert!(matches!(result, Err(SyncError::Parse(_))));
    }

    #[test]
    fn test_empty_table_is_not_an_error() {
        let html = r#"<table id="resultsTable"><tr><th>Датум</th></tr></table>"#;
        assert!(parse_history_table(&code("ALK"), html).unwrap().is_empty());
    }

    #[test]
    fn test_parse_instrument_codes() {
        let html = r#"
            <select id="Code">
              <option value="">--</option>
              <option value="alk">ALK</option>
              <option value="KMB">KMB</option>
              <option value="RMDEN21">RMDEN21</option>
              <option value="ALK">ALK</option>
              <option value="TEL">TEL</option>
            </select>"#;
        let codes = parse_instrument_codes(html);
        assert_eq!(codes, vec![code("ALK"), code("KMB"), code("TEL")]);
    }

    #[test]
    fn test_parse_instrument_codes_without_selector() {
        assert!(parse_instrument_codes("<html></html>").is_empty());
    }
}
