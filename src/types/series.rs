use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange-issued instrument code, always uppercase letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentCode(String);

impl InstrumentCode {
    /// Parse a raw code. Returns None unless the code is purely alphabetic.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(char::is_alphabetic) {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One trading day for an instrument, as published by the exchange.
///
/// Numeric columns keep the source locale text (`1.234,56`); use
/// [`crate::services::signals::cleaning::parse_locale_number`] before doing math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRecord {
    pub instrument: InstrumentCode,
    pub date: NaiveDate,
    pub close_price: String,
    pub day_high: String,
    pub day_low: String,
    pub day_average: String,
    pub percent_change: String,
    pub volume: String,
    pub best_turnover: String,
    pub total_turnover: String,
}

/// Numeric bar derived from a cleaned [`SeriesRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_code_normalizes_case() {
        let code = InstrumentCode::parse(" kmb ").unwrap();
        assert_eq!(code.as_str(), "KMB");
        assert_eq!(code.to_string(), "KMB");
    }

    #[test]
    fn test_instrument_code_rejects_non_alphabetic() {
        assert!(InstrumentCode::parse("").is_none());
        assert!(InstrumentCode::parse("AB1").is_none());
        assert!(InstrumentCode::parse("E-BOND").is_none());
    }
}
