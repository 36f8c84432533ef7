use super::{ConsensusSummary, IndicatorResult, InstrumentCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bar size the cleaned series is resampled to before analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "1D")]
    Daily,
    #[serde(rename = "1W")]
    Weekly,
    #[serde(rename = "1M")]
    Monthly,
}

impl Timeframe {
    /// Parse from a request label such as "1D".
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "1D" | "D" | "DAILY" => Some(Self::Daily),
            "1W" | "W" | "WEEKLY" => Some(Self::Weekly),
            "1M" | "M" | "MONTHLY" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "1D",
            Self::Weekly => "1W",
            Self::Monthly => "1M",
        }
    }
}

/// Date and close of a cleaned bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub close: f64,
}

/// Indicators and consensus tallies for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalAnalysis {
    pub publisher: InstrumentCode,
    pub timeframe: Timeframe,
    pub records: Vec<PriceRecord>,
    pub indicators: Vec<IndicatorResult>,
    pub msg: String,
    /// Medium-horizon momentum oscillators.
    pub osc_summary: ConsensusSummary,
    /// Medium-horizon moving averages.
    pub ma_summary: ConsensusSummary,
    /// Both groups together.
    pub overall_summary: ConsensusSummary,
}

impl TechnicalAnalysis {
    /// Analysis with no usable rows, carrying an explanation.
    pub fn without_data(publisher: InstrumentCode, timeframe: Timeframe, msg: impl Into<String>) -> Self {
        Self {
            publisher,
            timeframe,
            records: Vec::new(),
            indicators: Vec::new(),
            msg: msg.into(),
            osc_summary: ConsensusSummary::default(),
            ma_summary: ConsensusSummary::default(),
            overall_summary: ConsensusSummary::default(),
        }
    }
}
