use serde::{Deserialize, Serialize};

/// Verdict of a single indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Parse a signal label. "Neutral" is accepted as a synonym for Hold.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            "hold" | "neutral" => Some(Self::Hold),
            _ => None,
        }
    }

    /// Get display label for this signal.
    pub fn label(&self) -> &'static str {
        match self {
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
            Signal::Hold => "Hold",
        }
    }
}

/// Final verdict of a consensus tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Buy,
    Sell,
    Neutral,
}

/// Lookback horizon an indicator is evaluated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    Short,
    Medium,
    Long,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::Short, Horizon::Medium, Horizon::Long];
}

/// Which tally an indicator votes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorGroup {
    Oscillator,
    MovingAverage,
}

/// Indicator families computed for every horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorFamily {
    Rsi,
    Stochastic,
    Cci,
    WilliamsR,
    Macd,
    Sma,
    Ema,
    Wma,
    Zlema,
    BollingerMid,
}

impl IndicatorFamily {
    pub const OSCILLATORS: [IndicatorFamily; 5] = [
        IndicatorFamily::Rsi,
        IndicatorFamily::Stochastic,
        IndicatorFamily::Cci,
        IndicatorFamily::WilliamsR,
        IndicatorFamily::Macd,
    ];

    pub const MOVING_AVERAGES: [IndicatorFamily; 5] = [
        IndicatorFamily::Sma,
        IndicatorFamily::Ema,
        IndicatorFamily::Wma,
        IndicatorFamily::Zlema,
        IndicatorFamily::BollingerMid,
    ];

    /// Get display name for this family.
    pub fn name(&self) -> &'static str {
        match self {
            IndicatorFamily::Rsi => "RSI",
            IndicatorFamily::Stochastic => "Stochastic %K",
            IndicatorFamily::Cci => "CCI",
            IndicatorFamily::WilliamsR => "Williams %R",
            IndicatorFamily::Macd => "MACD",
            IndicatorFamily::Sma => "SMA",
            IndicatorFamily::Ema => "EMA",
            IndicatorFamily::Wma => "WMA",
            IndicatorFamily::Zlema => "ZLEMA",
            IndicatorFamily::BollingerMid => "Bollinger Mid",
        }
    }

    pub fn group(&self) -> IndicatorGroup {
        match self {
            IndicatorFamily::Rsi
            | IndicatorFamily::Stochastic
            | IndicatorFamily::Cci
            | IndicatorFamily::WilliamsR
            | IndicatorFamily::Macd => IndicatorGroup::Oscillator,
            IndicatorFamily::Sma
            | IndicatorFamily::Ema
            | IndicatorFamily::Wma
            | IndicatorFamily::Zlema
            | IndicatorFamily::BollingerMid => IndicatorGroup::MovingAverage,
        }
    }
}

/// One indicator evaluated at the latest bar for one horizon.
///
/// `value` and `signal` are both absent when the horizon needs more history
/// than the series holds or the computation is not finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorResult {
    pub family: IndicatorFamily,
    /// Display name of the family.
    #[serde(skip_deserializing)]
    pub name: &'static str,
    pub horizon: Horizon,
    /// Lookback window of the horizon.
    pub window: usize,
    pub value: Option<f64>,
    pub signal: Option<Signal>,
}

/// Buy/Sell/Neutral tally over a group of signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusSummary {
    pub buy: u32,
    pub sell: u32,
    pub neutral: u32,
    pub final_signal: Verdict,
}

impl Default for ConsensusSummary {
    fn default() -> Self {
        Self {
            buy: 0,
            sell: 0,
            neutral: 0,
            final_signal: Verdict::Neutral,
        }
    }
}
