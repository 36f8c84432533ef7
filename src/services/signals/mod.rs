//! Technical indicators and consensus voting.
//!
//! Indicators read a cleaned, date-ascending bar series and evaluate the
//! latest bar only. Each horizon gets its own set of indicator instances.

pub mod cleaning;
pub mod consensus;
pub mod engine;
pub mod indicators;

pub use consensus::{summarize, ConsensusReport};
pub use engine::compute_indicators;

use crate::types::{Bar, IndicatorFamily, Signal};

/// Value and verdict of an indicator at the latest bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: f64,
    pub signal: Signal,
}

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Family this instance reports under.
    fn family(&self) -> IndicatorFamily;

    /// Minimum number of bars required for calculation.
    fn min_periods(&self) -> usize;

    /// Evaluate the indicator at the last bar.
    /// Returns None if there is too little data or the value is undefined.
    fn calculate(&self, bars: &[Bar]) -> Option<Reading>;
}

/// Overbought/oversold bands of a momentum oscillator.
///
/// Both bounds are exclusive: a value sitting exactly on a band is a Hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub upper: f64,
    pub lower: f64,
}

impl Thresholds {
    pub const fn new(upper: f64, lower: f64) -> Self {
        Self { upper, lower }
    }

    pub fn classify(&self, value: f64) -> Signal {
        if value > self.upper {
            Signal::Sell
        } else if value < self.lower {
            Signal::Buy
        } else {
            Signal::Hold
        }
    }
}

/// Verdict of a moving average against the latest close.
pub fn compare_to_close(close: f64, average: f64) -> Signal {
    if close > average {
        Signal::Buy
    } else if close < average {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Build a reading, rejecting non-finite values.
pub fn finite_reading(value: f64, signal: Signal) -> Option<Reading> {
    value.is_finite().then_some(Reading { value, signal })
}

/// Moving-average reading for the last bar.
pub(crate) fn average_reading(bars: &[Bar], average: f64) -> Option<Reading> {
    let close = bars.last()?.close;
    finite_reading(average, compare_to_close(close, average))
}

pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_open_intervals() {
        let rsi = Thresholds::new(70.0, 30.0);
        assert_eq!(rsi.classify(70.0), Signal::Hold);
        assert_eq!(rsi.classify(30.0), Signal::Hold);
        assert_eq!(rsi.classify(70.01), Signal::Sell);
        assert_eq!(rsi.classify(29.99), Signal::Buy);
    }

    #[test]
    fn test_compare_to_close() {
        assert_eq!(compare_to_close(10.0, 10.0), Signal::Hold);
        assert_eq!(compare_to_close(10.5, 10.0), Signal::Buy);
        assert_eq!(compare_to_close(9.5, 10.0), Signal::Sell);
    }

    #[test]
    fn test_non_finite_reading_rejected() {
        assert!(finite_reading(f64::NAN, Signal::Hold).is_none());
        assert!(finite_reading(f64::INFINITY, Signal::Buy).is_none());
        assert!(finite_reading(1.0, Signal::Buy).is_some());
    }
}
