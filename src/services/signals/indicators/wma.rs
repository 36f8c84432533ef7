//! Weighted Moving Average (WMA) indicator.

use crate::services::signals::{average_reading, Indicator, Reading};
use crate::types::{Bar, IndicatorFamily};

/// WMA with linear weights 1..=period, the latest bar weighted highest.
pub struct Wma {
    period: usize,
}

impl Wma {
    pub fn new(period: usize) -> Self {
        Self { period: period.max(1) }
    }
}

impl Indicator for Wma {
    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Wma
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Option<Reading> {
        if bars.len() < self.period {
            return None;
        }

        let window = &bars[bars.len() - self.period..];
        let weighted: f64 = window
            .iter()
            .zip(1..=self.period)
            .map(|(bar, weight)| bar.close * weight as f64)
            .sum();
        let total_weight = (self.period * (self.period + 1) / 2) as f64;

        average_reading(bars, weighted / total_weight)
    }
}
