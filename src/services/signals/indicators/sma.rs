//! Simple Moving Average (SMA) indicator.

use crate::services::signals::{average_reading, Indicator, Reading};
use crate::types::{Bar, IndicatorFamily};

/// Mean close of the last `period` bars.
pub(crate) fn sma_of_last(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }
    Some(bars[bars.len() - period..].iter().map(|b| b.close).sum::<f64>() / period as f64)
}

/// SMA (Simple Moving Average) indicator.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period: period.max(1) }
    }
}

impl Indicator for Sma {
    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Sma
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Option<Reading> {
        let sma = sma_of_last(bars, self.period)?;
        average_reading(bars, sma)
    }
}
