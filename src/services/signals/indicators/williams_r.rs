//! Williams %R indicator.

use super::stochastic::window_range;
use crate::services::signals::{finite_reading, Indicator, Reading, Thresholds};
use crate::types::{Bar, IndicatorFamily};

const BANDS: Thresholds = Thresholds::new(-20.0, -80.0);

/// Williams %R.
///
/// %R = (Highest High - Close) / (Highest High - Lowest Low) * -100
///
/// Ranges from -100 to 0:
/// - Below -80: Oversold (buy)
/// - Above -20: Overbought (sell)
pub struct WilliamsR {
    period: usize,
}

impl Default for WilliamsR {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        Self { period: period.max(1) }
    }
}

impl Indicator for WilliamsR {
    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::WilliamsR
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Option<Reading> {
        let (highest_high, lowest_low) = window_range(bars, self.period)?;
        let range = highest_high - lowest_low;
        if range == 0.0 {
            return None;
        }

        let close = bars.last()?.close;
        let wr = (highest_high - close) / range * -100.0;
        finite_reading(wr, BANDS.classify(wr))
    }
}
