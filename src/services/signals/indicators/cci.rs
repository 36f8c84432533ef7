//! Commodity Channel Index (CCI) indicator.

use crate::services::signals::{finite_reading, Indicator, Reading, Thresholds};
use crate::types::{Bar, IndicatorFamily};

const BANDS: Thresholds = Thresholds::new(100.0, -100.0);

/// Lambert's constant; scales roughly 70-80% of values into +/-100.
const CCI_CONSTANT: f64 = 0.015;

/// CCI (Commodity Channel Index) indicator.
///
/// Measures the current price level relative to an average price level:
/// CCI = (TP - SMA) / (0.015 * Mean Deviation)
/// where TP = Typical Price = (High + Low + Close) / 3
///
/// Signals:
/// - Below -100: Oversold (buy)
/// - Above +100: Overbought (sell)
pub struct Cci {
    period: usize,
}

impl Default for Cci {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl Cci {
    pub fn new(period: usize) -> Self {
        Self { period: period.max(1) }
    }

    fn typical_price(bar: &Bar) -> f64 {
        (bar.high + bar.low + bar.close) / 3.0
    }

    fn mean_deviation(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().map(|v| (v - mean).abs()).sum::<f64>() / values.len() as f64
    }
}

impl Indicator for Cci {
    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Cci
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Option<Reading> {
        if bars.len() < self.period {
            return None;
        }

        let typical_prices: Vec<f64> = bars[bars.len() - self.period..]
            .iter()
            .map(Self::typical_price)
            .collect();

        let sma = typical_prices.iter().sum::<f64>() / self.period as f64;
        let mean_dev = Self::mean_deviation(&typical_prices, sma);
        if mean_dev == 0.0 {
            return None;
        }

        let current_tp = Self::typical_price(bars.last()?);
        let cci = (current_tp - sma) / (CCI_CONSTANT * mean_dev);
        finite_reading(cci, BANDS.classify(cci))
    }
}
