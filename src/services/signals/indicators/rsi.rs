//! Relative Strength Index (RSI) indicator.

use crate::services::signals::{closes, finite_reading, Indicator, Reading, Thresholds};
use crate::types::{Bar, IndicatorFamily};

const BANDS: Thresholds = Thresholds::new(70.0, 30.0);

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold (buy)
/// - Above 70: Overbought (sell)
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period: period.max(1) }
    }

    /// Wilder-smoothed RSI of the last value, seeded with simple means.
    pub(crate) fn calculate_rsi(values: &[f64], period: usize) -> Option<f64> {
        if period == 0 || values.len() < period + 1 {
            return None;
        }

        let mut gains = Vec::with_capacity(values.len() - 1);
        let mut losses = Vec::with_capacity(values.len() - 1);

        for pair in values.windows(2) {
            let change = pair[1] - pair[0];
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        let mut avg_gain = gains.iter().take(period).sum::<f64>() / period as f64;
        let mut avg_loss = losses.iter().take(period).sum::<f64>() / period as f64;

        for i in period..gains.len() {
            avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        }

        if avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }
}

impl Indicator for Rsi {
    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Rsi
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[Bar]) -> Option<Reading> {
        let rsi = Self::calculate_rsi(&closes(bars), self.period)?;
        finite_reading(rsi, BANDS.classify(rsi))
    }
}
