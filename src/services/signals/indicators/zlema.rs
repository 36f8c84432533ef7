//! Zero-Lag Exponential Moving Average (ZLEMA) indicator.

use super::ema::ema_series;
use crate::services::signals::{average_reading, closes, Indicator, Reading};
use crate::types::{Bar, IndicatorFamily};

/// ZLEMA indicator.
///
/// Removes most of the EMA's lag by feeding it a de-lagged series:
/// lag = (period - 1) / 2
/// x = close + (close - close[lag bars ago])
/// ZLEMA = EMA(period) of x
pub struct Zlema {
    period: usize,
}

impl Zlema {
    pub fn new(period: usize) -> Self {
        Self { period: period.max(1) }
    }

    fn lag(&self) -> usize {
        (self.period - 1) / 2
    }
}

impl Indicator for Zlema {
    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Zlema
    }

    fn min_periods(&self) -> usize {
        self.period + self.lag()
    }

    fn calculate(&self, bars: &[Bar]) -> Option<Reading> {
        if bars.len() < self.min_periods() {
            return None;
        }

        let lag = self.lag();
        let closes = closes(bars);
        let delagged: Vec<f64> = closes[lag..]
            .iter()
            .zip(&closes)
            .map(|(current, lagged)| 2.0 * current - lagged)
            .collect();

        let zlema = *ema_series(&delagged, self.period).last()?;
        average_reading(bars, zlema)
    }
}
