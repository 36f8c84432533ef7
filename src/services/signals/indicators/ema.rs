//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::{average_reading, closes, Indicator, Reading};
use crate::types::{Bar, IndicatorFamily};

/// EMA series of `values`, seeded with the SMA of the first `period` values.
///
/// The first element corresponds to `values[period - 1]`; the series is empty
/// when there are fewer than `period` values.
pub(crate) fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema = Vec::with_capacity(values.len() - period + 1);

    // First EMA is SMA
    let mut current = values.iter().take(period).sum::<f64>() / period as f64;
    ema.push(current);

    for value in &values[period..] {
        current = (value - current) * multiplier + current;
        ema.push(current);
    }

    ema
}

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. Price above the EMA is a
/// buy, below is a sell.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period: period.max(1) }
    }
}

impl Indicator for Ema {
    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Ema
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Option<Reading> {
        let ema = *ema_series(&closes(bars), self.period).last()?;
        average_reading(bars, ema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_support::{downtrend, flat, uptrend};
    use crate::types::Signal;

    #[test]
    fn test_ema_series_seed_and_length() {
        let series = ema_series(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0], 2.0);
        // alpha = 0.5: 2 + (4 - 2) * 0.5 = 3, then 3 + (5 - 3) * 0.5 = 4
        assert_eq!(series[1], 3.0);
        assert_eq!(series[2], 4.0);
    }

    #[test]
    fn test_ema_series_short_input() {
        assert!(ema_series(&[1.0, 2.0], 3).is_empty());
    }

    #[test]
    fn test_ema_signals() {
        assert_eq!(Ema::new(14).calculate(&uptrend(40)).unwrap().signal, Signal::Buy);
        assert_eq!(Ema::new(14).calculate(&downtrend(40)).unwrap().signal, Signal::Sell);
        assert_eq!(Ema::new(14).calculate(&flat(40, 7.0)).unwrap().signal, Signal::Hold);
    }

    #[test]
    fn test_ema_insufficient_data() {
        assert!(Ema::new(30).calculate(&uptrend(10)).is_none());
    }
}
