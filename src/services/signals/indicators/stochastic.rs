//! Stochastic Oscillator indicator.

use crate::services::signals::{finite_reading, Indicator, Reading, Thresholds};
use crate::types::{Bar, IndicatorFamily};

const BANDS: Thresholds = Thresholds::new(80.0, 20.0);

/// Stochastic %K.
///
/// Compares closing price to price range over a period:
/// %K = (Current Close - Lowest Low) / (Highest High - Lowest Low) * 100
///
/// Signals:
/// - Below 20: Oversold (buy)
/// - Above 80: Overbought (sell)
pub struct Stochastic {
    k_period: usize,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self { k_period: 14 }
    }
}

impl Stochastic {
    pub fn new(k_period: usize) -> Self {
        Self {
            k_period: k_period.max(1),
        }
    }
}

/// Highest high and lowest low of the last `period` bars.
pub(crate) fn window_range(bars: &[Bar], period: usize) -> Option<(f64, f64)> {
    if period == 0 || bars.len() < period {
        return None;
    }
    let window = &bars[bars.len() - period..];
    let lowest_low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let highest_high = window
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    Some((highest_high, lowest_low))
}

impl Indicator for Stochastic {
    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Stochastic
    }

    fn min_periods(&self) -> usize {
        self.k_period
    }

    fn calculate(&self, bars: &[Bar]) -> Option<Reading> {
        let (highest_high, lowest_low) = window_range(bars, self.k_period)?;
        let range = highest_high - lowest_low;
        if range == 0.0 {
            return None;
        }

        let close = bars.last()?.close;
        let k = (close - lowest_low) / range * 100.0;
        finite_reading(k, BANDS.classify(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_support::{downtrend, uptrend};
    use crate::types::Signal;
    use chrono::NaiveDate;

    fn bar(close: f64, high: f64, low: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            close,
            high,
            low,
            volume: 0.0,
        }
    }

    #[test]
    fn test_stochastic_insufficient_data() {
        assert!(Stochastic::new(14).calculate(&uptrend(13)).is_none());
    }

    #[test]
    fn test_stochastic_uptrend_overbought() {
        let reading = Stochastic::new(14).calculate(&uptrend(30)).unwrap();
        assert!(reading.value > 80.0);
        assert_eq!(reading.signal, Signal::Sell);
    }

    #[test]
    fn test_stochastic_downtrend_oversold() {
        let reading = Stochastic::new(14).calculate(&downtrend(30)).unwrap();
        assert!(reading.value < 20.0);
        assert_eq!(reading.signal, Signal::Buy);
    }

    #[test]
    fn test_stochastic_midrange() {
        let bars = vec![bar(10.0, 20.0, 0.0), bar(10.0, 10.0, 10.0)];
        let reading = Stochastic::new(2).calculate(&bars).unwrap();
        assert_eq!(reading.value, 50.0);
        assert_eq!(reading.signal, Signal::Hold);
    }

    #[test]
    fn test_stochastic_zero_range_is_absent() {
        let bars = vec![bar(10.0, 10.0, 10.0); 5];
        assert!(Stochastic::new(5).calculate(&bars).is_none());
    }
}
