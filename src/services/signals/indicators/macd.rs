//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema_series;
use crate::config::MacdParams;
use crate::services::signals::{closes, finite_reading, Indicator, Reading};
use crate::types::{Bar, IndicatorFamily, Signal};

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(fast) - EMA(slow)
/// - Signal Line = EMA(signal) of MACD Line
///
/// Buy while the MACD line is above the signal line, sell while below.
/// The reported value is the MACD line.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(params: MacdParams) -> Self {
        let fast = params.fast.max(1);
        Self {
            fast_period: fast,
            slow_period: params.slow.max(fast),
            signal_period: params.signal.max(1),
        }
    }

    /// Latest MACD and signal line values.
    fn lines(&self, values: &[f64]) -> Option<(f64, f64)> {
        let fast_ema = ema_series(values, self.fast_period);
        let slow_ema = ema_series(values, self.slow_period);
        if slow_ema.is_empty() {
            return None;
        }

        // Align the EMAs (fast starts earlier)
        let offset = self.slow_period - self.fast_period;
        let macd_line: Vec<f64> = fast_ema
            .iter()
            .skip(offset)
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = ema_series(&macd_line, self.signal_period);
        Some((*macd_line.last()?, *signal_line.last()?))
    }
}

impl Indicator for Macd {
    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Macd
    }

    fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn calculate(&self, bars: &[Bar]) -> Option<Reading> {
        if bars.len() < self.min_periods() {
            return None;
        }

        let (macd, signal) = self.lines(&closes(bars))?;
        if !signal.is_finite() {
            return None;
        }

        let verdict = if macd > signal {
            Signal::Buy
        } else if macd < signal {
            Signal::Sell
        } else {
            Signal::Hold
        };
        finite_reading(macd, verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_support::{bars_from_closes, flat, uptrend};

    fn medium() -> Macd {
        Macd::new(MacdParams {
            fast: 12,
            slow: 26,
            signal: 9,
        })
    }

    #[test]
    fn test_macd_min_periods() {
        assert_eq!(medium().min_periods(), 34);
        assert_eq!(
            Macd::new(MacdParams { fast: 6, slow: 13, signal: 5 }).min_periods(),
            17
        );
    }

    #[test]
    fn test_macd_insufficient_data() {
        assert!(medium().calculate(&uptrend(33)).is_none());
        assert!(medium().calculate(&uptrend(34)).is_some());
    }

    #[test]
    fn test_macd_flat_is_hold() {
        let reading = medium().calculate(&flat(60, 10.0)).unwrap();
        assert_eq!(reading.value, 0.0);
        assert_eq!(reading.signal, Signal::Hold);
    }

    #[test]
    fn test_macd_accelerating_rally_is_buy() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64).powi(2) * 0.05).collect();
        let reading = medium().calculate(&bars_from_closes(&closes)).unwrap();
        assert!(reading.value > 0.0);
        assert_eq!(reading.signal, Signal::Buy);
    }

    #[test]
    fn test_macd_reversal_is_sell() {
        let mut closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        closes.extend((1..=10).map(|i| 149.0 - i as f64 * 3.0));
        let reading = medium().calculate(&bars_from_closes(&closes)).unwrap();
        assert_eq!(reading.signal, Signal::Sell);
    }
}
