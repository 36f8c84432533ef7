//! Bollinger Bands midline.

use super::sma::sma_of_last;
use crate::services::signals::{average_reading, Indicator, Reading};
use crate::types::{Bar, IndicatorFamily};

/// Middle Bollinger band, the SMA the outer bands are built around.
///
/// Votes as a moving average: price above the midline is a buy, below a sell.
pub struct BollingerMid {
    period: usize,
}

impl Default for BollingerMid {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl BollingerMid {
    pub fn new(period: usize) -> Self {
        Self { period: period.max(1) }
    }
}

impl Indicator for BollingerMid {
    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::BollingerMid
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Option<Reading> {
        let mid = sma_of_last(bars, self.period)?;
        average_reading(bars, mid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::Sma;
    use crate::services::signals::test_support::{downtrend, uptrend};
    use crate::types::Signal;

    #[test]
    fn test_midline_matches_sma() {
        let bars = uptrend(25);
        let mid = BollingerMid::new(20).calculate(&bars).unwrap();
        let sma = Sma::new(20).calculate(&bars).unwrap();
        assert_eq!(mid, sma);
        assert_eq!(mid.signal, Signal::Buy);
    }

    #[test]
    fn test_midline_downtrend_sell() {
        assert_eq!(
            BollingerMid::default().calculate(&downtrend(25)).unwrap().signal,
            Signal::Sell
        );
    }
}
