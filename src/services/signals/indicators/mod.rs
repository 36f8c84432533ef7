//! Technical indicator implementations.

pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod williams_r;
pub mod wma;
pub mod zlema;

pub use bollinger::BollingerMid;
pub use cci::Cci;
pub use ema::Ema;
pub use macd::Macd;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::Stochastic;
pub use williams_r::WilliamsR;
pub use wma::Wma;
pub use zlema::Zlema;

use super::Indicator;
use crate::config::HorizonSettings;

/// Every indicator for one horizon, oscillators first.
pub fn indicators_for(settings: &HorizonSettings) -> Vec<Box<dyn Indicator>> {
    let window = settings.window;
    vec![
        // Momentum oscillators
        Box::new(Rsi::new(window)),
        Box::new(Stochastic::new(window)),
        Box::new(Cci::new(window)),
        Box::new(WilliamsR::new(window)),
        Box::new(Macd::new(settings.macd)),
        // Moving averages
        Box::new(Sma::new(window)),
        Box::new(Ema::new(window)),
        Box::new(Wma::new(window)),
        Box::new(Zlema::new(window)),
        Box::new(BollingerMid::new(window)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndicatorConfig;
    use crate::types::IndicatorFamily;

    #[test]
    fn test_indicator_order_matches_families() {
        let config = IndicatorConfig::default();
        let families: Vec<IndicatorFamily> = indicators_for(&config.medium)
            .iter()
            .map(|i| i.family())
            .collect();

        let expected: Vec<IndicatorFamily> = IndicatorFamily::OSCILLATORS
            .into_iter()
            .chain(IndicatorFamily::MOVING_AVERAGES)
            .collect();
        assert_eq!(families, expected);
    }
}
