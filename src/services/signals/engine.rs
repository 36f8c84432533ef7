use super::indicators::indicators_for;
use crate::config::IndicatorConfig;
use crate::types::{Bar, Horizon, IndicatorResult};

/// Evaluate every indicator family over every horizon at the latest bar.
///
/// Results are ordered by horizon (short, medium, long) and then by family,
/// oscillators first. A horizon that needs more bars than `bars` holds gets
/// a result with neither value nor signal.
pub fn compute_indicators(bars: &[Bar], config: &IndicatorConfig) -> Vec<IndicatorResult> {
    let mut results = Vec::with_capacity(Horizon::ALL.len() * 10);

    for horizon in Horizon::ALL {
        let settings = config.horizon(horizon);
        for indicator in indicators_for(settings) {
            let reading = if bars.len() >= indicator.min_periods() {
                indicator.calculate(bars)
            } else {
                None
            };

            results.push(IndicatorResult {
                family: indicator.family(),
                name: indicator.family().name(),
                horizon,
                window: settings.window,
                value: reading.map(|r| r.value),
                signal: reading.map(|r| r.signal),
            });
        }
    }

    results
}
