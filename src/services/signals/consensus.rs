//! Buy/Sell/Neutral tallies over indicator signals.

use crate::types::{ConsensusSummary, Horizon, IndicatorGroup, IndicatorResult, Signal, Verdict};

/// Count signals and pick the majority of Buy versus Sell.
///
/// Holds are counted as neutral and never decide the verdict; a tie
/// (including no signals at all) is Neutral.
pub fn summarize<I>(signals: I) -> ConsensusSummary
where
    I: IntoIterator<Item = Signal>,
{
    let mut summary = ConsensusSummary::default();
    for signal in signals {
        match signal {
            Signal::Buy => summary.buy += 1,
            Signal::Sell => summary.sell += 1,
            Signal::Hold => summary.neutral += 1,
        }
    }

    summary.final_signal = if summary.buy > summary.sell {
        Verdict::Buy
    } else if summary.sell > summary.buy {
        Verdict::Sell
    } else {
        Verdict::Neutral
    };
    summary
}

/// The three tallies reported for an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsensusReport {
    pub oscillators: ConsensusSummary,
    pub moving_averages: ConsensusSummary,
    pub overall: ConsensusSummary,
}

impl ConsensusReport {
    /// Tally the signals of one horizon. Results without a signal are skipped.
    pub fn from_results(results: &[IndicatorResult], horizon: Horizon) -> Self {
        let voting = || {
            results
                .iter()
                .filter(move |r| r.horizon == horizon)
                .filter_map(|r| r.signal.map(|s| (r.family.group(), s)))
        };
        let of_group = |group: IndicatorGroup| {
            voting().filter(move |(g, _)| *g == group).map(|(_, s)| s)
        };

        Self {
            oscillators: summarize(of_group(IndicatorGroup::Oscillator)),
            moving_averages: summarize(of_group(IndicatorGroup::MovingAverage)),
            overall: summarize(voting().map(|(_, s)| s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndicatorFamily;

    #[test]
    fn test_summarize_majority_buy() {
        let summary = summarize([Signal::Buy, Signal::Buy, Signal::Sell, Signal::Hold, Signal::Hold]);
        assert_eq!(summary.buy, 2);
        assert_eq!(summary.sell, 1);
        assert_eq!(summary.neutral, 2);
        assert_eq!(summary.final_signal, Verdict::Buy);
    }

    #[test]
    fn test_summarize_majority_sell() {
        let summary = summarize([Signal::Sell, Signal::Sell, Signal::Buy]);
        assert_eq!(summary.final_signal, Verdict::Sell);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(std::iter::empty());
        assert_eq!(summary, ConsensusSummary::default());
        assert_eq!(summary.final_signal, Verdict::Neutral);
    }

    #[test]
    fn test_summarize_tie_is_neutral() {
        let summary = summarize([Signal::Buy, Signal::Sell, Signal::Hold]);
        assert_eq!(summary.final_signal, Verdict::Neutral);
    }

    #[test]
    fn test_report_uses_one_horizon_and_skips_absent() {
        let result = |family: IndicatorFamily, horizon: Horizon, signal: Option<Signal>| IndicatorResult {
            family,
            name: family.name(),
            horizon,
            window: 14,
            value: signal.map(|_| 1.0),
            signal,
        };
        let results = vec![
            result(IndicatorFamily::Rsi, Horizon::Medium, Some(Signal::Buy)),
            result(IndicatorFamily::Macd, Horizon::Medium, Some(Signal::Buy)),
            result(IndicatorFamily::Cci, Horizon::Medium, None),
            result(IndicatorFamily::Sma, Horizon::Medium, Some(Signal::Sell)),
            result(IndicatorFamily::Ema, Horizon::Short, Some(Signal::Sell)),
            result(IndicatorFamily::Wma, Horizon::Long, Some(Signal::Sell)),
        ];

        let report = ConsensusReport::from_results(&results, Horizon::Medium);
        assert_eq!(report.oscillators.buy, 2);
        assert_eq!(report.oscillators.neutral, 0);
        assert_eq!(report.oscillators.final_signal, Verdict::Buy);
        assert_eq!(report.moving_averages.sell, 1);
        assert_eq!(report.moving_averages.final_signal, Verdict::Sell);
        assert_eq!(report.overall.buy + report.overall.sell + report.overall.neutral, 3);
        assert_eq!(report.overall.final_signal, Verdict::Buy);
    }
}
