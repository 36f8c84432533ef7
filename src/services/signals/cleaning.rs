//! Conversion of stored text rows into numeric bars.

use crate::types::{Bar, SeriesRecord, Timeframe};
use chrono::Datelike;

/// Parse a number in the exchange's locale (`1.234,56`).
///
/// Dots are thousands separators and the comma is the decimal mark. Blank
/// cells and the literals `None`/`nan` are treated as missing.
pub fn parse_locale_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }

    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric bars from stored rows, ascending by date.
///
/// Rows whose close does not parse are dropped. A missing high or low falls
/// back to the close and a missing volume to zero.
pub fn clean_series(records: &[SeriesRecord]) -> Vec<Bar> {
    let mut bars: Vec<Bar> = records
        .iter()
        .filter_map(|record| {
            let close = parse_locale_number(&record.close_price)?;
            Some(Bar {
                date: record.date,
                close,
                high: parse_locale_number(&record.day_high).unwrap_or(close),
                low: parse_locale_number(&record.day_low).unwrap_or(close),
                volume: parse_locale_number(&record.volume).unwrap_or(0.0),
            })
        })
        .collect();

    bars.sort_by_key(|b| b.date);
    bars
}

/// Aggregate daily bars into weekly or monthly bars.
///
/// Each bar takes the period's last close and date, its highest high, lowest
/// low and total volume. Daily input is returned unchanged.
pub fn resample(bars: &[Bar], timeframe: Timeframe) -> Vec<Bar> {
    let period_key = |bar: &Bar| -> (i32, u32) {
        match timeframe {
            Timeframe::Daily => (bar.date.year(), bar.date.ordinal()),
            Timeframe::Weekly => {
                let week = bar.date.iso_week();
                (week.year(), week.week())
            }
            Timeframe::Monthly => (bar.date.year(), bar.date.month()),
        }
    };

    if timeframe == Timeframe::Daily {
        return bars.to_vec();
    }

    let mut resampled: Vec<Bar> = Vec::new();
    let mut current_key = None;

    for bar in bars {
        let key = period_key(bar);
        match resampled.last_mut() {
            Some(last) if current_key == Some(key) => {
                last.date = bar.date;
                last.close = bar.close;
                last.high = last.high.max(bar.high);
                last.low = last.low.min(bar.low);
                last.volume += bar.volume;
            }
            _ => {
                resampled.push(*bar);
                current_key = Some(key);
            }
        }
    }

    resampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InstrumentCode;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: NaiveDate, close: &str, high: &str, volume: &str) -> SeriesRecord {
        SeriesRecord {
            instrument: InstrumentCode::parse("ALK").unwrap(),
            date: day,
            close_price: close.into(),
            day_high: high.into(),
            day_low: "".into(),
            day_average: "".into(),
            percent_change: "".into(),
            volume: volume.into(),
            best_turnover: "".into(),
            total_turnover: "".into(),
        }
    }

    fn bar(day: NaiveDate, close: f64) -> Bar {
        Bar {
            date: day,
            close,
            high: close + 1.0,
            low: close - 1.0,
            volume: 10.0,
        }
    }

    #[test]
    fn test_parse_locale_number() {
        assert_eq!(parse_locale_number("2.140,00"), Some(2140.0));
        assert_eq!(parse_locale_number("1.234.567,89"), Some(1234567.89));
        assert_eq!(parse_locale_number("-0,47"), Some(-0.47));
        assert_eq!(parse_locale_number("120"), Some(120.0));
        assert_eq!(parse_locale_number(" 21 600,00 "), Some(21600.0));
    }

    #[test]
    fn test_parse_locale_number_missing() {
        assert_eq!(parse_locale_number(""), None);
        assert_eq!(parse_locale_number("None"), None);
        assert_eq!(parse_locale_number("nan"), None);
        assert_eq!(parse_locale_number("n/a"), None);
    }

    #[test]
    fn test_clean_series_drops_bad_close() {
        let records = vec![
            record(date(2024, 1, 3), "10,50", "11,00", "5"),
            record(date(2024, 1, 2), "", "9", "5"),
            record(date(2024, 1, 1), "9,00", "", ""),
        ];
        let bars = clean_series(&records);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, date(2024, 1, 1));
        assert_eq!(bars[0].high, 9.0);
        assert_eq!(bars[0].volume, 0.0);
        assert_eq!(bars[1].close, 10.5);
        assert_eq!(bars[1].high, 11.0);
    }

    #[test]
    fn test_resample_weekly() {
        // 2024-01-01 is a Monday.
        let bars = vec![
            bar(date(2024, 1, 1), 10.0),
            bar(date(2024, 1, 3), 14.0),
            bar(date(2024, 1, 5), 12.0),
            bar(date(2024, 1, 8), 11.0),
        ];
        let weekly = resample(&bars, Timeframe::Weekly);
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].date, date(2024, 1, 5));
        assert_eq!(weekly[0].close, 12.0);
        assert_eq!(weekly[0].high, 15.0);
        assert_eq!(weekly[0].low, 9.0);
        assert_eq!(weekly[0].volume, 30.0);
        assert_eq!(weekly[1].close, 11.0);
    }

    #[test]
    fn test_resample_monthly_across_year() {
        let bars = vec![
            bar(date(2023, 12, 28), 5.0),
            bar(date(2024, 1, 2), 6.0),
            bar(date(2024, 1, 31), 7.0),
            bar(date(2024, 2, 1), 8.0),
        ];
        let monthly = resample(&bars, Timeframe::Monthly);
        let closes: Vec<f64> = monthly.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![5.0, 7.0, 8.0]);
        assert_eq!(monthly[1].date, date(2024, 1, 31));
    }

    #[test]
    fn test_resample_daily_is_identity() {
        let bars = vec![bar(date(2024, 1, 1), 1.0), bar(date(2024, 1, 2), 2.0)];
        assert_eq!(resample(&bars, Timeframe::Daily), bars);
    }
}
