use std::collections::HashMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Offset, TimeZone, Utc};

use crate::models::{DailySalesAndCost, Trend};

/// Offset used to bucket "today" and hour-of-day figures.
pub const LOCAL_OFFSET_SECS: i32 = 6 * 3600;
pub const LOCAL_OFFSET: &str = "+06:00";

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// `[now - days, now]` and the `days` before it.
pub fn compare_periods(now: DateTime<Utc>, days: i64) -> (Period, Period) {
    let start = now - Duration::days(days);
    let previous_start = start - Duration::days(days);
    (
        Period { start, end: now },
        Period { start: previous_start, end: start },
    )
}

/// Midnight (UTC) of the first day of a `days`-long series ending today.
pub fn series_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let first_day = (now - Duration::days(days.max(1) - 1)).date_naive();
    first_day.and_time(NaiveTime::MIN).and_utc()
}

/// What to report when the previous period is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoBaseline {
    Null,
    HundredIfAny,
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn percent_change(current: f64, previous: f64, no_baseline: NoBaseline, decimals: u32) -> Option<f64> {
    if previous > 0.0 {
        return Some(round_to((current - previous) / previous * 100.0, decimals));
    }
    match no_baseline {
        NoBaseline::Null => None,
        NoBaseline::HundredIfAny => Some(if current > 0.0 { 100.0 } else { 0.0 }),
    }
}

pub fn trend(current: f64, previous: f64) -> Trend {
    if previous <= 0.0 || current == previous {
        Trend::Neutral
    } else if current > previous {
        Trend::Up
    } else {
        Trend::Down
    }
}

pub fn compared_to(days: i64) -> String {
    format!("Last {} days", days)
}

pub fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{} AM", hour),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}

pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// Zero-filled `days`-long series ending today, keyed by `YYYY-MM-DD` (UTC).
/// `found` maps a date to its `(sales, cost)` totals.
pub fn daily_series(now: DateTime<Utc>, days: i64, found: &HashMap<String, (f64, f64)>) -> Vec<DailySalesAndCost> {
    (0..days.max(0))
        .rev()
        .map(|back| {
            let day = now - Duration::days(back);
            let date = day.format("%Y-%m-%d").to_string();
            let (total_sales, total_cost) = found.get(&date).copied().unwrap_or((0.0, 0.0));
            DailySalesAndCost {
                day: day.format("%a").to_string(),
                date,
                total_sales,
                total_cost,
            }
        })
        .collect()
}

/// Highest sum over any `days` consecutive entries; zero when there are fewer entries.
pub fn best_window_sum(daily: &[f64], days: usize) -> f64 {
    if days == 0 || daily.len() < days {
        return 0.0;
    }
    daily
        .windows(days)
        .map(|w| w.iter().sum::<f64>())
        .fold(0.0, f64::max)
}

/// Yesterday, today and tomorrow midnights in local time, as UTC instants.
pub fn local_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>) {
    let offset = FixedOffset::east_opt(LOCAL_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    let local_date = now.with_timezone(&offset).date_naive();
    let today = offset
        .from_local_datetime(&local_date.and_time(NaiveTime::MIN))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now);
    (today - Duration::days(1), today, today + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_compare_periods() {
        let now = at("2025-03-15T12:00:00Z");
        let (current, previous) = compare_periods(now, 7);
        assert_eq!(current.start, at("2025-03-08T12:00:00Z"));
        assert_eq!(current.end, now);
        assert_eq!(previous.start, at("2025-03-01T12:00:00Z"));
        assert_eq!(previous.end, current.start);
    }

    #[test]
    fn test_series_start() {
        let now = at("2025-03-15T12:00:00Z");
        assert_eq!(series_start(now, 7), at("2025-03-09T00:00:00Z"));
        assert_eq!(series_start(now, 1), at("2025-03-15T00:00:00Z"));
    }

    #[test]
    fn test_percent_change_conventions() {
        assert_eq!(percent_change(15.0, 10.0, NoBaseline::Null, 2), Some(50.0));
        assert_eq!(percent_change(2.0, 3.0, NoBaseline::Null, 2), Some(-33.33));
        assert_eq!(percent_change(2.0, 3.0, NoBaseline::HundredIfAny, 1), Some(-33.3));
        assert_eq!(percent_change(5.0, 0.0, NoBaseline::Null, 2), None);
        assert_eq!(percent_change(0.0, 0.0, NoBaseline::Null, 2), None);
        assert_eq!(percent_change(5.0, 0.0, NoBaseline::HundredIfAny, 2), Some(100.0));
        assert_eq!(percent_change(0.0, 0.0, NoBaseline::HundredIfAny, 2), Some(0.0));
    }

    #[test]
    fn test_trend() {
        assert_eq!(trend(12.0, 10.0), Trend::Up);
        assert_eq!(trend(8.0, 10.0), Trend::Down);
        assert_eq!(trend(10.0, 10.0), Trend::Neutral);
        assert_eq!(trend(10.0, 0.0), Trend::Neutral);
    }

    #[test]
    fn test_hour_labels() {
        assert_eq!(hour_label(0), "12 AM");
        assert_eq!(hour_label(9), "9 AM");
        assert_eq!(hour_label(12), "12 PM");
        assert_eq!(hour_label(13), "1 PM");
        assert_eq!(hour_label(23), "11 PM");
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn test_daily_series_zero_fills() {
        let now = at("2025-03-15T12:00:00Z");
        let found = HashMap::from([("2025-03-14".to_string(), (300.0, 200.0))]);
        let series = daily_series(now, 3, &found);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, "2025-03-13");
        assert_eq!(series[0].day, "Thu");
        assert_eq!(series[1].total_sales, 300.0);
        assert_eq!(series[1].total_cost, 200.0);
        assert_eq!(series[2].date, "2025-03-15");
        assert_eq!(series[2].day, "Sat");
        assert_eq!(series[2].total_sales, 0.0);
    }

    #[test]
    fn test_best_window_sum() {
        let daily = [10.0, 50.0, 5.0, 40.0, 30.0];
        assert_eq!(best_window_sum(&daily, 2), 70.0);
        assert_eq!(best_window_sum(&daily, 5), 135.0);
        assert_eq!(best_window_sum(&daily, 6), 0.0);
        assert_eq!(best_window_sum(&[], 0), 0.0);
    }

    #[test]
    fn test_local_day_bounds() {
        // 20:00 UTC is already the next day at +06:00
        let now = at("2025-03-15T20:00:00Z");
        let (yesterday, today, tomorrow) = local_day_bounds(now);
        assert_eq!(today, at("2025-03-15T18:00:00Z"));
        assert_eq!(yesterday, at("2025-03-14T18:00:00Z"));
        assert_eq!(tomorrow, at("2025-03-16T18:00:00Z"));
    }
}
