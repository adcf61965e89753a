//! Trailing query window derivation.

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::domain::TimeWindow;

/// Derive the half-open window `[now - lag - span, now - lag)`.
///
/// The lag keeps the window clear of hours the upstream has not settled yet;
/// both bounds are truncated to minute precision because the API accepts
/// nothing finer. Pure function of its inputs; callers supply `now` so runs
/// are reproducible in tests.
pub fn compute_window(span_days: i64, lag_days: i64, now: NaiveDateTime) -> TimeWindow {
    let end = truncate_to_minute(now - Duration::days(lag_days));
    let start = end - Duration::days(span_days);
    TimeWindow { start, end }
}

fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    // Seconds and sub-seconds are always in range, so the fallback never fires.
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn window_trails_now_by_the_lag() {
        let now = at(2025, 8, 1, 12, 45, 0);
        let window = compute_window(7, 8, now);
        assert_eq!(window.end, at(2025, 7, 24, 12, 45, 0));
        assert_eq!(window.start, at(2025, 7, 17, 12, 45, 0));
        assert!(window.start < window.end);
    }

    #[test]
    fn bounds_are_truncated_to_the_minute() {
        let now = at(2025, 8, 1, 12, 45, 33);
        let window = compute_window(1, 1, now);
        assert_eq!(window.end, at(2025, 7, 31, 12, 45, 0));
        assert_eq!(window.start, at(2025, 7, 30, 12, 45, 0));
    }

    #[test]
    fn start_precedes_end_for_any_positive_span() {
        let now = at(2025, 1, 15, 0, 0, 0);
        for span in [1, 7, 30] {
            for lag in [1, 8] {
                let window = compute_window(span, lag, now);
                assert!(window.start < window.end, "span={span} lag={lag}");
                assert_eq!(window.end - window.start, Duration::days(span));
            }
        }
    }
}
