//! Business KPI computations.
//!
//! All three are pure and stateless: they recompute from the series they are
//! given and guard the degenerate cases (too few periods, zero denominators,
//! empty input) with defined zero results instead of failing.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};

/// Quarter-over-quarter growth of the summed value, in percent.
///
/// Observations are bucketed into calendar quarters (Jan–Mar, Apr–Jun,
/// Jul–Sep, Oct–Dec); the two most recent quarters are compared. Fewer than
/// two quarters means growth is undefined and reports as 0.0, as does a zero
/// previous quarter.
pub fn growth_qoq(points: &[(NaiveDateTime, f64)]) -> f64 {
    // The ordered map keys double as the sort: buckets come out in calendar
    // order regardless of input order.
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for &(ts, value) in points {
        *buckets.entry(quarter_key(ts)).or_insert(0.0) += value;
    }

    if buckets.len() < 2 {
        return 0.0;
    }

    let sums: Vec<f64> = buckets.values().copied().collect();
    let prev = sums[sums.len() - 2];
    let curr = sums[sums.len() - 1];
    if prev == 0.0 {
        return 0.0;
    }
    (curr - prev) / prev * 100.0
}

/// Mean churn rate, in percent. Empty input reports 0.0.
pub fn churn(rates: &[f64]) -> f64 {
    if rates.is_empty() {
        return 0.0;
    }
    rates.iter().sum::<f64>() / rates.len() as f64 * 100.0
}

/// Average revenue per user; 0.0 when there are no users.
pub fn arpu(total_revenue: f64, total_users: f64) -> f64 {
    if total_users == 0.0 {
        return 0.0;
    }
    total_revenue / total_users
}

fn quarter_key(ts: NaiveDateTime) -> (i32, u32) {
    (ts.year(), (ts.month() - 1) / 3 + 1)
}
