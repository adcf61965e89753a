//! Reporting utilities: summary statistics and formatted terminal output.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};

use crate::domain::{CanonicalSeries, JoinedObservation};

pub mod format;

pub use format::*;

/// Summary of a fetched price series.
#[derive(Debug, Clone)]
pub struct PriceStats {
    pub n: usize,
    pub mean: f64,
    pub max: f64,
    pub max_at: NaiveDateTime,
    /// `max - min` over the window.
    pub spread: f64,
}

/// Summary of the joined price/consumption series.
#[derive(Debug, Clone)]
pub struct JoinStats {
    pub n: usize,
    pub avg_price: f64,
    pub peak_consumption: f64,
    pub peak_at: NaiveDateTime,
    pub total_cost: f64,
}

/// Hour-of-day averages over the joined series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyAverage {
    pub hour: u32,
    pub avg_price_dkk: f64,
    pub avg_consumption_mwh: f64,
}

/// Compute price summary stats; `None` for an empty series.
pub fn price_stats(series: &CanonicalSeries) -> Option<PriceStats> {
    let first = series.points.first()?;

    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut max_at = first.ts;

    for p in &series.points {
        sum += p.value;
        min = min.min(p.value);
        if p.value > max {
            max = p.value;
            max_at = p.ts;
        }
    }

    let n = series.points.len();
    Some(PriceStats {
        n,
        mean: sum / n as f64,
        max,
        max_at,
        spread: max - min,
    })
}

/// Compute joined-series stats; `None` when no hours overlapped.
pub fn join_stats(rows: &[JoinedObservation]) -> Option<JoinStats> {
    let first = rows.first()?;

    let mut price_sum = 0.0;
    let mut total_cost = 0.0;
    let mut peak_consumption = f64::NEG_INFINITY;
    let mut peak_at = first.ts;

    for r in rows {
        price_sum += r.price_dkk;
        total_cost += r.est_cost_dkk;
        if r.consumption_mwh > peak_consumption {
            peak_consumption = r.consumption_mwh;
            peak_at = r.ts;
        }
    }

    Some(JoinStats {
        n: rows.len(),
        avg_price: price_sum / rows.len() as f64,
        peak_consumption,
        peak_at,
        total_cost,
    })
}

/// Group the joined series by hour of day and average both measurements.
pub fn hourly_summary(rows: &[JoinedObservation]) -> Vec<HourlyAverage> {
    let mut buckets: BTreeMap<u32, (f64, f64, usize)> = BTreeMap::new();
    for r in rows {
        let entry = buckets.entry(r.ts.hour()).or_insert((0.0, 0.0, 0));
        entry.0 += r.price_dkk;
        entry.1 += r.consumption_mwh;
        entry.2 += 1;
    }

    buckets
        .into_iter()
        .map(|(hour, (price_sum, cons_sum, n))| HourlyAverage {
            hour,
            avg_price_dkk: price_sum / n as f64,
            avg_consumption_mwh: cons_sum / n as f64,
        })
        .collect()
}
