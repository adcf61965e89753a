//! Exact-timestamp inner join of two canonical series.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::domain::{CanonicalSeries, JoinedObservation};

/// Inner-join prices and consumption on the hourly timestamp and derive the
/// estimated cost (`price * consumption`).
///
/// No tolerance window, no interpolation: hours present in only one series
/// are dropped. Output order follows the (ascending) price series, so the
/// result is deterministic.
pub fn join_series(
    prices: &CanonicalSeries,
    consumption: &CanonicalSeries,
) -> Vec<JoinedObservation> {
    let by_ts: HashMap<NaiveDateTime, f64> = consumption
        .points
        .iter()
        .map(|p| (p.ts, p.value))
        .collect();

    let mut out = Vec::new();
    for p in &prices.points {
        if let Some(&mwh) = by_ts.get(&p.ts) {
            out.push(JoinedObservation {
                ts: p.ts,
                price_dkk: p.value,
                consumption_mwh: mwh,
                est_cost_dkk: p.value * mwh,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CanonicalPoint;
    use chrono::NaiveDate;

    fn hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn series(name: &'static str, points: &[(NaiveDateTime, f64)]) -> CanonicalSeries {
        CanonicalSeries {
            name,
            points: points
                .iter()
                .map(|&(ts, value)| CanonicalPoint { ts, value })
                .collect(),
        }
    }

    #[test]
    fn only_shared_hours_survive_and_cost_is_exact() {
        let prices = series("price_dkk", &[(hour(1), 10.0), (hour(2), 20.0)]);
        let consumption = series("consumption_mwh", &[(hour(1), 2.0), (hour(3), 5.0)]);

        let joined = join_series(&prices, &consumption);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].ts, hour(1));
        assert_eq!(joined[0].price_dkk, 10.0);
        assert_eq!(joined[0].consumption_mwh, 2.0);
        assert_eq!(joined[0].est_cost_dkk, 20.0);
    }

    #[test]
    fn matched_timestamps_are_symmetric_in_argument_order() {
        let a = series(
            "price_dkk",
            &[(hour(0), 1.0), (hour(1), 2.0), (hour(2), 3.0)],
        );
        let b = series("consumption_mwh", &[(hour(1), 4.0), (hour(2), 5.0), (hour(5), 6.0)]);

        let ab: Vec<NaiveDateTime> = join_series(&a, &b).iter().map(|r| r.ts).collect();
        let ba: Vec<NaiveDateTime> = join_series(&b, &a).iter().map(|r| r.ts).collect();
        assert_eq!(ab, ba);
    }

    #[test]
    fn empty_inputs_join_to_empty() {
        let prices = series("price_dkk", &[(hour(1), 10.0)]);
        let empty = series("consumption_mwh", &[]);
        assert!(join_series(&prices, &empty).is_empty());
        assert!(join_series(&empty, &prices).is_empty());
    }

    #[test]
    fn output_preserves_left_input_order() {
        let prices = series(
            "price_dkk",
            &[(hour(0), 1.0), (hour(1), 2.0), (hour(2), 3.0), (hour(3), 4.0)],
        );
        let consumption = series(
            "consumption_mwh",
            &[(hour(0), 1.0), (hour(1), 1.0), (hour(2), 1.0), (hour(3), 1.0)],
        );
        let hours: Vec<NaiveDateTime> = join_series(&prices, &consumption)
            .iter()
            .map(|r| r.ts)
            .collect();
        assert_eq!(hours, vec![hour(0), hour(1), hour(2), hour(3)]);
    }
}
