//! Raw record normalization.
//!
//! Turns a batch of heterogeneous upstream rows into a canonical two-column
//! series: resolve the timestamp and measurement columns through the schema
//! policy, parse timestamps, drop rows that do not parse, and rename to the
//! canonical measurement name. Empty input and unrecognized shapes are
//! explicit outcomes, not errors.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::{CanonicalPoint, CanonicalSeries, RawRecord};
use crate::series::schema::{TIMESTAMP_CANDIDATES, resolve_column, resolve_measurement};

/// Which column family failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFamily {
    Timestamp,
    Measurement,
}

impl ColumnFamily {
    pub fn label(self) -> &'static str {
        match self {
            ColumnFamily::Timestamp => "timestamp",
            ColumnFamily::Measurement => "measurement",
        }
    }
}

/// Normalization profile for one upstream dataset.
#[derive(Debug, Clone, Copy)]
pub struct SeriesSpec {
    pub timestamp_candidates: &'static [&'static str],
    /// Substring that measurement candidates must contain.
    pub keyword: &'static str,
    /// Preference order applied over the keyword-filtered pool.
    pub preference: &'static [&'static str],
    /// Canonical column name of the resulting series.
    pub canonical_name: &'static str,
}

pub const PRICE_SERIES: SeriesSpec = SeriesSpec {
    timestamp_candidates: TIMESTAMP_CANDIDATES,
    keyword: "spotprice",
    preference: &["SpotPriceDKK"],
    canonical_name: "price_dkk",
};

pub const CONSUMPTION_SERIES: SeriesSpec = SeriesSpec {
    timestamp_candidates: TIMESTAMP_CANDIDATES,
    keyword: "consumption",
    preference: &[
        "ConsumptionMWh",
        "TotalConsumptionMWh",
        "Consumption",
        "TotalCon",
        "Cons",
    ],
    canonical_name: "consumption_mwh",
};

/// Outcome of normalizing one fetched batch.
#[derive(Debug, Clone)]
pub enum Normalized {
    Series(CanonicalSeries),
    /// The fetch returned no records at all.
    NoRecords,
    /// No acceptable column of `family`; carries the columns that were
    /// available so the caller can report the shape it saw.
    Unresolved {
        family: ColumnFamily,
        available: Vec<String>,
    },
}

impl Normalized {
    pub fn into_series(self) -> Option<CanonicalSeries> {
        match self {
            Normalized::Series(series) => Some(series),
            _ => None,
        }
    }
}

/// Normalize `records` into the canonical series described by `spec`.
pub fn normalize(records: &[RawRecord], spec: &SeriesSpec) -> Normalized {
    if records.is_empty() {
        return Normalized::NoRecords;
    }

    let available = column_names(records);
    let Some(ts_col) = resolve_column(&available, spec.timestamp_candidates) else {
        return Normalized::Unresolved {
            family: ColumnFamily::Timestamp,
            available,
        };
    };
    let Some(value_col) = resolve_measurement(&available, spec.keyword, spec.preference) else {
        return Normalized::Unresolved {
            family: ColumnFamily::Measurement,
            available,
        };
    };

    let mut points = Vec::with_capacity(records.len());
    for record in records {
        let Some(ts) = record.get(&ts_col).and_then(parse_timestamp) else {
            continue;
        };
        let Some(value) = record.get(&value_col).and_then(parse_number) else {
            continue;
        };
        points.push(CanonicalPoint { ts, value });
    }

    // Upstream order is not trusted: sort ascending and drop duplicate hours,
    // keeping the first observation for each timestamp.
    points.sort_by_key(|p| p.ts);
    points.dedup_by_key(|p| p.ts);

    Normalized::Series(CanonicalSeries {
        name: spec.canonical_name,
        points,
    })
}

/// Column names in first-seen order across the batch.
fn column_names(records: &[RawRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }
    names
}

fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    const FMTS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    let s = value.as_str()?.trim();
    for fmt in FMTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    None
}

fn parse_number(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(fields: &[(&str, Value)]) -> RawRecord {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn hour(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn empty_input_short_circuits() {
        assert!(matches!(
            normalize(&[], &CONSUMPTION_SERIES),
            Normalized::NoRecords
        ));
    }

    #[test]
    fn unrecognized_timestamp_family_is_reported() {
        let records = vec![record(&[
            ("Minutes5DK", Value::String("2025-07-01T00:05".into())),
            ("ConsumptionMWh", Value::from(12.5)),
        ])];
        match normalize(&records, &CONSUMPTION_SERIES) {
            Normalized::Unresolved { family, available } => {
                assert_eq!(family, ColumnFamily::Timestamp);
                assert_eq!(available, vec!["Minutes5DK", "ConsumptionMWh"]);
            }
            other => panic!("expected unresolved timestamp, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_measurement_family_is_reported() {
        let records = vec![record(&[
            ("HourDK", Value::String("2025-07-01T00:00:00".into())),
            ("GrossProductionMWh", Value::from(12.5)),
        ])];
        match normalize(&records, &CONSUMPTION_SERIES) {
            Normalized::Unresolved { family, .. } => {
                assert_eq!(family, ColumnFamily::Measurement);
            }
            other => panic!("expected unresolved measurement, got {other:?}"),
        }
    }

    #[test]
    fn rows_with_unparseable_timestamps_are_dropped_silently() {
        let records = vec![
            record(&[
                ("HourDK", Value::String("2025-07-01T00:00:00".into())),
                ("ConsumptionMWh", Value::from(10.0)),
            ]),
            record(&[
                ("HourDK", Value::String("yesterday".into())),
                ("ConsumptionMWh", Value::from(11.0)),
            ]),
            record(&[
                ("HourDK", Value::Null),
                ("ConsumptionMWh", Value::from(12.0)),
            ]),
        ];
        let series = normalize(&records, &CONSUMPTION_SERIES)
            .into_series()
            .unwrap();
        assert_eq!(series.name, "consumption_mwh");
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].value, 10.0);
    }

    #[test]
    fn numbers_arriving_as_strings_still_parse() {
        let records = vec![record(&[
            ("HourDK", Value::String("2025-07-01T00:00:00".into())),
            ("ConsumptionMWh", Value::String(" 1234.5 ".into())),
        ])];
        let series = normalize(&records, &CONSUMPTION_SERIES)
            .into_series()
            .unwrap();
        assert_eq!(series.points[0].value, 1234.5);
    }

    #[test]
    fn output_is_sorted_and_deduplicated_first_wins() {
        let records = vec![
            record(&[
                ("HourDK", Value::String("2025-07-01T02:00:00".into())),
                ("ConsumptionMWh", Value::from(3.0)),
            ]),
            record(&[
                ("HourDK", Value::String("2025-07-01T00:00:00".into())),
                ("ConsumptionMWh", Value::from(1.0)),
            ]),
            record(&[
                ("HourDK", Value::String("2025-07-01T00:00:00".into())),
                ("ConsumptionMWh", Value::from(99.0)),
            ]),
            record(&[
                ("HourDK", Value::String("2025-07-01T01:00:00".into())),
                ("ConsumptionMWh", Value::from(2.0)),
            ]),
        ];
        let series = normalize(&records, &CONSUMPTION_SERIES)
            .into_series()
            .unwrap();
        let got: Vec<(NaiveDateTime, f64)> =
            series.points.iter().map(|p| (p.ts, p.value)).collect();
        assert_eq!(
            got,
            vec![
                (hour(1, 0), 1.0),
                (hour(1, 1), 2.0),
                (hour(1, 2), 3.0),
            ]
        );
    }

    #[test]
    fn price_records_resolve_through_the_same_path() {
        let records = vec![record(&[
            ("HourDK", Value::String("2025-07-01T00:00:00".into())),
            ("PriceArea", Value::String("DK1".into())),
            ("SpotPriceDKK", Value::from(412.07)),
        ])];
        let series = normalize(&records, &PRICE_SERIES).into_series().unwrap();
        assert_eq!(series.name, "price_dkk");
        assert_eq!(series.points[0].value, 412.07);
    }
}
