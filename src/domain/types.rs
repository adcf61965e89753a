//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed by value between pipeline stages
//! - exported to CSV
//! - reused by future front-ends

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One raw upstream row: arbitrary field names mapped to scalar JSON values.
///
/// The schema is unknown at design time and varies per dataset and API
/// revision; serde_json's `preserve_order` keeps the upstream column order,
/// which the measurement-column fallback rule relies on.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Bidding zone used in the upstream `filter` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum PriceArea {
    #[value(name = "DK1")]
    #[serde(rename = "DK1")]
    Dk1,
    #[value(name = "DK2")]
    #[serde(rename = "DK2")]
    Dk2,
}

impl PriceArea {
    /// Upstream spelling of the area code.
    pub fn as_str(self) -> &'static str {
        match self {
            PriceArea::Dk1 => "DK1",
            PriceArea::Dk2 => "DK2",
        }
    }
}

impl std::fmt::Display for PriceArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open query window (`start` inclusive, `end` exclusive), minute precision.
///
/// `end` trails "now" by the settlement lag so queries never reference hours
/// the upstream has not finalized yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Upstream `start`/`end` parameter format (ISO, minute resolution).
    pub fn format_bound(bound: NaiveDateTime) -> String {
        bound.format("%Y-%m-%dT%H:%M").to_string()
    }

    pub fn start_param(&self) -> String {
        Self::format_bound(self.start)
    }

    pub fn end_param(&self) -> String {
        Self::format_bound(self.end)
    }
}

/// One normalized observation: hourly timestamp plus a single measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPoint {
    pub ts: NaiveDateTime,
    pub value: f64,
}

/// A normalized two-column series under one canonical measurement name
/// (e.g. `price_dkk`, `consumption_mwh`).
///
/// Points are sorted ascending by timestamp and timestamps are unique; the
/// normalizer enforces both before a series reaches the join or the KPIs.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalSeries {
    pub name: &'static str,
    pub points: Vec<CanonicalPoint>,
}

impl CanonicalSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// One matched hour of the price/consumption inner join.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoinedObservation {
    pub ts: NaiveDateTime,
    pub price_dkk: f64,
    pub consumption_mwh: f64,
    /// `price_dkk * consumption_mwh`.
    pub est_cost_dkk: f64,
}

/// KPI results over the demo revenue/users dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemoKpis {
    /// Quarter-over-quarter revenue growth, percent.
    pub growth_pct: f64,
    /// Mean churn rate, percent.
    pub churn_pct: f64,
    /// Average revenue per user.
    pub arpu: f64,
}

/// Resolved run configuration.
///
/// All locations and query knobs live here and are passed explicitly into the
/// stages; nothing reads paths from module-level constants.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Width of the trailing query window, days.
    pub span_days: i64,
    /// Settlement lag between "now" and the window end, days.
    pub lag_days: i64,
    pub area: PriceArea,

    /// Directory for data artifacts (clean/price/joined CSVs).
    pub out_dir: PathBuf,
    /// Directory for report artifacts (hourly summary, chart).
    pub report_dir: PathBuf,
    /// Optional raw demo table; when missing, the deterministic generator runs.
    pub raw_csv: PathBuf,
    /// Render the SVG chart for the joined series.
    pub chart: bool,
}

impl PipelineConfig {
    pub fn clean_csv(&self) -> PathBuf {
        self.out_dir.join("clean.csv")
    }

    pub fn prices_csv(&self) -> PathBuf {
        self.out_dir.join(format!("elspotprices_{}d.csv", self.span_days))
    }

    pub fn joined_csv(&self) -> PathBuf {
        self.out_dir
            .join(format!("price_consumption_{}d.csv", self.span_days))
    }

    pub fn hourly_summary_csv(&self) -> PathBuf {
        self.report_dir.join("hourly_summary.csv")
    }

    pub fn chart_svg(&self) -> PathBuf {
        self.report_dir.join("price_vs_consumption.svg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn window_bounds_format_to_minute_resolution() {
        let start = NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 7, 8)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let window = TimeWindow { start, end };
        assert_eq!(window.start_param(), "2025-07-01T08:30");
        assert_eq!(window.end_param(), "2025-07-08T08:30");
    }

    #[test]
    fn derived_paths_follow_configured_dirs() {
        let config = PipelineConfig {
            span_days: 7,
            lag_days: 8,
            area: PriceArea::Dk1,
            out_dir: PathBuf::from("data"),
            report_dir: PathBuf::from("report"),
            raw_csv: PathBuf::from("data/raw.csv"),
            chart: true,
        };
        assert_eq!(config.prices_csv(), PathBuf::from("data/elspotprices_7d.csv"));
        assert_eq!(
            config.joined_csv(),
            PathBuf::from("data/price_consumption_7d.csv")
        );
        assert_eq!(
            config.hourly_summary_csv(),
            PathBuf::from("report/hourly_summary.csv")
        );
    }
}
