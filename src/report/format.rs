//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{DemoKpis, PipelineConfig, TimeWindow};
use crate::report::{JoinStats, PriceStats};
use crate::series::Normalized;

const TS_FMT: &str = "%Y-%m-%d %H:%M";

/// Header printed once before the stages run.
pub fn format_run_header(config: &PipelineConfig, window: &TimeWindow) -> String {
    let mut out = String::new();
    out.push_str("=== elspot - spot price / consumption KPIs ===\n");
    out.push_str(&format!("Area: {}\n", config.area));
    out.push_str(&format!(
        "Window: {} -> {} ({}d span, {}d lag)\n",
        window.start_param(),
        window.end_param(),
        config.span_days,
        config.lag_days,
    ));
    out
}

/// `[demo]` KPI line.
pub fn format_demo_kpis(kpis: &DemoKpis) -> String {
    format!(
        "[demo] KPI growth QoQ: {:.2}% | churn: {:.2}% | ARPU: {:.2}",
        kpis.growth_pct, kpis.churn_pct, kpis.arpu
    )
}

/// `[prices]` summary line.
pub fn format_price_summary(stats: &PriceStats) -> String {
    format!(
        "[prices] avg: {:.2} DKK/MWh | max: {:.2} @ {} | spread: {:.2}",
        stats.mean,
        stats.max,
        stats.max_at.format(TS_FMT),
        stats.spread
    )
}

/// `[join]` summary line.
pub fn format_join_summary(stats: &JoinStats) -> String {
    format!(
        "[join] avg price: {:.2} DKK/MWh | peak consumption: {:.1} MWh @ {} | est. total cost: {:.0} DKK",
        stats.avg_price,
        stats.peak_consumption,
        stats.peak_at.format(TS_FMT),
        stats.total_cost
    )
}

/// Diagnostic line for a batch that produced no usable series.
///
/// Returns `None` when the outcome is a (possibly empty) series; the caller
/// decides how to report that case.
pub fn format_series_diagnostic(stage: &str, outcome: &Normalized) -> Option<String> {
    match outcome {
        Normalized::Series(_) => None,
        Normalized::NoRecords => Some(format!(
            "[{stage}] no records returned (check window/dataset params)."
        )),
        Normalized::Unresolved { family, available } => Some(format!(
            "[{stage}] could not resolve a {} column among: {}",
            family.label(),
            available.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::ColumnFamily;
    use chrono::NaiveDate;

    #[test]
    fn demo_line_uses_two_decimals() {
        let kpis = DemoKpis {
            growth_pct: 12.3456,
            churn_pct: 4.0,
            arpu: 0.2071,
        };
        assert_eq!(
            format_demo_kpis(&kpis),
            "[demo] KPI growth QoQ: 12.35% | churn: 4.00% | ARPU: 0.21"
        );
    }

    #[test]
    fn price_line_includes_peak_timestamp() {
        let stats = PriceStats {
            n: 24,
            mean: 412.066,
            max: 1890.0,
            max_at: NaiveDate::from_ymd_opt(2025, 7, 20)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
            spread: 2102.551,
        };
        assert_eq!(
            format_price_summary(&stats),
            "[prices] avg: 412.07 DKK/MWh | max: 1890.00 @ 2025-07-20 18:00 | spread: 2102.55"
        );
    }

    #[test]
    fn diagnostics_name_the_failed_column_family() {
        let outcome = Normalized::Unresolved {
            family: ColumnFamily::Measurement,
            available: vec!["HourDK".to_string(), "GrossProductionMWh".to_string()],
        };
        let line = format_series_diagnostic("consumption", &outcome).unwrap();
        assert!(line.contains("measurement"));
        assert!(line.contains("GrossProductionMWh"));

        let empty = Normalized::NoRecords;
        assert!(format_series_diagnostic("consumption", &empty)
            .unwrap()
            .contains("no records"));
    }
}
