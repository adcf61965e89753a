//! Dual-axis price/consumption chart.
//!
//! Rendered with Plotters' SVG backend: price (DKK/MWh) on the left axis,
//! consumption (MWh) on the right, both as line series over the joined hourly
//! timestamps. SVG keeps the backend free of native font dependencies.

use std::fs::create_dir_all;
use std::path::Path;

use chrono::NaiveDateTime;
use plotters::prelude::*;

use crate::domain::JoinedObservation;
use crate::error::AppError;

const CHART_SIZE: (u32, u32) = (1200, 500);

/// Render the joined series to an SVG at `path`. Empty input draws nothing
/// and is not an error.
pub fn write_price_consumption_chart(
    path: &Path,
    rows: &[JoinedObservation],
) -> Result<(), AppError> {
    if rows.is_empty() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| {
                AppError::new(
                    2,
                    format!("Failed to create directory '{}': {e}", parent.display()),
                )
            })?;
        }
    }

    // Join output is ascending by timestamp, so the x range is first..last.
    let (t0, t1) = pad_time_range(rows[0].ts, rows[rows.len() - 1].ts);
    // plotters 0.3 is missing the `AsRangedCoord` glue for `Range<NaiveDateTime>`
    // (it has it for `NaiveDate`/`DateTime<Z>`), so hand it the coord descriptor
    // explicitly. Same value type, same axis behavior.
    let x_primary: RangedDateTime<NaiveDateTime> = (t0..t1).into();
    let x_secondary: RangedDateTime<NaiveDateTime> = (t0..t1).into();
    let (price_lo, price_hi) = pad_value_range(rows.iter().map(|r| r.price_dkk));
    let (cons_lo, cons_hi) = pad_value_range(rows.iter().map(|r| r.consumption_mwh));

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(56)
        .right_y_label_area_size(56)
        .build_cartesian_2d(x_primary, price_lo..price_hi)
        .map_err(chart_err)?
        .set_secondary_coord(x_secondary, cons_lo..cons_hi);

    chart
        .configure_mesh()
        .x_desc("Time (hourly)")
        .y_desc("Price (DKK/MWh)")
        .x_labels(8)
        .x_label_formatter(&|ts: &NaiveDateTime| ts.format("%d %b %H:%M").to_string())
        .draw()
        .map_err(chart_err)?;
    chart
        .configure_secondary_axes()
        .y_desc("Consumption (MWh)")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            rows.iter().map(|r| (r.ts, r.price_dkk)),
            &BLUE,
        ))
        .map_err(chart_err)?
        .label("Price (DKK/MWh)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));

    chart
        .draw_secondary_series(LineSeries::new(
            rows.iter().map(|r| (r.ts, r.consumption_mwh)),
            &RED,
        ))
        .map_err(chart_err)?
        .label("Consumption (MWh)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

/// Widen a degenerate x range so a single-hour series still builds a chart.
fn pad_time_range(t0: NaiveDateTime, t1: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    if t0 == t1 {
        (t0, t1 + chrono::Duration::hours(1))
    } else {
        (t0, t1)
    }
}

/// Min/max with padding; degenerate ranges are widened so axes stay valid.
fn pad_value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < 1e-9 {
        lo -= 0.5;
        hi += 0.5;
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn chart_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::new(2, format!("Failed to render chart: {e}"))
}
