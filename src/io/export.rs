//! Export pipeline results to flat CSV files.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts: a header row plus one row per observation. Parent directories are
//! created on demand so configured locations work on a fresh checkout.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::Path;

use crate::data::demo::DemoTable;
use crate::domain::{CanonicalSeries, JoinedObservation};
use crate::error::AppError;
use crate::report::HourlyAverage;

const TS_FMT: &str = "%Y-%m-%dT%H:%M:%S";

/// Write a canonical series as `HourDK,<name>`.
pub fn write_series_csv(path: &Path, series: &CanonicalSeries) -> Result<(), AppError> {
    let mut file = create_with_parents(path)?;
    writeln!(file, "HourDK,{}", series.name).map_err(|e| write_err(path, e))?;
    for p in &series.points {
        writeln!(file, "{},{}", p.ts.format(TS_FMT), p.value).map_err(|e| write_err(path, e))?;
    }
    Ok(())
}

/// Write joined observations as `HourDK,price_dkk,consumption_mwh,est_cost_dkk`.
pub fn write_joined_csv(path: &Path, rows: &[JoinedObservation]) -> Result<(), AppError> {
    let mut file = create_with_parents(path)?;
    writeln!(file, "HourDK,price_dkk,consumption_mwh,est_cost_dkk")
        .map_err(|e| write_err(path, e))?;
    for r in rows {
        writeln!(
            file,
            "{},{},{},{}",
            r.ts.format(TS_FMT),
            r.price_dkk,
            r.consumption_mwh,
            r.est_cost_dkk
        )
        .map_err(|e| write_err(path, e))?;
    }
    Ok(())
}

/// Write the cleaned demo table as `date,revenue,users,churn_rate`.
pub fn write_demo_csv(path: &Path, table: &DemoTable) -> Result<(), AppError> {
    let mut file = create_with_parents(path)?;
    writeln!(file, "date,revenue,users,churn_rate").map_err(|e| write_err(path, e))?;
    for row in &table.rows {
        let churn = row
            .churn_rate
            .map(|v| v.to_string())
            .unwrap_or_default();
        writeln!(
            file,
            "{},{:.2},{},{churn}",
            row.date, row.revenue, row.users
        )
        .map_err(|e| write_err(path, e))?;
    }
    Ok(())
}

/// Write hour-of-day averages as `hour,avg_price_dkk,avg_consumption_mwh`.
pub fn write_hourly_summary_csv(path: &Path, rows: &[HourlyAverage]) -> Result<(), AppError> {
    let mut file = create_with_parents(path)?;
    writeln!(file, "hour,avg_price_dkk,avg_consumption_mwh").map_err(|e| write_err(path, e))?;
    for r in rows {
        writeln!(
            file,
            "{},{:.4},{:.4}",
            r.hour, r.avg_price_dkk, r.avg_consumption_mwh
        )
        .map_err(|e| write_err(path, e))?;
    }
    Ok(())
}

fn create_with_parents(path: &Path) -> Result<File, AppError> {
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
    File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))
}

fn write_err(path: &Path, e: std::io::Error) -> AppError {
    AppError::new(2, format!("Failed to write '{}': {e}", path.display()))
}
