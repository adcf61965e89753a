//! Demo revenue/users dataset.
//!
//! When a raw business table exists on disk we load and clean it; otherwise a
//! fixed deterministic generator supplies one (daily rows over a fixed range,
//! linear revenue/user ramps, constant churn rate). Either way the table feeds
//! the same KPI path.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use csv::StringRecord;

use crate::error::AppError;

const DEMO_START: (i32, u32, u32) = (2024, 1, 1);
const DEMO_END: (i32, u32, u32) = (2025, 8, 31);

/// One cleaned row of the demo table.
#[derive(Debug, Clone)]
pub struct DemoRow {
    pub date: NaiveDate,
    pub revenue: f64,
    pub users: f64,
    pub churn_rate: Option<f64>,
}

/// A row-level error encountered while loading the raw table.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Cleaned demo table plus load diagnostics.
#[derive(Debug, Clone)]
pub struct DemoTable {
    pub rows: Vec<DemoRow>,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

/// Load the raw table at `raw_csv` if it exists, else generate the fixture.
pub fn load_or_generate(raw_csv: &Path) -> Result<DemoTable, AppError> {
    if raw_csv.exists() {
        let file = File::open(raw_csv).map_err(|e| {
            AppError::new(2, format!("Failed to open raw CSV '{}': {e}", raw_csv.display()))
        })?;
        read_raw(file)
    } else {
        generate()
    }
}

/// Build the deterministic fixture table.
pub fn generate() -> Result<DemoTable, AppError> {
    let start = demo_date(DEMO_START)?;
    let end = demo_date(DEMO_END)?;
    let days = (end - start).num_days();

    let mut rows = Vec::with_capacity(days as usize + 1);
    for i in 0..=days {
        rows.push(DemoRow {
            date: start + Duration::days(i),
            revenue: round2(100.0 + i as f64 * 0.35),
            users: (1000.0 + i as f64 * 0.6).floor(),
            churn_rate: Some(0.04),
        });
    }

    Ok(DemoTable {
        rows_read: rows.len(),
        rows,
        row_errors: Vec::new(),
    })
}

/// Read and clean a raw CSV: required `date`, `revenue`, `users` columns,
/// optional `churn_rate`. Rows that fail to parse are dropped and reported
/// as row-level errors, never as a run failure.
pub fn read_raw(reader: impl std::io::Read) -> Result<DemoTable, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read raw CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for required in ["date", "revenue", "users"] {
        if !header_map.contains_key(required) {
            return Err(AppError::new(
                2,
                format!("Raw CSV is missing required column: `{required}`"),
            ));
        }
    }

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.records().enumerate() {
        // +2: records() starts after the header row and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => rows.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    Ok(DemoTable {
        rows,
        rows_read,
        row_errors,
    })
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<DemoRow, String> {
    let date = parse_date(get_required(record, header_map, "date")?)?;
    let revenue = parse_f64(get_required(record, header_map, "revenue")?, "revenue")?;
    let users = parse_f64(get_required(record, header_map, "users")?, "users")?;
    let churn_rate = get_optional(record, header_map, "churn_rate")
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite());

    Ok(DemoRow {
        date,
        revenue,
        users,
        churn_rate,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes carry a BOM on the first header; strip it
    // so schema validation does not report a missing `date` column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    get_optional(record, header_map, name).ok_or_else(|| format!("Missing `{name}` value."))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!("Invalid date '{s}'."))
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{s}'."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite `{name}` value."))
    }
}

fn demo_date((y, m, d): (i32, u32, u32)) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| AppError::new(2, "Invalid demo date range constant."))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
