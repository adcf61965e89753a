//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - derives the trailing query window
//! - runs the demo-KPI, price, and join stages
//! - prints summaries and writes exports
//!
//! The three stages are guarded independently: a failure in one is reported
//! on stderr and the remaining stages still run, so a flaky upstream never
//! hides the results that were available.

use chrono::Local;
use clap::Parser;

use crate::cli::{Command, RunArgs};
use crate::data::{EdsClient, compute_window};
use crate::domain::{CanonicalSeries, PipelineConfig, TimeWindow};
use crate::error::AppError;
use crate::report;
use crate::series::Normalized;

pub mod pipeline;

/// Entry point for the `elspot` binary.
pub fn run() -> Result<(), AppError> {
    // We want `elspot` and `elspot -a DK2` to behave like `elspot run ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(&pipeline_config_from_args(&args)),
        Command::Prices(args) => handle_prices(&pipeline_config_from_args(&args)),
        Command::Kpi(args) => handle_kpi(&pipeline_config_from_args(&args)),
    }
}

fn handle_run(config: &PipelineConfig) -> Result<(), AppError> {
    let window = compute_window(config.span_days, config.lag_days, Local::now().naive_local());
    print!("{}", report::format_run_header(config, &window));

    // Stage 1: demo KPIs (no network).
    run_demo_stage(config);

    let client = match EdsClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("[prices] {e}");
            println!("[join] skipped: no HTTP client.");
            return Ok(());
        }
    };

    // Stage 2: spot prices.
    let prices = run_price_stage(&client, config, &window);

    // Stage 3: consumption fetch + join, only meaningful with a price series.
    match prices {
        Some(series) => run_join_stage(&client, config, &window, &series),
        None => println!("[join] skipped: no price series."),
    }

    Ok(())
}

fn handle_prices(config: &PipelineConfig) -> Result<(), AppError> {
    let window = compute_window(config.span_days, config.lag_days, Local::now().naive_local());
    print!("{}", report::format_run_header(config, &window));

    let client = EdsClient::from_env()?;
    let _ = run_price_stage(&client, config, &window);
    Ok(())
}

fn handle_kpi(config: &PipelineConfig) -> Result<(), AppError> {
    let stage = pipeline::run_demo(config)?;
    if stage.rows_dropped > 0 {
        eprintln!("[demo] dropped {} bad row(s) from the raw table.", stage.rows_dropped);
    }
    println!("{}", report::format_demo_kpis(&stage.kpis));
    Ok(())
}

fn run_demo_stage(config: &PipelineConfig) {
    match pipeline::run_demo(config) {
        Ok(stage) => {
            if stage.rows_dropped > 0 {
                eprintln!(
                    "[demo] dropped {} bad row(s) from the raw table.",
                    stage.rows_dropped
                );
            }
            println!("{}", report::format_demo_kpis(&stage.kpis));
        }
        Err(e) => eprintln!("[demo] {e}"),
    }
}

fn run_price_stage(
    client: &EdsClient,
    config: &PipelineConfig,
    window: &TimeWindow,
) -> Option<CanonicalSeries> {
    let stage = match pipeline::run_prices(client, config, window) {
        Ok(stage) => stage,
        Err(e) => {
            eprintln!("[prices] {e}");
            return None;
        }
    };

    if let Some(line) = report::format_series_diagnostic("prices", &stage.outcome) {
        println!("{line}");
        return None;
    }
    let series = stage.outcome.into_series()?;
    if series.is_empty() {
        println!("[prices] no usable rows after normalization.");
        return None;
    }
    if let Some(stats) = &stage.stats {
        println!("{}", report::format_price_summary(stats));
    }
    Some(series)
}

fn run_join_stage(
    client: &EdsClient,
    config: &PipelineConfig,
    window: &TimeWindow,
    prices: &CanonicalSeries,
) {
    let stage = match pipeline::run_join(client, config, window, prices) {
        Ok(stage) => stage,
        Err(e) => {
            eprintln!("[join] {e}");
            return;
        }
    };

    if let Some(line) = report::format_series_diagnostic("consumption", &stage.consumption) {
        println!("{line}");
        println!("[join] skipped: consumption unavailable.");
        return;
    }
    if let Normalized::Series(series) = &stage.consumption {
        if series.is_empty() {
            println!("[consumption] no usable rows after normalization.");
            return;
        }
    }

    match &stage.stats {
        Some(stats) => println!("{}", report::format_join_summary(stats)),
        None => println!("[join] no overlapping hours between prices and consumption."),
    }
}

pub fn pipeline_config_from_args(args: &RunArgs) -> PipelineConfig {
    PipelineConfig {
        span_days: args.days,
        lag_days: args.lag_days,
        area: args.area,
        out_dir: args.out_dir.clone(),
        report_dir: args.report_dir.clone(),
        raw_csv: args
            .raw
            .clone()
            .unwrap_or_else(|| args.out_dir.join("raw.csv")),
        chart: !args.no_chart,
    }
}

/// Rewrite argv so `elspot` defaults to `elspot run`.
///
/// Rules:
/// - `elspot`                  -> `elspot run`
/// - `elspot -a DK2 ...`       -> `elspot run -a DK2 ...`
/// - `elspot --help/--version` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "prices" | "kpi");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_run() {
        assert_eq!(rewrite_args(argv(&["elspot"])), argv(&["elspot", "run"]));
        assert_eq!(
            rewrite_args(argv(&["elspot", "-a", "DK2"])),
            argv(&["elspot", "run", "-a", "DK2"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["elspot", "kpi"])),
            argv(&["elspot", "kpi"])
        );
        assert_eq!(
            rewrite_args(argv(&["elspot", "--help"])),
            argv(&["elspot", "--help"])
        );
    }

    #[test]
    fn raw_path_defaults_under_out_dir() {
        let cli = crate::cli::Cli::parse_from(["elspot", "run", "--out-dir", "artifacts"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        let config = pipeline_config_from_args(&args);
        assert_eq!(config.raw_csv, std::path::PathBuf::from("artifacts/raw.csv"));
        assert!(config.chart);
    }
}
