//! Command-line parsing for the spot-price KPI pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::PriceArea;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "elspot",
    version,
    about = "Energi Data Service spot price / consumption KPI pipeline"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run all three stages: demo KPIs, price fetch, consumption join.
    Run(RunArgs),
    /// Fetch and summarize spot prices only.
    Prices(RunArgs),
    /// Compute KPIs over the demo revenue/users dataset only (no network).
    Kpi(RunArgs),
}

/// Common options for all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Trailing window span, days.
    #[arg(short = 'd', long, default_value_t = 7, value_parser = clap::value_parser!(i64).range(1..))]
    pub days: i64,

    /// Settlement lag between now and the window end, days.
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(i64).range(1..))]
    pub lag_days: i64,

    /// Price area to filter on.
    #[arg(short = 'a', long, value_enum, default_value_t = PriceArea::Dk1)]
    pub area: PriceArea,

    /// Directory for data artifacts (CSV files).
    #[arg(long, default_value = "data")]
    pub out_dir: PathBuf,

    /// Directory for report artifacts (hourly summary, chart).
    #[arg(long, default_value = "report")]
    pub report_dir: PathBuf,

    /// Raw demo table; the deterministic generator runs when the file is missing.
    ///
    /// Defaults to `<out-dir>/raw.csv`.
    #[arg(long)]
    pub raw: Option<PathBuf>,

    /// Skip rendering the SVG chart.
    #[arg(long)]
    pub no_chart: bool,
}
