//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use crate::analysis::ROW_LIMIT_CHOICES;
use crate::domain::{
    Category, DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_ROW_COUNT, DEFAULT_SEED, MAX_ROW_COUNT,
    Product, Region, Selector, SortDirection,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dash", version, about = "Sales analytics dashboard over a synthetic transaction year")]
pub struct Cli {
    /// Logging verbosity: off, error, warn, info, debug, trace.
    ///
    /// Overridden by RUST_LOG when set.
    #[arg(long, global = true, default_value_t = LevelFilter::WARN)]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the full dashboard: KPIs, trends, regional, product and category views.
    Report(ReportArgs),
    /// Print the sorted transaction grid.
    Table(TableArgs),
    /// Write the filtered transactions to a CSV file.
    Export(ExportArgs),
}

/// Options shared by every subcommand: where the data comes from and how it is filtered.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Random seed for sample generation.
    #[arg(long, env = "SALES_DASH_SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of synthetic transactions to generate (1 to 1,000,000).
    #[arg(
        short = 'n',
        long,
        env = "SALES_DASH_ROWS",
        default_value_t = DEFAULT_ROW_COUNT,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=MAX_ROW_COUNT as u64)
    )]
    pub rows: usize,

    /// Last day of the generated year (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// Analyse a previous CSV export instead of generating data.
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// First day to include (YYYY-MM-DD). Defaults to the earliest transaction.
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD). Defaults to the latest transaction.
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Region name, or `All`.
    #[arg(long, default_value = "All")]
    pub region: Selector<Region>,

    /// Category name, or `All`.
    #[arg(long, default_value = "All")]
    pub category: Selector<Category>,

    /// Product name, or `All`.
    #[arg(long, default_value = "All")]
    pub product: Selector<Product>,
}

/// Options for the transaction grid.
#[derive(Debug, Args, Clone)]
pub struct GridArgs {
    /// Column to sort by (Date, Product, Category, Region, Quantity, Price, Revenue, Month, Year).
    #[arg(long, default_value = "Date")]
    pub sort_by: String,

    /// Sort direction.
    #[arg(long, value_enum, default_value_t = SortDirection::Descending)]
    pub order: SortDirection,

    /// Rows to display: 10, 25, 50, 100 or 500.
    #[arg(long, default_value_t = ROW_LIMIT_CHOICES[0], value_parser = parse_row_limit)]
    pub limit: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub grid: GridArgs,

    /// Print the dashboard as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = DEFAULT_CHART_WIDTH)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = DEFAULT_CHART_HEIGHT)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct TableArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub grid: GridArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output file. Defaults to `sales_data_YYYYMMDD.csv` in the current directory.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: Option<PathBuf>,
}

fn parse_row_limit(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{e}"))?;
    if ROW_LIMIT_CHOICES.contains(&n) {
        Ok(n)
    } else {
        Err(format!("expected one of {ROW_LIMIT_CHOICES:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_filters() {
        let cli = Cli::try_parse_from([
            "dash",
            "report",
            "--region",
            "South America",
            "--product",
            "laptop",
            "--start",
            "2025-01-01",
        ])
        .unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.data.region, Selector::Only(Region::SouthAmerica));
        assert_eq!(args.data.product, Selector::Only(Product::Laptop));
        assert_eq!(args.data.category, Selector::All);
        assert_eq!(args.data.start, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(args.grid.order, SortDirection::Descending);
    }

    #[test]
    fn row_limit_must_be_a_grid_choice() {
        let cli = Cli::try_parse_from(["dash", "table", "--limit", "500"]).unwrap();
        let Command::Table(args) = cli.command else {
            panic!("expected table");
        };
        assert_eq!(args.grid.limit, 500);
        assert!(Cli::try_parse_from(["dash", "table", "--limit", "7"]).is_err());
    }

    #[test]
    fn row_count_is_bounded() {
        assert!(Cli::try_parse_from(["dash", "report", "--rows", "0"]).is_err());
        assert!(Cli::try_parse_from(["dash", "report", "--rows", "1000001"]).is_err());
        let cli = Cli::try_parse_from(["dash", "report", "--rows", "1000000"]).unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.data.rows, MAX_ROW_COUNT);
        assert_eq!((args.width, args.height), (DEFAULT_CHART_WIDTH, DEFAULT_CHART_HEIGHT));
    }

    #[test]
    fn rejects_unknown_region() {
        assert!(Cli::try_parse_from(["dash", "table", "--region", "Atlantis"]).is_err());
    }
}
