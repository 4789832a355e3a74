//! Top-level application flow behind `dash`: `.env` defaults, CLI parsing,
//! logging setup, then one handler per subcommand.

use clap::Parser;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::cli::{Command, DataArgs, ExportArgs, GridArgs, ReportArgs, TableArgs};
use crate::domain::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DashConfig, SortColumn, SortDirection};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `dash` binary.
pub fn run() -> Result<(), AppError> {
    // Environment defaults (SALES_DASH_SEED, RUST_LOG, ...) may live in `.env`.
    dotenvy::dotenv().ok();

    let cli = crate::cli::Cli::parse();
    init_logger(cli.log_level);
    trace!("{cli:?}");

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Table(args) => handle_table(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let mut config = dash_config_from_args(&args.data, Some(&args.grid))?;
    config.chart_width = args.width;
    config.chart_height = args.height;

    let dashboard = build(&config)?;

    if args.json {
        let json = serde_json::to_string_pretty(&dashboard)
            .map_err(|e| AppError::new(4, format!("Failed to serialize dashboard: {e}")))?;
        println!("{json}");
    } else {
        print!(
            "{}",
            crate::report::format_dashboard(&dashboard, config.chart_width, config.chart_height)
        );
    }
    Ok(())
}

fn handle_table(args: TableArgs) -> Result<(), AppError> {
    let config = dash_config_from_args(&args.data, Some(&args.grid))?;
    let dashboard = build(&config)?;

    print!("{}", crate::report::format_criteria(&dashboard.criteria));
    print!("{}", crate::report::format_grid(&dashboard.grid.rows));
    println!(
        "({} of {} matching transactions)",
        dashboard.grid.rows.len(),
        dashboard.filtered.len()
    );
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = dash_config_from_args(&args.data, None)?;
    let dashboard = build(&config)?;

    let path = args.out.unwrap_or_else(|| {
        crate::io::export_file_name(chrono::Local::now().date_naive()).into()
    });
    crate::io::export_table_csv(&path, &dashboard.filtered)?;
    println!("Wrote {} transactions to {}", dashboard.filtered.len(), path.display());
    Ok(())
}

fn build(config: &DashConfig) -> Result<pipeline::Dashboard, AppError> {
    let mut cache = pipeline::cache_for(config);
    let source = pipeline::load_table(config, &mut cache)?;
    debug!(rows = source.len(), "source table ready");
    Ok(pipeline::build_dashboard(&source, config)?)
}

/// Build the run configuration. The sort column is validated here, before
/// any data is generated.
pub fn dash_config_from_args(data: &DataArgs, grid: Option<&GridArgs>) -> Result<DashConfig, AppError> {
    let (sort_column, sort_direction, limit) = match grid {
        Some(g) => (g.sort_by.parse::<SortColumn>()?, g.order, g.limit),
        None => (SortColumn::Date, SortDirection::Descending, 0),
    };

    Ok(DashConfig {
        seed: data.seed,
        row_count: data.rows,
        as_of: data.as_of.unwrap_or_else(|| chrono::Local::now().date_naive()),
        input: data.input.clone(),
        start: data.start,
        end: data.end,
        region: data.region,
        category: data.category,
        product: data.product,
        sort_column,
        sort_direction,
        limit,
        chart_width: DEFAULT_CHART_WIDTH,
        chart_height: DEFAULT_CHART_HEIGHT,
    })
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG exists; use it.
        Some(_) => EnvFilter::from_default_env(),
        // Otherwise apply the CLI level to this crate only.
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
