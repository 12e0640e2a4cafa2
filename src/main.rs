use clap::Parser;
use log::LevelFilter;
use sales_report_builder::{
    build_sales_report, emit, preview, read_returns, read_sales, CsvPartitionSink, ReportConfig,
    Result,
};
use std::path::PathBuf;
use std::process::ExitCode;

const PREVIEW_ROWS: usize = 20;

/// Builds a periodic sales-performance report: excludes returned orders,
/// derives year and month from order dates, aggregates net quantity and
/// profit by period and product category, and writes a partitioned report.
#[derive(Parser, Debug)]
#[command(name = "sales-report", version)]
struct Cli {
    /// Delimited sales source (requires Order ID, Order Date, Category,
    /// Sub-Category, Quantity, Profit columns)
    sales: PathBuf,

    /// Delimited returns source (requires an Order ID column)
    returns: PathBuf,

    /// Output directory for the partitioned report (overwritten if present)
    output: PathBuf,

    /// Also accept two-digit years in order dates
    #[arg(long)]
    legacy_dates: bool,

    /// Log verbosity (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn run(cli: Cli) -> Result<()> {
    let config = ReportConfig {
        legacy_date_parsing: cli.legacy_dates,
        log_level: cli.log_level,
    };

    let sales = read_sales(&cli.sales)?;
    let returns = read_returns(&cli.returns)?;

    let mut rows = build_sales_report(sales, returns, &config)?;

    println!("Sample output:");
    print!("{}", preview(&rows, PREVIEW_ROWS));

    let mut sink = CsvPartitionSink::new(&cli.output);
    emit(&mut rows, &mut sink)?;

    println!("Report generated successfully -> {}", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sales-report: {}", e);
            ExitCode::FAILURE
        }
    }
}
