//! # Sales Report Builder
//!
//! A library for computing periodic sales-performance reports from two
//! tabular inputs: order-line sales records and order return records.
//!
//! ## Pipeline
//!
//! - **Exclusion Filter**: drops sales rows whose order id appears in the
//!   return set (anti-join on `Order ID`)
//! - **Date Enrichment**: parses `M/d/yyyy` order dates into year and month;
//!   malformed dates propagate as absent fields instead of failing the run
//! - **Aggregator**: groups by `(year, month, category, sub_category)` and
//!   sums quantity (integer-preserving) and profit (rounded to 2 decimals)
//! - **Report Emitter**: sorts rows nulls-first ascending and writes them to
//!   a partitioned sink, one partition per `(year, month)`
//!
//! The pipeline is a pure function of `(sales, returns, config)`; there is no
//! process-wide mutable state.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sales_report_builder::*;
//!
//! let sales = read_sales("sales.csv")?;
//! let returns = read_returns("returns.csv")?;
//! let mut rows = build_sales_report(sales, returns, &ReportConfig::default())?;
//!
//! let mut sink = CsvPartitionSink::new("report_out");
//! emit(&mut rows, &mut sink)?;
//! ```

pub mod aggregate;
pub mod emit;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod ingestion;
pub mod schema;

pub use aggregate::{aggregate, round_profit};
pub use emit::{emit, preview, sort_report_rows, CsvPartitionSink, PartitionedTableSink};
pub use enrich::{enrich, parse_order_date};
pub use error::{ReportError, Result};
pub use filter::filter_valid_sales;
pub use ingestion::{read_returns, read_returns_from, read_sales, read_sales_from};
pub use schema::*;

use log::{debug, info, LevelFilter};
use rayon::prelude::*;

/// Run-level configuration. Replaces the process-wide session state a
/// distributed engine would carry: which date formats the enrichment stage
/// accepts and how verbose the run is.
#[derive(Debug, Clone, Copy)]
pub struct ReportConfig {
    /// Accept two-digit years (`M/d/yy`) in addition to `M/d/yyyy`.
    pub legacy_date_parsing: bool,
    pub log_level: LevelFilter,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            legacy_date_parsing: false,
            log_level: LevelFilter::Info,
        }
    }
}

pub struct ReportPipeline;

impl ReportPipeline {
    /// Runs filter, enrichment and aggregation over the two inputs.
    ///
    /// The filter and enrichment stages are per-row and stateless; enrichment
    /// runs data-parallel with an order-preserving collect, so per-group
    /// summation order is identical across runs. Emission is the caller's
    /// step, via [`emit`].
    pub fn run(
        sales: Vec<SalesLine>,
        returns: Vec<ReturnRecord>,
        config: &ReportConfig,
    ) -> Result<Vec<ReportRow>> {
        info!(
            "Building sales report from {} sales lines and {} return records",
            sales.len(),
            returns.len()
        );

        let valid = filter_valid_sales(sales, &returns);
        debug!("{} sales lines survived the return filter", valid.len());

        let enriched: Vec<EnrichedSalesLine> = valid
            .into_par_iter()
            .map(|line| enrich(line, config))
            .collect();

        let rows = aggregate(enriched)?;
        info!("Report contains {} aggregated rows", rows.len());
        Ok(rows)
    }
}

/// Convenience wrapper over [`ReportPipeline::run`].
pub fn build_sales_report(
    sales: Vec<SalesLine>,
    returns: Vec<ReturnRecord>,
    config: &ReportConfig,
) -> Result<Vec<ReportRow>> {
    ReportPipeline::run(sales, returns, config)
}
