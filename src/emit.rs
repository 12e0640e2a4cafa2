//! Deterministic report emission.
//!
//! The emitter owns the ordering contract: rows are sorted ascending by
//! `(year, month, category, sub_category)` with absent year/month before all
//! present values, then handed to a [`PartitionedTableSink`] exactly once.
//! The sink trait is the seam behind which the physical encoding lives; the
//! crate ships a delimited-text implementation laid out in Hive-style
//! `Year=<y>/Month=<m>` partition directories.

use crate::error::{ReportError, Result};
use crate::schema::ReportRow;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name component used for rows whose year or month is absent.
pub const NULL_PARTITION: &str = "__NULL__";

/// Destination for the finished report. One call per run; the sink replaces
/// any prior output at its destination (overwrite semantics).
pub trait PartitionedTableSink {
    fn write(&mut self, rows: &[ReportRow]) -> Result<()>;
}

/// Sorts report rows into the published output order: ascending
/// `(year, month, category, sub_category)`, nulls first.
pub fn sort_report_rows(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| a.key.cmp(&b.key));
}

/// Sorts `rows` deterministically and writes them to `sink`.
pub fn emit(rows: &mut Vec<ReportRow>, sink: &mut dyn PartitionedTableSink) -> Result<()> {
    sort_report_rows(rows);
    sink.write(rows)?;
    info!("Emitted {} report rows", rows.len());
    Ok(())
}

fn partition_component(name: &str, value: Option<String>) -> String {
    match value {
        Some(v) => format!("{}={}", name, v),
        None => format!("{}={}", name, NULL_PARTITION),
    }
}

fn format_profit(profit: f64) -> String {
    format!("{:.2}", profit)
}

/// Writes the report as one CSV file per `(year, month)` partition under
/// `<destination>/Year=<y>/Month=<m>/part-00000.csv`.
///
/// The whole report is first written to a `<destination>.staging` directory
/// and published with a single rename, so a failed run leaves any prior
/// destination untouched. Removing a pre-existing destination happens only
/// after staging has fully succeeded; a failure between that removal and the
/// rename is the one non-atomic window, and it surfaces as a `SinkWrite`
/// error rather than a success claim.
pub struct CsvPartitionSink {
    destination: PathBuf,
}

impl CsvPartitionSink {
    pub fn new<P: AsRef<Path>>(destination: P) -> Self {
        Self {
            destination: destination.as_ref().to_path_buf(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    fn sink_error(&self, details: String) -> ReportError {
        ReportError::SinkWrite {
            destination: self.destination.display().to_string(),
            details,
        }
    }

    fn write_partition(&self, dir: &Path, rows: &[&ReportRow]) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| {
            self.sink_error(format!("cannot create partition {}: {}", dir.display(), e))
        })?;

        let file_path = dir.join("part-00000.csv");
        let mut writer = csv::Writer::from_path(&file_path).map_err(|e| {
            self.sink_error(format!("cannot create {}: {}", file_path.display(), e))
        })?;

        writer
            .write_record([
                "Year",
                "Month",
                "Category",
                "Sub-Category",
                "Total_Quantity_Sold",
                "Total_Profit",
            ])
            .map_err(|e| self.sink_error(e.to_string()))?;

        for row in rows {
            writer
                .write_record([
                    row.key
                        .year
                        .map_or(String::new(), |y| y.to_string())
                        .as_str(),
                    row.key
                        .month
                        .map_or(String::new(), |m| m.to_string())
                        .as_str(),
                    row.key.category.as_str(),
                    row.key.sub_category.as_str(),
                    row.total_quantity.to_string().as_str(),
                    format_profit(row.total_profit).as_str(),
                ])
                .map_err(|e| self.sink_error(e.to_string()))?;
        }

        writer.flush().map_err(|e| self.sink_error(e.to_string()))?;
        debug!("Wrote partition {} ({} rows)", dir.display(), rows.len());
        Ok(())
    }
}

impl PartitionedTableSink for CsvPartitionSink {
    fn write(&mut self, rows: &[ReportRow]) -> Result<()> {
        let mut staging_name = self.destination.as_os_str().to_os_string();
        staging_name.push(".staging");
        let staging = PathBuf::from(staging_name);
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| {
                self.sink_error(format!("cannot clear staging directory: {}", e))
            })?;
        }
        fs::create_dir_all(&staging).map_err(|e| {
            self.sink_error(format!("cannot create staging directory: {}", e))
        })?;

        let mut partitions: BTreeMap<(Option<i32>, Option<u32>), Vec<&ReportRow>> =
            BTreeMap::new();
        for row in rows {
            partitions
                .entry((row.key.year, row.key.month))
                .or_default()
                .push(row);
        }

        for ((year, month), partition_rows) in &partitions {
            let dir = staging
                .join(partition_component("Year", year.map(|y| y.to_string())))
                .join(partition_component("Month", month.map(|m| m.to_string())));
            self.write_partition(&dir, partition_rows)?;
        }

        if self.destination.exists() {
            fs::remove_dir_all(&self.destination).map_err(|e| {
                self.sink_error(format!("cannot replace prior destination: {}", e))
            })?;
        }
        fs::rename(&staging, &self.destination)
            .map_err(|e| self.sink_error(format!("cannot publish staging directory: {}", e)))?;

        info!(
            "Published {} partitions to {}",
            partitions.len(),
            self.destination.display()
        );
        Ok(())
    }
}

/// Renders a bounded, aligned preview of the report for console output,
/// mirroring the report's own column names and order.
pub fn preview(rows: &[ReportRow], limit: usize) -> String {
    const HEADERS: [&str; 6] = [
        "Year",
        "Month",
        "Category",
        "Sub-Category",
        "Total_Quantity_Sold",
        "Total_Profit",
    ];

    let shown = &rows[..rows.len().min(limit)];
    let cells: Vec<[String; 6]> = shown
        .iter()
        .map(|row| {
            [
                row.key.year.map_or(String::from("null"), |y| y.to_string()),
                row.key
                    .month
                    .map_or(String::from("null"), |m| m.to_string()),
                row.key.category.clone(),
                row.key.sub_category.clone(),
                row.total_quantity.to_string(),
                format_profit(row.total_profit),
            ]
        })
        .collect();

    let mut widths: [usize; 6] = [0; 6];
    for (i, header) in HEADERS.iter().enumerate() {
        widths[i] = header.len();
    }
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    for (i, header) in HEADERS.iter().enumerate() {
        let _ = write!(out, "| {:<width$} ", header, width = widths[i]);
    }
    out.push_str("|\n");
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            let _ = write!(out, "| {:<width$} ", cell, width = widths[i]);
        }
        out.push_str("|\n");
    }
    if rows.len() > limit {
        let _ = writeln!(out, "... {} more rows", rows.len() - limit);
    }
    out
}
