//! Delimited-text ingestion for the two report inputs.
//!
//! Both sources must carry a header row. Headers are validated against the
//! explicit schema declarations in [`crate::schema`] before any data row is
//! read; a missing required column aborts the run with an ingestion error
//! naming the source and column. Columns not named by the schema are ignored,
//! so full spreadsheet exports with dozens of extra columns ingest cleanly.

use crate::error::{ReportError, Result};
use crate::schema::{
    ReturnRecord, SalesLine, SourceSchema, COL_CATEGORY, COL_ORDER_DATE, COL_ORDER_ID, COL_PROFIT,
    COL_QUANTITY, COL_SUB_CATEGORY, RETURNS_SCHEMA, SALES_SCHEMA,
};
use csv::StringRecord;
use log::info;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Maps declared column names to their positions in the actual header row.
struct ColumnIndex {
    source_name: String,
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn resolve(schema: &SourceSchema, headers: &StringRecord, source_name: &str) -> Result<Self> {
        let mut positions = HashMap::new();
        for column in schema.required_columns {
            let position = headers
                .iter()
                .position(|h| h.trim() == *column)
                .ok_or_else(|| ReportError::Ingestion {
                    source_name: source_name.to_string(),
                    details: format!(
                        "missing required column '{}' (schema '{}' v{})",
                        column, schema.name, schema.version
                    ),
                })?;
            positions.insert(*column, position);
        }
        Ok(Self {
            source_name: source_name.to_string(),
            positions,
        })
    }

    fn text(&self, record: &StringRecord, column: &'static str, row: usize) -> Result<String> {
        let position = self.positions[column];
        record
            .get(position)
            .map(|v| v.trim().to_string())
            .ok_or_else(|| ReportError::Ingestion {
                source_name: self.source_name.clone(),
                details: format!("row {}: missing value for column '{}'", row, column),
            })
    }

    fn number(&self, record: &StringRecord, column: &'static str, row: usize) -> Result<f64> {
        let raw = self.text(record, column, row)?;
        raw.parse::<f64>().map_err(|_| ReportError::Ingestion {
            source_name: self.source_name.clone(),
            details: format!(
                "row {}: column '{}' has non-numeric value '{}'",
                row, column, raw
            ),
        })
    }
}

/// Reads sales lines from any delimited-text reader.
pub fn read_sales_from<R: Read>(reader: R, source_name: &str) -> Result<Vec<SalesLine>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| ReportError::Ingestion {
            source_name: source_name.to_string(),
            details: format!("unreadable header row: {}", e),
        })?
        .clone();
    let index = ColumnIndex::resolve(&SALES_SCHEMA, &headers, source_name)?;

    let mut lines = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        // Header is line 1, so the first data row is line 2.
        let row = i + 2;
        let record = result.map_err(|e| ReportError::Ingestion {
            source_name: source_name.to_string(),
            details: format!("row {}: {}", row, e),
        })?;

        lines.push(SalesLine {
            order_id: index.text(&record, COL_ORDER_ID, row)?,
            order_date: index.text(&record, COL_ORDER_DATE, row)?,
            category: index.text(&record, COL_CATEGORY, row)?,
            sub_category: index.text(&record, COL_SUB_CATEGORY, row)?,
            quantity: index.number(&record, COL_QUANTITY, row)?,
            profit: index.number(&record, COL_PROFIT, row)?,
        });
    }

    info!("Ingested {} sales lines from {}", lines.len(), source_name);
    Ok(lines)
}

/// Reads return records from any delimited-text reader.
pub fn read_returns_from<R: Read>(reader: R, source_name: &str) -> Result<Vec<ReturnRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| ReportError::Ingestion {
            source_name: source_name.to_string(),
            details: format!("unreadable header row: {}", e),
        })?
        .clone();
    let index = ColumnIndex::resolve(&RETURNS_SCHEMA, &headers, source_name)?;

    let mut records = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let row = i + 2;
        let record = result.map_err(|e| ReportError::Ingestion {
            source_name: source_name.to_string(),
            details: format!("row {}: {}", row, e),
        })?;

        records.push(ReturnRecord {
            order_id: index.text(&record, COL_ORDER_ID, row)?,
        });
    }

    info!(
        "Ingested {} return records from {}",
        records.len(),
        source_name
    );
    Ok(records)
}

/// Reads sales lines from a file path.
pub fn read_sales<P: AsRef<Path>>(path: P) -> Result<Vec<SalesLine>> {
    let source_name = path.as_ref().display().to_string();
    let file = std::fs::File::open(path.as_ref()).map_err(|e| ReportError::Ingestion {
        source_name: source_name.clone(),
        details: format!("cannot open source: {}", e),
    })?;
    read_sales_from(file, &source_name)
}

/// Reads return records from a file path.
pub fn read_returns<P: AsRef<Path>>(path: P) -> Result<Vec<ReturnRecord>> {
    let source_name = path.as_ref().display().to_string();
    let file = std::fs::File::open(path.as_ref()).map_err(|e| ReportError::Ingestion {
        source_name: source_name.clone(),
        details: format!("cannot open source: {}", e),
    })?;
    read_returns_from(file, &source_name)
}
