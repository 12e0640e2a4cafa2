use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column names for the sales source.
pub const COL_ORDER_ID: &str = "Order ID";
pub const COL_ORDER_DATE: &str = "Order Date";
pub const COL_CATEGORY: &str = "Category";
pub const COL_SUB_CATEGORY: &str = "Sub-Category";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_PROFIT: &str = "Profit";

/// An explicit, versioned declaration of the columns a tabular source must
/// provide. Ingestion validates the header row against this before reading
/// any data; there is no schema inference.
#[derive(Debug, Clone)]
pub struct SourceSchema {
    pub name: &'static str,
    pub version: u32,
    pub required_columns: &'static [&'static str],
}

pub const SALES_SCHEMA: SourceSchema = SourceSchema {
    name: "sales",
    version: 1,
    required_columns: &[
        COL_ORDER_ID,
        COL_ORDER_DATE,
        COL_CATEGORY,
        COL_SUB_CATEGORY,
        COL_QUANTITY,
        COL_PROFIT,
    ],
};

pub const RETURNS_SCHEMA: SourceSchema = SourceSchema {
    name: "returns",
    version: 1,
    required_columns: &[COL_ORDER_ID],
};

/// One order line as ingested from the sales source. `order_date` is kept as
/// the raw locale-formatted string; parsing happens in the enrichment stage.
/// Columns beyond these six are dropped at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesLine {
    pub order_id: String,
    pub order_date: String,
    pub category: String,
    pub sub_category: String,
    pub quantity: f64,
    pub profit: f64,
}

/// One record from the returns source. Used only as a membership set keyed
/// on `order_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub order_id: String,
}

/// A sales line after date enrichment.
///
/// Invariant: `order_date_parsed`, `year` and `month` are all `Some` after a
/// successful parse and all `None` after a failed one. Rows with a failed
/// parse still flow downstream and aggregate under the null-keyed group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSalesLine {
    pub line: SalesLine,
    pub order_date_parsed: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Composite grouping key for one report row. Absent year/month are valid
/// key values that compare equal only to absent. The derived `Ord` sorts
/// `None` before any `Some`, which is exactly the nulls-first report order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AggregateKey {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category: String,
    pub sub_category: String,
}

/// One aggregated output row. `total_profit` is already rounded to two
/// decimal places when the row is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub key: AggregateKey,
    pub total_quantity: i64,
    pub total_profit: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_key_nulls_sort_first() {
        let null_key = AggregateKey {
            year: None,
            month: None,
            category: "Tech".to_string(),
            sub_category: "Phones".to_string(),
        };
        let dated_key = AggregateKey {
            year: Some(2014),
            month: Some(1),
            category: "Furniture".to_string(),
            sub_category: "Chairs".to_string(),
        };
        assert!(null_key < dated_key);

        let null_month = AggregateKey {
            year: Some(2014),
            month: None,
            category: "Tech".to_string(),
            sub_category: "Phones".to_string(),
        };
        assert!(null_month < dated_key);
    }

    #[test]
    fn test_serialization_round_trip() {
        let row = ReportRow {
            key: AggregateKey {
                year: Some(2015),
                month: Some(3),
                category: "Technology".to_string(),
                sub_category: "Phones".to_string(),
            },
            total_quantity: 2,
            total_profit: 15.5,
        };

        let json = serde_json::to_string(&row).unwrap();
        let deserialized: ReportRow = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, row);
    }
}
