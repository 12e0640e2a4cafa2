//! Grouped aggregation of enriched sales lines.

use crate::error::{ReportError, Result};
use crate::schema::{AggregateKey, EnrichedSalesLine, ReportRow};
use log::debug;
use std::collections::BTreeMap;

#[derive(Default)]
struct GroupTotals {
    quantity: i64,
    profit: f64,
}

/// Rounds a profit sum to exactly two decimal places.
///
/// Rounding rule: half away from zero (`f64::round` of the cent value),
/// which is round-half-up for non-negative sums. Applied once per group
/// after summation, never per row.
pub fn round_profit(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn describe_key(key: &AggregateKey) -> String {
    format!(
        "group (year={}, month={}, category='{}', sub_category='{}')",
        key.year.map_or("null".to_string(), |y| y.to_string()),
        key.month.map_or("null".to_string(), |m| m.to_string()),
        key.category,
        key.sub_category
    )
}

fn quantity_as_integer(quantity: f64, key: &AggregateKey, order_id: &str) -> Result<i64> {
    if !quantity.is_finite() {
        return Err(ReportError::InvalidData {
            context: describe_key(key),
            details: format!("order '{}' has non-finite quantity {}", order_id, quantity),
        });
    }
    if quantity.fract() != 0.0 || quantity < i64::MIN as f64 || quantity >= i64::MAX as f64 {
        return Err(ReportError::InvalidData {
            context: describe_key(key),
            details: format!(
                "order '{}' has non-integral or out-of-range quantity {}",
                order_id, quantity
            ),
        });
    }
    Ok(quantity as i64)
}

/// Groups rows by `(year, month, category, sub_category)` and computes the
/// per-group quantity and profit totals.
///
/// Absent year/month form their own group bucket; every input row lands in
/// exactly one group. Quantities must be finite, integral and sum within
/// `i64`; profits must be finite. A violation aborts the run with the group
/// key and the offending order named. Output order is the key order of the
/// underlying map, but callers must treat it as unspecified; deterministic
/// ordering is the emitter's contract.
pub fn aggregate(rows: Vec<EnrichedSalesLine>) -> Result<Vec<ReportRow>> {
    let input_count = rows.len();
    let mut groups: BTreeMap<AggregateKey, GroupTotals> = BTreeMap::new();

    for row in rows {
        let key = AggregateKey {
            year: row.year,
            month: row.month,
            category: row.line.category.clone(),
            sub_category: row.line.sub_category.clone(),
        };

        let quantity = quantity_as_integer(row.line.quantity, &key, &row.line.order_id)?;

        if !row.line.profit.is_finite() {
            return Err(ReportError::InvalidData {
                context: describe_key(&key),
                details: format!(
                    "order '{}' has non-finite profit {}",
                    row.line.order_id, row.line.profit
                ),
            });
        }

        let totals = groups.entry(key.clone()).or_default();
        totals.quantity =
            totals
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| ReportError::InvalidData {
                    context: describe_key(&key),
                    details: format!(
                        "quantity total overflowed i64 adding order '{}'",
                        row.line.order_id
                    ),
                })?;
        totals.profit += row.line.profit;
    }

    debug!("Aggregated {} rows into {} groups", input_count, groups.len());

    Ok(groups
        .into_iter()
        .map(|(key, totals)| ReportRow {
            key,
            total_quantity: totals.quantity,
            total_profit: round_profit(totals.profit),
        })
        .collect())
}
