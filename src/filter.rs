//! Exclusion of returned orders from the sales stream.

use crate::schema::{ReturnRecord, SalesLine};
use log::debug;
use std::collections::HashSet;

/// Removes every sales line whose order id appears in `returns`
/// (anti-join on `order_id`).
///
/// Survivors keep their original input order, so downstream floating-point
/// summation happens in the same order on every run. An empty returns set
/// leaves the input unchanged; duplicate return ids collapse into one set
/// entry; an empty order id is an ordinary key, not a special case.
pub fn filter_valid_sales(sales: Vec<SalesLine>, returns: &[ReturnRecord]) -> Vec<SalesLine> {
    let returned_ids: HashSet<&str> = returns.iter().map(|r| r.order_id.as_str()).collect();

    let before = sales.len();
    let valid: Vec<SalesLine> = sales
        .into_iter()
        .filter(|line| !returned_ids.contains(line.order_id.as_str()))
        .collect();

    debug!(
        "Excluded {} of {} sales lines as returned ({} distinct return ids)",
        before - valid.len(),
        before,
        returned_ids.len()
    );
    valid
}
