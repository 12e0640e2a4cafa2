//! Calendar enrichment of sales lines.
//!
//! Order dates arrive as raw `M/d/yyyy` strings (non-zero-padded, the common
//! North-American spreadsheet export). Parsing is tolerant: a malformed date
//! never fails the run; the row keeps flowing with absent calendar fields and
//! aggregates under the null-keyed group.

use crate::schema::{EnrichedSalesLine, SalesLine};
use crate::ReportConfig;
use chrono::{Datelike, NaiveDate};
use log::debug;

/// Parses an order date string, deriving year and month.
///
/// Strict mode accepts only `M/d/yyyy` with a 4-digit year. With
/// `legacy_date_parsing` enabled, 2-digit years are also accepted and
/// pivoted the way lenient legacy parsers do (00-68 maps to 20xx, 69-99 to
/// 19xx).
pub fn parse_order_date(raw: &str, config: &ReportConfig) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y").ok()?;

    if date.year() >= 1000 {
        return Some(date);
    }

    if config.legacy_date_parsing && date.year() < 100 {
        let pivoted = if date.year() <= 68 {
            date.year() + 2000
        } else {
            date.year() + 1900
        };
        return NaiveDate::from_ymd_opt(pivoted, date.month(), date.day());
    }

    None
}

/// Derives the calendar fields for one sales line.
pub fn enrich(line: SalesLine, config: &ReportConfig) -> EnrichedSalesLine {
    let parsed = parse_order_date(&line.order_date, config);

    if parsed.is_none() {
        debug!(
            "Unparseable order date '{}' on order {}; row keeps flowing with absent calendar fields",
            line.order_date, line.order_id
        );
    }

    EnrichedSalesLine {
        year: parsed.map(|d| d.year()),
        month: parsed.map(|d| d.month()),
        order_date_parsed: parsed,
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_with_date(date: &str) -> SalesLine {
        SalesLine {
            order_id: "A1".to_string(),
            order_date: date.to_string(),
            category: "Technology".to_string(),
            sub_category: "Phones".to_string(),
            quantity: 2.0,
            profit: 15.5,
        }
    }

    #[test]
    fn test_parses_non_padded_dates() {
        let enriched = enrich(line_with_date("3/7/2015"), &ReportConfig::default());
        assert_eq!(
            enriched.order_date_parsed,
            NaiveDate::from_ymd_opt(2015, 3, 7)
        );
        assert_eq!(enriched.year, Some(2015));
        assert_eq!(enriched.month, Some(3));
    }

    #[test]
    fn test_parses_padded_dates() {
        let enriched = enrich(line_with_date("12/31/2014"), &ReportConfig::default());
        assert_eq!(enriched.year, Some(2014));
        assert_eq!(enriched.month, Some(12));
    }

    #[test]
    fn test_invalid_month_and_day_yield_absent_fields() {
        let enriched = enrich(line_with_date("13/40/2020"), &ReportConfig::default());
        assert_eq!(enriched.order_date_parsed, None);
        assert_eq!(enriched.year, None);
        assert_eq!(enriched.month, None);
        // The row itself survives untouched.
        assert_eq!(enriched.line.order_id, "A1");
    }

    #[test]
    fn test_wrong_separator_yields_absent_fields() {
        let enriched = enrich(line_with_date("2015-03-07"), &ReportConfig::default());
        assert_eq!(enriched.year, None);
        assert_eq!(enriched.month, None);
    }

    #[test]
    fn test_two_digit_year_rejected_in_strict_mode() {
        let enriched = enrich(line_with_date("3/7/15"), &ReportConfig::default());
        assert_eq!(enriched.year, None);
    }

    #[test]
    fn test_two_digit_year_pivots_in_legacy_mode() {
        let config = ReportConfig {
            legacy_date_parsing: true,
            ..ReportConfig::default()
        };

        let enriched = enrich(line_with_date("3/7/15"), &config);
        assert_eq!(enriched.year, Some(2015));
        assert_eq!(enriched.month, Some(3));

        let enriched = enrich(line_with_date("3/7/99"), &config);
        assert_eq!(enriched.year, Some(1999));
    }

    #[test]
    fn test_empty_date_yields_absent_fields() {
        let enriched = enrich(line_with_date(""), &ReportConfig::default());
        assert_eq!(enriched.order_date_parsed, None);
    }
}
