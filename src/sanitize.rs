//! Row filtering and value coercion.
//!
//! Report files mix county rows with aggregate and footnote rows, and mask
//! suppressed counts with a de-identification marker. This module filters
//! out non-county rows and coerces metric cells to numbers under the
//! configured suppression policy.

use crate::columns::COUNTY_NAME;
use crate::config::SuppressionPolicy;
use crate::constants::{STATEWIDE_MARKER, SUPPRESSION_MARKER};
use crate::models::Table;
use tracing::debug;

/// Drop rows whose county label, after trimming, is empty, matches the
/// statewide aggregate marker case-insensitively, or contains no alphabetic
/// character. Trims the surviving labels in place.
pub fn filter_county_rows(table: &mut Table) {
    let Some(county_idx) = table.column_index(COUNTY_NAME) else {
        return;
    };

    let before = table.rows.len();
    let mask: Vec<bool> = table
        .rows
        .iter_mut()
        .map(|row| {
            let trimmed = row[county_idx].trim().to_string();
            row[county_idx] = trimmed;
            is_county_label(&row[county_idx])
        })
        .collect();
    table.retain_rows(&mask);

    let dropped = before - table.rows.len();
    if dropped > 0 {
        debug!("Dropped {} aggregate/placeholder rows", dropped);
    }
}

/// A usable county label is non-empty, not the statewide aggregate, and
/// contains at least one alphabetic character (guards against stray numeric
/// or footnote rows).
fn is_county_label(label: &str) -> bool {
    !label.is_empty()
        && !label.eq_ignore_ascii_case(STATEWIDE_MARKER)
        && label.chars().any(|c| c.is_alphabetic())
}

/// Coerce one metric cell to a number under the given suppression policy.
///
/// The de-identification marker is stripped before parsing, and thousands
/// separators are removed when the grouping is well formed ("1,234");
/// malformed groupings and other unparseable values become absent, never
/// zero. Under `ZeroFill`, a fully suppressed value becomes zero instead.
pub fn coerce_value(raw: &str, policy: SuppressionPolicy) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if policy == SuppressionPolicy::ZeroFill
        && trimmed.chars().all(|c| c == SUPPRESSION_MARKER)
    {
        return Some(0.0);
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|&c| c != SUPPRESSION_MARKER)
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.contains(',') {
        strip_thousands_separators(cleaned)?.parse().ok()
    } else {
        cleaned.parse().ok()
    }
}

/// Remove separators from a comma-grouped number, requiring groups of
/// exactly three digits after the first ("12,345.6"). Anything else
/// ("1,2", "1,,3") is not a grouped number and stays unparseable.
fn strip_thousands_separators(s: &str) -> Option<String> {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (s, None),
    };
    if frac_part.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    let mut groups = digits.split(',');
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 || !first.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut joined = String::from(sign);
    joined.push_str(first);
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        joined.push_str(group);
    }
    if let Some(frac) = frac_part {
        joined.push('.');
        joined.push_str(frac);
    }
    Some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_counties(counties: &[&str]) -> Table {
        Table::new(
            vec![COUNTY_NAME.to_string(), "Cell 1".to_string()],
            counties
                .iter()
                .map(|c| vec![c.to_string(), "1".to_string()])
                .collect(),
        )
    }

    #[test]
    fn test_statewide_rows_excluded_case_insensitively() {
        let mut table = table_with_counties(&["Alpha", "Statewide", "STATEWIDE", "Beta"]);
        filter_county_rows(&mut table);
        let counties: Vec<&str> = table.column_values(COUNTY_NAME).unwrap();
        assert_eq!(counties, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_non_alphabetic_and_empty_rows_excluded() {
        let mut table = table_with_counties(&["Alpha", "", "  ", "123", "(1)", "Del Norte"]);
        filter_county_rows(&mut table);
        let counties: Vec<&str> = table.column_values(COUNTY_NAME).unwrap();
        assert_eq!(counties, vec!["Alpha", "Del Norte"]);
    }

    #[test]
    fn test_county_labels_trimmed_in_place() {
        let mut table = table_with_counties(&["  Alpha  "]);
        filter_county_rows(&mut table);
        assert_eq!(table.rows[0][0], "Alpha");
    }

    #[test]
    fn test_coerce_plain_and_grouped_numbers() {
        assert_eq!(coerce_value("42", SuppressionPolicy::Strip), Some(42.0));
        assert_eq!(coerce_value("1,234", SuppressionPolicy::Strip), Some(1234.0));
        assert_eq!(
            coerce_value("12,345,678", SuppressionPolicy::Strip),
            Some(12_345_678.0)
        );
        assert_eq!(
            coerce_value("1,234.5", SuppressionPolicy::Strip),
            Some(1234.5)
        );
        assert_eq!(coerce_value(" 7.5 ", SuppressionPolicy::Strip), Some(7.5));
    }

    #[test]
    fn test_coerce_rejects_malformed_groupings() {
        assert_eq!(coerce_value("1,2", SuppressionPolicy::Strip), None);
        assert_eq!(coerce_value("1,,3", SuppressionPolicy::Strip), None);
        assert_eq!(coerce_value("12,34", SuppressionPolicy::Strip), None);
        assert_eq!(coerce_value("1,2345", SuppressionPolicy::Strip), None);
        assert_eq!(coerce_value(",123", SuppressionPolicy::Strip), None);
        assert_eq!(coerce_value("1234,567", SuppressionPolicy::Strip), None);
    }

    #[test]
    fn test_coerce_strips_suppression_marker() {
        assert_eq!(coerce_value("12*", SuppressionPolicy::Strip), Some(12.0));
        assert_eq!(coerce_value("*", SuppressionPolicy::Strip), None);
        assert_eq!(coerce_value("**", SuppressionPolicy::Strip), None);
    }

    #[test]
    fn test_zero_fill_replaces_suppressed_values() {
        assert_eq!(coerce_value("*", SuppressionPolicy::ZeroFill), Some(0.0));
        assert_eq!(coerce_value("**", SuppressionPolicy::ZeroFill), Some(0.0));
        // A marker alongside digits is stripped, not zero-filled.
        assert_eq!(coerce_value("12*", SuppressionPolicy::ZeroFill), Some(12.0));
    }

    #[test]
    fn test_unparseable_values_become_absent_not_zero() {
        assert_eq!(coerce_value("n/a", SuppressionPolicy::Strip), None);
        assert_eq!(coerce_value("", SuppressionPolicy::Strip), None);
        assert_eq!(coerce_value("-", SuppressionPolicy::ZeroFill), None);
    }
}
