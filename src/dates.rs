//! Date reconciliation for report rows.
//!
//! Source files encode the report month several different ways: a
//! month-abbreviation + two-digit-year code ("SEP25"), a YYYYMM integer
//! (202509, sometimes stored as "202509.0"), or one of several calendar
//! formats. Each value is parsed by trying the encodings in a fixed
//! precedence order and keeping the first success.

use crate::columns::{DATE_CODE, MONTH, REPORT_MONTH, YEAR};
use crate::constants::ANCHOR_YEAR;
use crate::models::Table;
use chrono::NaiveDate;
use tracing::debug;

/// Which source column supplied the dates for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    DateCode,
    ReportMonth,
    MonthYear,
}

/// Calendar formats tried after the report-specific encodings. Formats
/// without a day component compose a first-of-month date.
const CALENDAR_FORMATS: &[(&str, bool)] = &[
    ("%Y-%m", false),
    ("%Y-%m-%d", true),
    ("%m/%Y", false),
    ("%m/%d/%Y", true),
    ("%b %Y", false),
    ("%B %Y", false),
];

/// Last-resort formats for values the explicit sequence missed.
const FALLBACK_FORMATS: &[(&str, bool)] = &[
    ("%Y%m%d", true),
    ("%Y/%m/%d", true),
    ("%d-%b-%Y", true),
    ("%d %b %Y", true),
    ("%B %d, %Y", true),
];

/// Parse one date-like value, trying encodings in precedence order:
/// month-abbreviation code, numeric YYYYMM, explicit calendar formats,
/// then a generic best-effort fallback.
pub fn parse_date_value(raw: &str) -> Option<NaiveDate> {
    // Numeric storage leaves a trailing ".0" artifact; strip it first.
    let s = raw.trim();
    let s = s.strip_suffix(".0").unwrap_or(s);
    if s.is_empty() {
        return None;
    }

    if let Some(date) = parse_month_code(s) {
        return Some(date);
    }
    if let Some(date) = parse_yyyymm(s) {
        return Some(date);
    }
    for &(format, has_day) in CALENDAR_FORMATS {
        if let Some(date) = parse_format(s, format, has_day) {
            return Some(date);
        }
    }
    for &(format, has_day) in FALLBACK_FORMATS {
        if let Some(date) = parse_format(s, format, has_day) {
            return Some(date);
        }
    }
    None
}

/// Three-letter month abbreviation immediately followed by a two-digit
/// year, case-insensitive: "SEP25" -> 2025-09-01.
fn parse_month_code(s: &str) -> Option<NaiveDate> {
    parse_format(s, "%b%y", false)
}

/// Purely numeric value interpreted as YYYYMM: 202509 -> 2025-09-01.
fn parse_yyyymm(s: &str) -> Option<NaiveDate> {
    let numeric: f64 = s.parse().ok()?;
    let digits = (numeric.trunc() as i64).to_string();
    if digits.len() != 6 {
        return None;
    }
    let year: i32 = digits[..4].parse().ok()?;
    let month: u32 = digits[4..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Parse with a chrono format string; month-only formats get a day of 1
/// appended so they can produce a complete date.
fn parse_format(s: &str, format: &str, has_day: bool) -> Option<NaiveDate> {
    if has_day {
        NaiveDate::parse_from_str(s, format).ok()
    } else {
        NaiveDate::parse_from_str(&format!("{s} 1"), &format!("{format} %d")).ok()
    }
}

/// Parse every value of a column, keeping per-row successes.
fn parse_column(table: &Table, column: &str) -> Option<Vec<Option<NaiveDate>>> {
    let values = table.column_values(column)?;
    Some(values.iter().map(|v| parse_date_value(v)).collect())
}

/// Produce one calendar date per row from the most authoritative available
/// source column: `Date_Code`, then `Report_Month`, then `Month` + `Year`.
///
/// A source is accepted only if at least one row parses under it. Returns
/// `None` when no source yields any valid date; such rows are dropped by
/// the caller, never defaulted.
pub fn build_dates(table: &Table) -> Option<(Vec<Option<NaiveDate>>, DateSource)> {
    for (column, source) in [(DATE_CODE, DateSource::DateCode), (REPORT_MONTH, DateSource::ReportMonth)] {
        if let Some(parsed) = parse_column(table, column) {
            if parsed.iter().any(Option::is_some) {
                debug!("Dates resolved from {} column", column);
                return Some((parsed, source));
            }
        }
    }

    if let (Some(months), Some(years)) = (table.column_values(MONTH), table.column_values(YEAR)) {
        // Explicit, documented fallback for this one source only: missing
        // month defaults to 1, missing year to the anchor year.
        let parsed: Vec<Option<NaiveDate>> = months
            .iter()
            .zip(years.iter())
            .map(|(m, y)| compose_month_year(m, y))
            .collect();
        if parsed.iter().any(Option::is_some) {
            debug!("Dates composed from Month/Year columns");
            return Some((parsed, DateSource::MonthYear));
        }
    }

    None
}

/// First-of-month date from separate numeric month and year fields.
fn compose_month_year(month: &str, year: &str) -> Option<NaiveDate> {
    let month = parse_numeric_field(month).unwrap_or(1);
    let year = parse_numeric_field(year).unwrap_or(i64::from(ANCHOR_YEAR));
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, u32::try_from(month).ok()?, 1)
}

fn parse_numeric_field(s: &str) -> Option<i64> {
    let s = s.trim();
    let s = s.strip_suffix(".0").unwrap_or(s);
    s.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            columns.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_month_code_parses_case_insensitively() {
        assert_eq!(parse_date_value("SEP25"), Some(date(2025, 9, 1)));
        assert_eq!(parse_date_value("sep25"), Some(date(2025, 9, 1)));
        assert_eq!(parse_date_value("Jan16"), Some(date(2016, 1, 1)));
    }

    #[test]
    fn test_yyyymm_and_month_code_reconcile() {
        assert_eq!(parse_date_value("202509"), parse_date_value("SEP25"));
    }

    #[test]
    fn test_trailing_point_zero_is_stripped() {
        assert_eq!(parse_date_value("202509.0"), Some(date(2025, 9, 1)));
    }

    #[test]
    fn test_yyyymm_rejects_invalid_month() {
        assert_eq!(parse_date_value("202513"), None);
        assert_eq!(parse_date_value("2025"), None);
    }

    #[test]
    fn test_calendar_formats() {
        assert_eq!(parse_date_value("2025-09"), Some(date(2025, 9, 1)));
        assert_eq!(parse_date_value("2025-09-15"), Some(date(2025, 9, 15)));
        assert_eq!(parse_date_value("09/2025"), Some(date(2025, 9, 1)));
        assert_eq!(parse_date_value("9/15/2025"), Some(date(2025, 9, 15)));
        assert_eq!(parse_date_value("Sep 2025"), Some(date(2025, 9, 1)));
        assert_eq!(parse_date_value("September 2025"), Some(date(2025, 9, 1)));
    }

    #[test]
    fn test_unparseable_values_stay_unresolved() {
        assert_eq!(parse_date_value(""), None);
        assert_eq!(parse_date_value("n/a"), None);
        assert_eq!(parse_date_value("Statewide"), None);
    }

    #[test]
    fn test_build_dates_prefers_date_code() {
        let t = table(
            &[DATE_CODE, REPORT_MONTH],
            &[&["SEP25", "Oct 2025"], &["OCT25", "Nov 2025"]],
        );
        let (dates, source) = build_dates(&t).unwrap();
        assert_eq!(source, DateSource::DateCode);
        assert_eq!(dates, vec![Some(date(2025, 9, 1)), Some(date(2025, 10, 1))]);
    }

    #[test]
    fn test_build_dates_falls_back_to_report_month() {
        let t = table(
            &[DATE_CODE, REPORT_MONTH],
            &[&["garbage", "Oct 2025"], &["junk", "Nov 2025"]],
        );
        let (dates, source) = build_dates(&t).unwrap();
        assert_eq!(source, DateSource::ReportMonth);
        assert_eq!(
            dates,
            vec![Some(date(2025, 10, 1)), Some(date(2025, 11, 1))]
        );
    }

    #[test]
    fn test_build_dates_month_year_defaults() {
        let t = table(&[MONTH, YEAR], &[&["9", "2025"], &["", "2025"], &["3", ""]]);
        let (dates, source) = build_dates(&t).unwrap();
        assert_eq!(source, DateSource::MonthYear);
        assert_eq!(dates[0], Some(date(2025, 9, 1)));
        // Missing month defaults to January.
        assert_eq!(dates[1], Some(date(2025, 1, 1)));
        // Missing year defaults to the anchor year.
        assert_eq!(dates[2], Some(date(2000, 3, 1)));
    }

    #[test]
    fn test_build_dates_none_when_no_source_parses() {
        let t = table(&[DATE_CODE], &[&["garbage"], &["junk"]]);
        assert!(build_dates(&t).is_none());
    }

    #[test]
    fn test_partial_parse_keeps_unresolved_rows_null() {
        let t = table(&[DATE_CODE], &[&["SEP25"], &["junk"]]);
        let (dates, _) = build_dates(&t).unwrap();
        assert_eq!(dates, vec![Some(date(2025, 9, 1)), None]);
    }
}
