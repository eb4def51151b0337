//! Header and column normalization for report files.
//!
//! Report exports disagree on where the header row sits and how the key
//! columns are labelled. This module cleans labels, drops unnamed columns,
//! canonicalizes known aliases, and detects the real header row by trying
//! candidates in a fixed preference order.

use crate::error::{CaseloadError, Result};
use crate::models::Table;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

/// Canonical column names produced by normalization.
pub const DATE_CODE: &str = "Date_Code";
pub const COUNTY_NAME: &str = "County_Name";
pub const COUNTY_CODE: &str = "County_Code";
pub const REPORT_MONTH: &str = "Report_Month";
pub const MONTH: &str = "Month";
pub const YEAR: &str = "Year";

/// Trim whitespace and a leading byte-order marker from a raw label.
pub fn clean_label(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').trim().to_string()
}

/// Canonical name for a cleaned label, if it matches a known alias set.
fn canonical_name(cleaned: &str) -> Option<&'static str> {
    match cleaned.to_lowercase().as_str() {
        "date" | "date code" | "date_code" => Some(DATE_CODE),
        "county name" | "county_name" | "county" => Some(COUNTY_NAME),
        "county code" | "county_code" => Some(COUNTY_CODE),
        "report month" | "report_month" => Some(REPORT_MONTH),
        "month" => Some(MONTH),
        "year" => Some(YEAR),
        _ => None,
    }
}

/// Normalize column labels: drop empty/"unnamed" columns, rename known
/// aliases, pass everything else through cleaned but otherwise unchanged.
///
/// Runs identically regardless of which header row the reader chose.
pub fn normalize_columns(table: Table) -> Table {
    let mut keep = Vec::new();
    let mut names = Vec::new();

    for (idx, raw) in table.columns.iter().enumerate() {
        let cleaned = clean_label(raw);
        if cleaned.is_empty() || cleaned.to_lowercase().starts_with("unnamed") {
            continue;
        }
        keep.push(idx);
        names.push(match canonical_name(&cleaned) {
            Some(canonical) => canonical.to_string(),
            None => cleaned,
        });
    }

    let rows = table
        .rows
        .into_iter()
        .map(|row| keep.iter().map(|&idx| row[idx].clone()).collect())
        .collect();

    Table::new(names, rows)
}

/// Read a report CSV, trying each candidate header row in order.
///
/// The first candidate whose normalized column set contains a
/// county-identifying column wins. Returns the table and the accepted header
/// index; exhausting every candidate is an `UnrecognizedHeader` error.
pub fn read_report_csv(path: &Path, header_candidates: &[usize]) -> Result<(Table, usize)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CaseloadError::csv(path, e))?;

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CaseloadError::csv(path, e))?;
        records.push(record.iter().map(|field| field.to_string()).collect());
    }

    for &header_idx in header_candidates {
        if header_idx >= records.len() {
            continue;
        }
        let columns = records[header_idx].clone();
        let rows = records[header_idx + 1..].to_vec();
        let table = normalize_columns(Table::new(columns, rows));

        if has_county_column(&table) {
            debug!(
                "Accepted header row {} for {}",
                header_idx,
                path.display()
            );
            return Ok((table, header_idx));
        }
    }

    debug!("No usable header row found in {}", path.display());
    Err(CaseloadError::UnrecognizedHeader {
        path: path.to_path_buf(),
    })
}

/// A table is usable when some cleaned label mentions a county.
fn has_county_column(table: &Table) -> bool {
    table
        .columns
        .iter()
        .any(|c| c.to_lowercase().contains("county"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            columns.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_clean_label_strips_bom_and_whitespace() {
        assert_eq!(clean_label("\u{feff} County Name "), "County Name");
        assert_eq!(clean_label("  Cell 1"), "Cell 1");
    }

    #[test]
    fn test_normalize_renames_aliases() {
        let normalized = normalize_columns(table(
            &["DATE CODE", "county", "Report Month", "month", "Year"],
            &[],
        ));
        assert_eq!(
            normalized.columns,
            vec![DATE_CODE, COUNTY_NAME, REPORT_MONTH, MONTH, YEAR]
        );
    }

    #[test]
    fn test_normalize_drops_unnamed_and_empty_columns() {
        let normalized = normalize_columns(table(
            &["County Name", "", "Unnamed: 2", "Cell 1"],
            &[&["Alpha", "x", "y", "10"]],
        ));
        assert_eq!(normalized.columns, vec![COUNTY_NAME, "Cell 1"]);
        assert_eq!(normalized.rows[0], vec!["Alpha", "10"]);
    }

    #[test]
    fn test_normalize_passes_unrecognized_columns_through() {
        let normalized = normalize_columns(table(&["Cell 7", "Notes"], &[]));
        assert_eq!(normalized.columns, vec!["Cell 7", "Notes"]);
    }

    #[test]
    fn test_read_report_header_at_row_zero() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Date Code,County Name,Cell 1").unwrap();
        writeln!(file, "SEP25,Alpha,10").unwrap();

        let (table, header_idx) = read_report_csv(file.path(), &[4, 5, 0]).unwrap();
        assert_eq!(header_idx, 0);
        assert_eq!(table.columns, vec![DATE_CODE, COUNTY_NAME, "Cell 1"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_read_report_header_at_row_four() {
        let mut file = NamedTempFile::new().unwrap();
        for _ in 0..4 {
            writeln!(file, "CA 237 CW preamble,,").unwrap();
        }
        writeln!(file, "Date Code,County Name,Cell 1").unwrap();
        writeln!(file, "SEP25,Alpha,10").unwrap();
        writeln!(file, "SEP25,Beta,20").unwrap();

        let (table, header_idx) = read_report_csv(file.path(), &[4, 5, 0]).unwrap();
        assert_eq!(header_idx, 4);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_read_report_no_county_column_anywhere() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Date Code,Region,Cell 1").unwrap();
        writeln!(file, "SEP25,North,10").unwrap();

        assert!(matches!(
            read_report_csv(file.path(), &[4, 5, 0]),
            Err(CaseloadError::UnrecognizedHeader { .. })
        ));
    }

    #[test]
    fn test_read_report_ragged_rows_are_aligned() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "County Name,Cell 1,Cell 2").unwrap();
        writeln!(file, "Alpha,10").unwrap();

        let (table, _) = read_report_csv(file.path(), &[4, 5, 0]).unwrap();
        assert_eq!(table.rows[0], vec!["Alpha", "10", ""]);
    }
}
