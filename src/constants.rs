//! Shared constants for caseload report processing.
//!
//! Default file lists, metric orderings, and parsing markers used across
//! the pipeline. Values mirror the CA 237 CW report layout.

/// Default CalWORKs report files, one per fiscal year, in precedence order.
/// Earlier files win ties during deduplication.
pub const DEFAULT_REPORT_FILES: &[&str] = &[
    "15-16.csv",
    "16-17.csv",
    "17-18.csv",
    "18-19.csv",
    "19-20.csv",
    "20-21.csv",
    "21-22.csv",
    "22-23.csv",
    "23-24.csv",
    "24-25.csv",
];

/// CA 237 CW metric names in cell order: index + 1 = cell number.
pub const CA237_METRICS: &[&str] = &[
    "A. 1. Pending from last month",      // Cell 1
    "A. 1a. Item 5 from last month",      // Cell 2
    "A. 1b. Adjustment",                  // Cell 3
    "A. 2. Applications received",        // Cell 4
    "A. 2a. Applications",                // Cell 5
    "A. 2b. Restoration",                 // Cell 6
    "A. 3. Total/month",                  // Cell 7
    "A. 4. Disposed of",                  // Cell 8
    "A. 4a. Approved",                    // Cell 9
    "A. 4b. Denied",                      // Cell 10
    "A. 4b1. Denied/Diversion",           // Cell 11
    "A. 4c. Other dispositions",          // Cell 12
    "A. 5. Pending at end of month",      // Cell 13
    "B. 6. Cases brought forward",        // Cell 14
    "B. 6a. Item 10 last month",          // Cell 15
    "B. 6b. Adjustment",                  // Cell 16
    "B. 7. Added during month",           // Cell 17
    "B. 8. Total cases open",             // Cell 18
    "B. 9. Cases receiving cash grant",   // Cell 19
    "B. 10. Cases carried forward",       // Cell 20
];

/// Candidate header row indices (0-based), tried in preference order.
/// Report exports most commonly place the real header at row 4 or 5;
/// plain exports start at row 0.
pub const HEADER_ROW_CANDIDATES: &[usize] = &[4, 5, 0];

/// Aggregate row label excluded from county-level data.
pub const STATEWIDE_MARKER: &str = "Statewide";

/// De-identification marker masking suppressed statistical values.
pub const SUPPRESSION_MARKER: char = '*';

/// Anchor year used when composing a date from bare Month/Year columns
/// with a missing year value.
pub const ANCHOR_YEAR: i32 = 2000;

/// Separator joining the non-empty parts of a dictionary-file metric label.
pub const DICTIONARY_LABEL_SEPARATOR: &str = " - ";

/// Lines to skip before the records of a data dictionary file.
pub const DICTIONARY_PREAMBLE_LINES: usize = 1;

/// Display format for the synthesized Report_Month column.
pub const REPORT_MONTH_FORMAT: &str = "%b %Y";
