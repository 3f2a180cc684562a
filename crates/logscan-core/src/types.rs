//! Counters produced by a scan.
//!
//! An [`ArchiveResult`] is produced once per archive and folded into the
//! [`ScanSummary`] by pointwise addition, so aggregation order never
//! affects the totals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FromIterator;
use std::ops::{Add, AddAssign};

/// Closing banner appended after the summary block in the indicator file.
pub const COMPLETION_BANNER: &str = "\n========================================\n\
||             SCAN COMPLETE!         ||\n\
||             ALL DONE!              ||\n\
========================================\n";

/// Counters for a single archive.
///
/// `files_processed` is 1 for an archive that was read to the end and 0
/// for one that failed; a failed archive reports no lines at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveResult {
    /// 1 on success, 0 on failure
    pub files_processed: u64,
    /// Number of decompressed lines read
    pub lines_processed: u64,
    /// Number of lines with at least one detector match
    pub lines_with_pii: u64,
}

impl ArchiveResult {
    /// Result of an archive that was fully processed.
    #[must_use]
    pub fn completed(lines_processed: u64, lines_with_pii: u64) -> Self {
        debug_assert!(lines_with_pii <= lines_processed);
        Self {
            files_processed: 1,
            lines_processed,
            lines_with_pii,
        }
    }

    /// Result of an archive that could not be processed.
    #[must_use]
    pub fn failed() -> Self {
        Self::default()
    }

    /// Whether this archive was fully processed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.files_processed == 1
    }
}

/// Aggregate counters for a whole scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Archives fully processed
    pub total_files_parsed: u64,
    /// Lines read across all processed archives
    pub total_lines_parsed: u64,
    /// Lines containing PII across all processed archives
    pub total_lines_with_pii: u64,
}

impl ScanSummary {
    /// Render the summary block shown on stdout and in the indicator file.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "--- PII Scan Summary ---\n\
             Total files parsed: {}\n\
             Total lines parsed: {}\n\
             Total lines containing PII: {}\n\
             ------------------------",
            self.total_files_parsed, self.total_lines_parsed, self.total_lines_with_pii
        )
    }

    /// Full contents of the `<root>_all_done.txt` indicator file.
    #[must_use]
    pub fn indicator_contents(&self) -> String {
        format!("{}{COMPLETION_BANNER}", self.render())
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl AddAssign<ArchiveResult> for ScanSummary {
    fn add_assign(&mut self, rhs: ArchiveResult) {
        self.total_files_parsed += rhs.files_processed;
        self.total_lines_parsed += rhs.lines_processed;
        self.total_lines_with_pii += rhs.lines_with_pii;
    }
}

impl Add<ArchiveResult> for ScanSummary {
    type Output = Self;

    fn add(mut self, rhs: ArchiveResult) -> Self {
        self += rhs;
        self
    }
}

impl FromIterator<ArchiveResult> for ScanSummary {
    fn from_iter<I: IntoIterator<Item = ArchiveResult>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Add::add)
    }
}
