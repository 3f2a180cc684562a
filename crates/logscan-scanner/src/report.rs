//! The `<root>_all_done.txt` indicator file.

use crate::error::{Result, ScanError};
use logscan_core::ScanSummary;
use std::path::{Path, PathBuf};

/// Suffix appended to the input root's name to form the indicator file name.
pub const INDICATOR_SUFFIX: &str = "_all_done.txt";

/// Indicator file name for an input root named `base`.
#[must_use]
pub fn indicator_file_name(base: &str) -> String {
    format!("{base}{INDICATOR_SUFFIX}")
}

/// Write the summary and completion banner to `dir/<base>_all_done.txt`.
pub async fn write_indicator(dir: &Path, base: &str, summary: &ScanSummary) -> Result<PathBuf> {
    let path = dir.join(indicator_file_name(base));
    tokio::fs::write(&path, summary.indicator_contents())
        .await
        .map_err(|source| ScanError::Indicator {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
