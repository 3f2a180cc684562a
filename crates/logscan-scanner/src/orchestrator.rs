//! Scan orchestrator for coordinating archive processing.
//!
//! This module provides the `ScanOrchestrator` which discovers archives
//! under an input root, processes them on a bounded pool of blocking workers
//! and folds the per-archive counters into a single summary.

use crate::archive::ArchiveProcessor;
use crate::discovery::{discover_archives, ArchiveTask};
use crate::error::{Result, ScanError};
use crate::report::write_indicator;
use futures::stream::{FuturesUnordered, StreamExt};
use logscan_core::{ArchiveResult, ScanSummary, ScanningConfig};
use logscan_detect::Catalog;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Outcome of a completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Totals over every successfully processed archive
    pub summary: ScanSummary,
    /// Directory holding the mirrored extracts for this input root
    pub output_root: PathBuf,
    /// Indicator file, if it could be written
    pub indicator: Option<PathBuf>,
}

/// Orchestrates scanning of all archives under an input root.
#[derive(Debug)]
pub struct ScanOrchestrator {
    /// Detector catalog shared read-only by every worker
    catalog: Arc<Catalog>,
    /// Paths, extensions and worker count
    config: ScanningConfig,
    /// Stops dispatching and aborts in-flight archives when cancelled
    cancel: CancellationToken,
}

impl ScanOrchestrator {
    /// Create a new scan orchestrator.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: ScanningConfig) -> Self {
        Self {
            catalog,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Set the maximum number of archives processed concurrently.
    #[must_use]
    pub fn with_max_concurrent_archives(mut self, max: usize) -> Self {
        self.config.concurrent_archives = max;
        self
    }

    /// Use an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels this orchestrator's scans.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Scanning configuration in effect.
    #[must_use]
    pub fn config(&self) -> &ScanningConfig {
        &self.config
    }

    /// Directory receiving the mirrored extracts for `input_root`.
    pub async fn output_dir(&self, input_root: &Path) -> Result<PathBuf> {
        let base = root_name(input_root).await?;
        Ok(self.config.output_root.join(base))
    }

    /// Scan every archive under `input_root`.
    ///
    /// Validates the root, mirrors its layout under
    /// `<output_root>/<root name>`, processes all archives and writes the
    /// indicator file. Per-archive failures are logged and contribute
    /// nothing; only an invalid root or an unusable output root abort the
    /// scan. A failure to write the indicator is logged and reported as
    /// `indicator: None`.
    pub async fn run_scan(&self, input_root: &Path) -> Result<ScanReport> {
        let is_dir = tokio::fs::metadata(input_root)
            .await
            .is_ok_and(|m| m.is_dir());
        if !is_dir {
            return Err(ScanError::NotADirectory {
                path: input_root.to_path_buf(),
            });
        }
        self.config.validate()?;

        let base = root_name(input_root).await?;
        let output_root = self.config.output_root.join(&base);
        tokio::fs::create_dir_all(&output_root).await?;
        let shown = tokio::fs::canonicalize(&output_root)
            .await
            .unwrap_or_else(|_| output_root.clone());
        info!("Output will be under: {}", shown.display());

        let tasks =
            discover_archives(input_root, &output_root, &self.config.archive_extension).await?;
        info!(
            "Found {} archive(s) under {}",
            tasks.len(),
            input_root.display()
        );

        let summary = self.process_archives(tasks).await;

        let indicator = match write_indicator(&self.config.indicator_dir, &base, &summary).await {
            Ok(path) => Some(path),
            Err(e) => {
                error!("{}", e);
                None
            }
        };

        Ok(ScanReport {
            summary,
            output_root,
            indicator,
        })
    }

    /// Process archives concurrently and fold their results.
    ///
    /// At most `concurrent_archives` archives are in flight at once. Results
    /// are folded in completion order; a worker that panics is logged and
    /// contributes nothing.
    pub async fn process_archives(&self, tasks: Vec<ArchiveTask>) -> ScanSummary {
        let max_in_flight = self.config.concurrent_archives.max(1);
        let processor = Arc::new(ArchiveProcessor::new(
            Arc::clone(&self.catalog),
            &self.config,
        ));
        let total = tasks.len();
        let mut in_flight = FuturesUnordered::new();
        let mut summary = ScanSummary::default();

        for (dispatched, task) in tasks.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(
                    "Scan cancelled, {} of {} archive(s) not dispatched",
                    total - dispatched,
                    total
                );
                break;
            }

            in_flight.push(self.spawn_archive(Arc::clone(&processor), task));

            // Respect concurrency limit
            while in_flight.len() >= max_in_flight {
                if let Some((path, outcome)) = in_flight.next().await {
                    Self::fold(&mut summary, &path, outcome);
                }
            }
        }

        // Collect remaining results
        while let Some((path, outcome)) = in_flight.next().await {
            Self::fold(&mut summary, &path, outcome);
        }

        summary
    }

    fn spawn_archive(
        &self,
        processor: Arc<ArchiveProcessor>,
        task: ArchiveTask,
    ) -> impl Future<Output = (PathBuf, std::result::Result<ArchiveResult, JoinError>)> {
        let cancel = self.cancel.clone();
        let path = task.input.clone();
        let handle = tokio::task::spawn_blocking(move || processor.process(&task, &cancel));
        async move { (path, handle.await) }
    }

    fn fold(
        summary: &mut ScanSummary,
        path: &Path,
        outcome: std::result::Result<ArchiveResult, JoinError>,
    ) {
        match outcome {
            Ok(result) => {
                if result.is_success() {
                    info!("Processed: {}", path.display());
                }
                *summary += result;
            }
            Err(e) => {
                error!("Error on {}: {}", path.display(), ScanError::Worker(e));
            }
        }
    }
}

/// Name of the input root's last path component.
///
/// Roots such as `.` or `logs/..` have no file name of their own and are
/// resolved first.
async fn root_name(root: &Path) -> Result<String> {
    if let Some(name) = root.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }
    let resolved = tokio::fs::canonicalize(root).await?;
    Ok(resolved
        .file_name()
        .map_or_else(|| "root".to_string(), |n| n.to_string_lossy().into_owned()))
}
