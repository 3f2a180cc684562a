//! Logscan Scanner - archive scanning orchestration.
//!
//! This crate walks a directory of compressed log archives, runs the
//! detector catalog over every decompressed line and writes one extract per
//! archive, mirroring the input directory layout under the output root.
//!
//! # Features
//!
//! - Concurrent processing of archives with a bounded worker count
//! - Per-archive failure containment: a broken archive contributes nothing
//!   and never aborts the rest of the scan
//! - Extracts are published atomically, so failed archives leave no output
//! - Cooperative cancellation through a shared `CancellationToken`
//!
//! # Example
//!
//! ```rust,ignore
//! use logscan_core::ScanningConfig;
//! use logscan_detect::Catalog;
//! use logscan_scanner::ScanOrchestrator;
//!
//! let orchestrator = ScanOrchestrator::new(Catalog::builtin(), ScanningConfig::default())
//!     .with_max_concurrent_archives(8);
//!
//! let report = orchestrator.run_scan("logs/2024-06".as_ref()).await?;
//! println!("{}", report.summary);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod archive;
pub mod discovery;
#[allow(missing_docs)]
pub mod error;
pub mod orchestrator;
pub mod report;

// Re-export commonly used types
pub use archive::ArchiveProcessor;
pub use discovery::{discover_archives, ArchiveTask};
pub use error::{Result, ScanError};
pub use orchestrator::{ScanOrchestrator, ScanReport};
pub use report::{indicator_file_name, write_indicator, INDICATOR_SUFFIX};
pub use tokio_util::sync::CancellationToken;
