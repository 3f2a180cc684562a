//! Logscan Core - Foundation crate for the logscan PII audit tool.
//!
//! This crate provides the shared result types, error handling and
//! configuration management that the detection and scanning crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Per-archive counters and the aggregate scan summary
//!
//! # Example
//!
//! ```rust
//! use logscan_core::{AppConfig, ArchiveResult, ScanSummary};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.scanning.concurrent_archives, 5);
//!
//! let summary: ScanSummary = vec![
//!     ArchiveResult::completed(10, 2),
//!     ArchiveResult::failed(),
//! ]
//! .into_iter()
//! .collect();
//! assert_eq!(summary.total_files_parsed, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, ScanningConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::{ArchiveResult, ScanSummary, COMPLETION_BANNER};
