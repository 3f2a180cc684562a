//! Logscan Detect - PII detection for single log lines.
//!
//! A [`Catalog`] is an ordered list of [`Detector`]s. Classifying a line runs
//! every detector in catalog order and collects every non-overlapping
//! occurrence; a line carries PII when at least one occurrence was found.
//!
//! # Example
//!
//! ```rust
//! use logscan_detect::Catalog;
//!
//! let catalog = Catalog::builtin();
//! let result = catalog.classify_line("Contact me at jane.doe@example.com or 9876543210");
//!
//! assert!(result.has_pii());
//! assert_eq!(
//!     result.to_record(),
//!     "Contact me at jane.doe@example.com or 9876543210;\
//!      jane.doe@example.com;EMAIL_REGEX;9876543210;MOBILE_REGEX"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod builtin;
pub mod catalog;
pub mod detector;
#[allow(missing_docs)]
pub mod error;

// Re-export commonly used types
pub use catalog::{Catalog, LineMatch, LineResult, FIELD_DELIMITER};
pub use detector::{Detector, KeywordDetector, Occurrence, PatternDetector};
pub use error::{DetectError, Result};
