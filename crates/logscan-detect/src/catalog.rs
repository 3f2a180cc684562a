//! Ordered detector catalog and line classification.

use crate::builtin;
use crate::detector::Detector;
use crate::error::{DetectError, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Separator between fields of an extract record. Fields are never escaped.
pub const FIELD_DELIMITER: char = ';';

static BUILTIN: Lazy<Arc<Catalog>> = Lazy::new(|| {
    let detectors = builtin::detectors().expect("builtin detector patterns are valid");
    Arc::new(Catalog::new(detectors).expect("builtin detector names are unique"))
});

/// An ordered, read-only collection of detectors.
pub struct Catalog {
    detectors: Vec<Box<dyn Detector>>,
}

impl Catalog {
    /// Create a catalog from detectors in priority order.
    ///
    /// # Errors
    /// Returns [`DetectError::DuplicateDetector`] if two detectors share a name.
    pub fn new(detectors: Vec<Box<dyn Detector>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(detectors.len());
        for detector in &detectors {
            if !seen.insert(detector.name()) {
                return Err(DetectError::DuplicateDetector {
                    name: detector.name().to_string(),
                });
            }
        }
        Ok(Self { detectors })
    }

    /// The shared built-in catalog, compiled on first use.
    #[must_use]
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Detector names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.detectors.iter().map(|d| d.name())
    }

    /// Number of detectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// Whether the catalog has no detectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Classify one line.
    ///
    /// The line is trimmed, then every detector runs in catalog order and
    /// each of its occurrences is appended in the order found. There is no
    /// early exit; a line can report several PII types at once.
    #[must_use]
    pub fn classify_line(&self, line: &str) -> LineResult {
        let clean = line.trim();
        let matches = self
            .detectors
            .iter()
            .flat_map(|detector| {
                detector
                    .find_all(clean)
                    .into_iter()
                    .map(move |occurrence| LineMatch {
                        matched_text: occurrence.text.to_string(),
                        detector_name: detector.name().to_string(),
                    })
            })
            .collect();

        LineResult {
            clean_line: clean.to_string(),
            matches,
        }
    }

    /// Whether any detector matches the trimmed line.
    #[must_use]
    pub fn has_pii(&self, line: &str) -> bool {
        let clean = line.trim();
        self.detectors.iter().any(|d| d.is_match(clean))
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("detectors", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// One occurrence of a detected pattern in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// The matched substring
    pub matched_text: String,
    /// Name of the detector that produced it
    pub detector_name: String,
}

/// Classification of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineResult {
    /// The line with surrounding whitespace removed
    pub clean_line: String,
    /// Matches in catalog order, then position order
    pub matches: Vec<LineMatch>,
}

impl LineResult {
    /// Whether the line contains PII.
    #[must_use]
    pub fn has_pii(&self) -> bool {
        !self.matches.is_empty()
    }

    /// The extract record for this line, without the trailing newline.
    ///
    /// `clean_line;text_1;detector_1;text_2;detector_2;...`
    #[must_use]
    pub fn to_record(&self) -> String {
        let mut record = self.clean_line.clone();
        for m in &self.matches {
            record.push(FIELD_DELIMITER);
            record.push_str(&m.matched_text);
            record.push(FIELD_DELIMITER);
            record.push_str(&m.detector_name);
        }
        record
    }

    /// Write the record followed by a newline.
    pub fn write_record<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.to_record().as_bytes())?;
        out.write_all(b"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{KeywordDetector, PatternDetector};

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 18);
        assert_eq!(catalog.names().next(), Some("DL_REGEX"));
        assert_eq!(catalog.names().last(), Some("INSURANCE_POLICY_KEYWORD"));
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(Arc::ptr_eq(&Catalog::builtin(), &Catalog::builtin()));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(PatternDetector::new("DIGITS", "[0-9]+").unwrap()),
            Box::new(KeywordDetector::new("DIGITS", ["digits"]).unwrap()),
        ];
        match Catalog::new(detectors) {
            Err(DetectError::DuplicateDetector { name }) => assert_eq!(name, "DIGITS"),
            other => panic!("expected DuplicateDetector, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_trims_line() {
        let result = Catalog::builtin().classify_line("  \tpay ravi@okaxis  \n");
        assert_eq!(result.clean_line, "pay ravi@okaxis");
        assert_eq!(result.to_record(), "pay ravi@okaxis;ravi@okaxis;UPI_REGEX");
    }

    #[test]
    fn test_record_is_not_escaped() {
        let result = LineResult {
            clean_line: "a;b".to_string(),
            matches: vec![LineMatch {
                matched_text: "x;y".to_string(),
                detector_name: "D".to_string(),
            }],
        };
        let mut out = Vec::new();
        result.write_record(&mut out).unwrap();
        assert_eq!(out, b"a;b;x;y;D\n");
    }

    #[test]
    fn test_has_pii_shortcut_agrees() {
        let catalog = Catalog::builtin();
        for line in ["Hello world", "Account No: 1234", "  call 9876543210 "] {
            assert_eq!(catalog.has_pii(line), catalog.classify_line(line).has_pii());
        }
    }
}
