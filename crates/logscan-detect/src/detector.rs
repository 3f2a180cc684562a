//! The detector capability shared by value patterns and label keywords.

use crate::error::{DetectError, Result};
use regex::Regex;
use std::fmt;

/// One occurrence of a detected pattern inside a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'t> {
    /// The matched substring
    pub text: &'t str,
    /// Byte offset of the match within the line
    pub offset: usize,
}

/// A named, stateless rule that finds occurrences of one PII type in a line.
///
/// Implementations must be pure: the same line always yields the same
/// occurrences, in left-to-right order and without overlaps.
pub trait Detector: Send + Sync {
    /// Unique name of this detector, written next to every match it produces.
    fn name(&self) -> &str;

    /// All non-overlapping occurrences in `line`, leftmost first.
    fn find_all<'t>(&self, line: &'t str) -> Vec<Occurrence<'t>>;

    /// Whether `line` contains at least one occurrence.
    fn is_match(&self, line: &str) -> bool {
        !self.find_all(line).is_empty()
    }
}

/// Detector for value-shaped PII (identifiers, addresses, numbers).
///
/// An optional exclusion pattern drops occurrences that overlap one of its
/// matches, which keeps a broad pattern from re-reporting a fragment of a
/// value another detector already describes.
#[derive(Clone)]
pub struct PatternDetector {
    name: String,
    regex: Regex,
    exclude: Option<Regex>,
}

impl PatternDetector {
    /// Compile a detector from a regular expression.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex = compile(&name, pattern)?;
        Ok(Self {
            name,
            regex,
            exclude: None,
        })
    }

    /// Drop occurrences overlapping any match of `pattern`.
    pub fn excluding(mut self, pattern: &str) -> Result<Self> {
        self.exclude = Some(compile(&self.name, pattern)?);
        Ok(self)
    }
}

impl Detector for PatternDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_all<'t>(&self, line: &'t str) -> Vec<Occurrence<'t>> {
        let excluded: Vec<(usize, usize)> = match &self.exclude {
            Some(exclude) => exclude
                .find_iter(line)
                .map(|m| (m.start(), m.end()))
                .collect(),
            None => Vec::new(),
        };

        self.regex
            .find_iter(line)
            .filter(|m| {
                !excluded
                    .iter()
                    .any(|&(start, end)| m.start() < end && start < m.end())
            })
            .map(|m| Occurrence {
                text: m.as_str(),
                offset: m.start(),
            })
            .collect()
    }
}

impl fmt::Debug for PatternDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternDetector")
            .field("name", &self.name)
            .field("regex", &self.regex.as_str())
            .field("exclude", &self.exclude.as_ref().map(Regex::as_str))
            .finish()
    }
}

/// Detector for field-label words such as "address" or "dob".
///
/// Matches any keyword case-insensitively as a whole word. The presence of a
/// label is reported even when no value follows it.
#[derive(Clone)]
pub struct KeywordDetector {
    name: String,
    keywords: Vec<String>,
    regex: Regex,
}

impl KeywordDetector {
    /// Build a detector from keywords; earlier keywords win at the same position.
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        if keywords.is_empty() {
            return Err(DetectError::EmptyKeywords { name });
        }

        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let regex = compile(&name, &format!(r"(?i)\b(?:{alternation})\b"))?;

        Ok(Self {
            name,
            keywords,
            regex,
        })
    }
}

impl Detector for KeywordDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_all<'t>(&self, line: &'t str) -> Vec<Occurrence<'t>> {
        self.regex
            .find_iter(line)
            .map(|m| Occurrence {
                text: m.as_str(),
                offset: m.start(),
            })
            .collect()
    }
}

impl fmt::Debug for KeywordDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordDetector")
            .field("name", &self.name)
            .field("keywords", &self.keywords)
            .finish()
    }
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| DetectError::InvalidPattern {
        name: name.to_string(),
        source,
    })
}
