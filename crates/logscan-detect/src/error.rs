use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("invalid pattern for detector {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("detector {name} has no keywords")]
    EmptyKeywords { name: String },

    #[error("duplicate detector name in catalog: {name}")]
    DuplicateDetector { name: String },
}

pub type Result<T> = std::result::Result<T, DetectError>;
