use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("'{}' is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to read archive {}: {source}", .path.display())]
    ArchiveRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write extract {}: {source}", .path.display())]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("scan cancelled while processing {}", .path.display())]
    Cancelled { path: PathBuf },

    #[error("archive worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("failed to write indicator file {}: {source}", .path.display())]
    Indicator {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid scan configuration: {0}")]
    Config(#[from] logscan_core::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
