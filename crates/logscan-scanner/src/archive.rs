//! Processing of a single compressed archive.
//!
//! The archive is decompressed as a stream, split into lines and each line
//! is classified. Lines carrying PII are written to the extract; every line
//! is counted. The extract is first written next to its final path with a
//! `.partial` suffix and renamed into place only once the whole archive has
//! been read.

use crate::discovery::ArchiveTask;
use crate::error::{Result, ScanError};
use flate2::read::MultiGzDecoder;
use logscan_core::{ArchiveResult, ScanningConfig};
use logscan_detect::Catalog;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

const PARTIAL_SUFFIX: &str = ".partial";

/// Scans archives against a catalog and writes their extracts.
#[derive(Debug, Clone)]
pub struct ArchiveProcessor {
    catalog: Arc<Catalog>,
    archive_suffix: String,
    artifact_suffix: String,
}

impl ArchiveProcessor {
    /// Create a processor using the extensions from `config`.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: &ScanningConfig) -> Self {
        Self {
            catalog,
            archive_suffix: format!(".{}", config.archive_extension.trim_start_matches('.')),
            artifact_suffix: format!(".{}", config.artifact_extension.trim_start_matches('.')),
        }
    }

    /// Path of the extract written for `task`.
    ///
    /// The trailing archive extension of the input's file name is replaced by
    /// the artifact extension; a name without it just gains the artifact
    /// extension.
    #[must_use]
    pub fn artifact_path(&self, task: &ArchiveTask) -> PathBuf {
        let name = task
            .input
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let name: &str = &name;
        let stem = name.strip_suffix(self.archive_suffix.as_str()).unwrap_or(name);
        task.output_dir.join(format!("{stem}{}", self.artifact_suffix))
    }

    /// Process one archive, containing any failure.
    ///
    /// Failures are logged with the archive's path and reported as
    /// [`ArchiveResult::failed`]; nothing read before the failure is counted.
    pub fn process(&self, task: &ArchiveTask, cancel: &CancellationToken) -> ArchiveResult {
        match self.try_process(task, cancel) {
            Ok(result) => result,
            Err(e @ ScanError::Cancelled { .. }) => {
                warn!("{}", e);
                ArchiveResult::failed()
            }
            Err(e) => {
                error!("Error on {}: {}", task.input.display(), e);
                ArchiveResult::failed()
            }
        }
    }

    /// Process one archive, returning the first error encountered.
    pub fn try_process(
        &self,
        task: &ArchiveTask,
        cancel: &CancellationToken,
    ) -> Result<ArchiveResult> {
        fs::create_dir_all(&task.output_dir).map_err(|source| ScanError::ArchiveWrite {
            path: task.output_dir.clone(),
            source,
        })?;

        let artifact = self.artifact_path(task);
        let partial = partial_path(&artifact);

        let input = File::open(&task.input).map_err(|source| ScanError::ArchiveRead {
            path: task.input.clone(),
            source,
        })?;
        let mut raw = BufReader::new(input);
        let is_empty = raw
            .fill_buf()
            .map_err(|source| ScanError::ArchiveRead {
                path: task.input.clone(),
                source,
            })?
            .is_empty();
        // A zero-byte archive is an empty stream, not a truncated one.
        let reader: Box<dyn BufRead> = if is_empty {
            Box::new(io::empty())
        } else {
            Box::new(BufReader::new(MultiGzDecoder::new(raw)))
        };

        let output = File::create(&partial).map_err(|source| ScanError::ArchiveWrite {
            path: partial.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(output);

        let outcome = self
            .scan_stream(reader, &mut writer, &task.input, &partial, cancel)
            .and_then(|result| {
                writer
                    .flush()
                    .map_err(|source| ScanError::ArchiveWrite {
                        path: partial.clone(),
                        source,
                    })?;
                Ok(result)
            });
        drop(writer);

        match outcome {
            Ok(result) => {
                fs::rename(&partial, &artifact).map_err(|source| {
                    discard(&partial);
                    ScanError::ArchiveWrite {
                        path: artifact.clone(),
                        source,
                    }
                })?;
                debug!(
                    "Wrote {} PII line(s) of {} to {}",
                    result.lines_with_pii,
                    result.lines_processed,
                    artifact.display()
                );
                Ok(result)
            }
            Err(e) => {
                discard(&partial);
                Err(e)
            }
        }
    }

    /// Classify every line of a decompressed stream, writing PII-bearing records.
    fn scan_stream<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        writer: &mut W,
        input: &Path,
        output: &Path,
        cancel: &CancellationToken,
    ) -> Result<ArchiveResult> {
        let mut lines_processed = 0u64;
        let mut lines_with_pii = 0u64;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ScanError::ArchiveRead {
                    path: input.to_path_buf(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            if cancel.is_cancelled() {
                return Err(ScanError::Cancelled {
                    path: input.to_path_buf(),
                });
            }

            for raw in split_lines(&buf) {
                lines_processed += 1;
                let line = decode_dropping_invalid(raw);
                let result = self.catalog.classify_line(&line);
                if result.has_pii() {
                    lines_with_pii += 1;
                    result
                        .write_record(writer)
                        .map_err(|source| ScanError::ArchiveWrite {
                            path: output.to_path_buf(),
                            source,
                        })?;
                }
            }
        }

        Ok(ArchiveResult::completed(lines_processed, lines_with_pii))
    }
}

fn partial_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_os_string();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

fn discard(partial: &Path) {
    if let Err(e) = fs::remove_file(partial) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {}", partial.display(), e);
        }
    }
}

/// Split one `read_until` chunk into lines.
///
/// `\n`, `\r\n` and a lone `\r` all terminate a line.
fn split_lines(chunk: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = chunk.strip_suffix(b"\n").unwrap_or(chunk);
    let body = body.strip_suffix(b"\r").unwrap_or(body);
    body.split(|&b| b == b'\r')
}

/// Decode UTF-8, silently dropping invalid byte sequences.
fn decode_dropping_invalid(bytes: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    let mut decoded = String::with_capacity(bytes.len());
    let mut rest = bytes;
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(text) => {
                decoded.push_str(text);
                break;
            }
            Err(e) => {
                let (valid, invalid) = rest.split_at(e.valid_up_to());
                if let Ok(text) = std::str::from_utf8(valid) {
                    decoded.push_str(text);
                }
                let skip = e.error_len().unwrap_or(invalid.len());
                rest = &invalid[skip..];
            }
        }
    }
    Cow::Owned(decoded)
}
