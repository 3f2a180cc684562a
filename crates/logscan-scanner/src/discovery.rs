//! Archive discovery.
//!
//! Walks an input root and pairs every compressed archive with the output
//! directory that mirrors its position under the root.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// One archive to process and where its extract goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTask {
    /// Path of the compressed input archive
    pub input: PathBuf,
    /// Directory receiving the extract, mirroring `input`'s parent
    pub output_dir: PathBuf,
}

/// Whether `path`'s file name ends with `.<extension>`.
#[must_use]
pub fn is_archive(path: &Path, extension: &str) -> bool {
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(&suffix))
}

/// Recursively collect archives under `root`, sorted by input path.
///
/// Symlinked directories are not followed; symlinked files are included.
/// Unreadable subdirectories are logged and skipped. Only a failure to read
/// `root` itself is returned as an error.
pub async fn discover_archives(
    root: &Path,
    output_root: &Path,
    extension: &str,
) -> Result<Vec<ArchiveTask>> {
    let mut tasks = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if dir == root => return Err(e.into()),
            Err(e) => {
                warn!("Failed to read directory {}: {}", dir.display(), e);
                continue;
            }
        };

        let relative = dir.strip_prefix(root).unwrap_or(Path::new(""));
        let output_dir = output_root.join(relative);

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to list {}: {}", dir.display(), e);
                    break;
                }
            };
            let path = entry.path();

            let file_type = match entry.file_type().await {
                Ok(t) => t,
                Err(e) => {
                    debug!("Failed to read file type for {}: {}", path.display(), e);
                    continue;
                }
            };

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() || (file_type.is_symlink() && is_file(&path).await) {
                if is_archive(&path, extension) {
                    tasks.push(ArchiveTask {
                        input: path,
                        output_dir: output_dir.clone(),
                    });
                }
            } else if file_type.is_symlink() {
                debug!("Skipping symlink: {}", path.display());
            }
        }
    }

    tasks.sort_by(|a, b| a.input.cmp(&b.input));
    debug!("Discovered {} archive(s) under {}", tasks.len(), root.display());
    Ok(tasks)
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}
