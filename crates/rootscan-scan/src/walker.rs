//! Single-root traversal.

use std::path::Path;
use std::time::Instant;

use tracing::debug;

use rootscan_core::{FileRecord, PartialResult, ScanConfig, ScanError, ScanIssue};

use crate::source::{EntryKind, EntrySource, JwalkSource};

/// Walks one root to completion and produces its partial result.
#[derive(Debug)]
pub struct FolderWalker<S = JwalkSource> {
    source: S,
}

impl FolderWalker<JwalkSource> {
    /// Create a walker over the real filesystem.
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        Ok(Self::new(JwalkSource::new(config)?))
    }
}

impl<S: EntrySource> FolderWalker<S> {
    /// Create a walker over the given entry source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Walk a root.
    ///
    /// A failure to stat `root`, or an enumeration that stops early, is
    /// returned as an error; every other failure below it is recorded in
    /// the result and the walk continues.
    pub fn walk(&self, root: &Path) -> Result<PartialResult, ScanError> {
        let start = Instant::now();
        let mut partial = PartialResult::new(root);

        let partial = match self.source.stat(root)? {
            EntryKind::File { size, modified } => {
                let name = root
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| root.to_string_lossy().to_string());
                partial.record_file(FileRecord::new(name, size, modified, root));
                partial.finish(modified)
            }
            EntryKind::Directory { modified } => {
                for item in self.source.entries(root) {
                    let entry = match item {
                        Ok(entry) => entry,
                        Err(issue) if issue.is_root() => {
                            return Err(ScanError::Other {
                                message: format!(
                                    "Enumeration of {} stopped: {}",
                                    root.display(),
                                    issue.message
                                ),
                            });
                        }
                        Err(issue) => {
                            partial.record_issue(issue);
                            continue;
                        }
                    };

                    match entry.kind {
                        EntryKind::Directory { .. } => partial.record_dir(),
                        EntryKind::File { size, modified } => {
                            let path = entry.relative.to_string_lossy().to_string();
                            partial.record_file(FileRecord::new(path, size, modified, root));
                        }
                        EntryKind::Symlink { target, broken: true } => {
                            let path = root.join(&entry.relative);
                            partial.record_issue(ScanIssue::broken_symlink(
                                path,
                                &target.to_string_lossy(),
                            ));
                        }
                        EntryKind::Symlink { .. } | EntryKind::Other => {}
                    }
                }
                partial.finish(modified)
            }
            EntryKind::Symlink { .. } | EntryKind::Other => {
                return Err(ScanError::Other {
                    message: format!("Not a file or directory: {}", root.display()),
                });
            }
        };

        debug!(
            root = %root.display(),
            files = partial.stats.file_count,
            dirs = partial.stats.dir_count,
            errors = partial.stats.error_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "walk finished"
        );

        Ok(partial)
    }
}
