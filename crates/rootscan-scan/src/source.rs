//! Directory enumeration consumed by the walker.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use globset::GlobSet;
use jwalk::{DirEntry, Parallelism, WalkDir};

use rootscan_core::{ScanConfig, ScanError, ScanIssue};

/// What an enumerated path turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File {
        /// Size in bytes.
        size: u64,
        /// Last modification time.
        modified: SystemTime,
    },
    /// Directory.
    Directory {
        /// Last modification time.
        modified: SystemTime,
    },
    /// Symbolic link that was not followed.
    Symlink {
        /// Link target path.
        target: PathBuf,
        /// Whether the link target is missing.
        broken: bool,
    },
    /// Sockets, devices, FIFOs.
    Other,
}

/// One entry below a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path relative to the root being walked.
    pub relative: PathBuf,
    /// Entry type and metadata.
    pub kind: EntryKind,
}

impl WalkEntry {
    /// Create a new entry.
    pub fn new(relative: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            relative: relative.into(),
            kind,
        }
    }
}

/// Iterator over the entries below one root.
pub type Entries<'a> = Box<dyn Iterator<Item = Result<WalkEntry, ScanIssue>> + 'a>;

/// Capability to inspect a path and enumerate everything beneath it.
///
/// Failures on individual entries are yielded inline so enumeration of
/// siblings continues.
pub trait EntrySource: Send + Sync {
    /// Stat a root path, following symlinks.
    fn stat(&self, path: &Path) -> Result<EntryKind, ScanError>;

    /// Enumerate every entry below `root`, excluding `root` itself.
    ///
    /// A root-scoped issue means enumeration stopped early and the walk
    /// must be treated as failed.
    fn entries<'a>(&'a self, root: &Path) -> Entries<'a>;
}

/// Entry source backed by jwalk.
#[derive(Debug, Clone)]
pub struct JwalkSource {
    config: ScanConfig,
    ignore: GlobSet,
}

impl JwalkSource {
    /// Create a source for the given configuration.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        Ok(Self {
            ignore: config.ignore_set()?,
            config: config.clone(),
        })
    }

    fn parallelism(&self) -> Parallelism {
        // Stay off the global rayon pool: its busy check aborts whole walks.
        match self.config.threads {
            0 | 1 => Parallelism::Serial,
            n => Parallelism::RayonNewPool(n),
        }
    }
}

impl EntrySource for JwalkSource {
    fn stat(&self, path: &Path) -> Result<EntryKind, ScanError> {
        let metadata = std::fs::metadata(path).map_err(|e| ScanError::io(path, e))?;
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Ok(if metadata.is_dir() {
            EntryKind::Directory { modified }
        } else if metadata.is_file() {
            EntryKind::File {
                size: metadata.len(),
                modified,
            }
        } else {
            EntryKind::Other
        })
    }

    fn entries<'a>(&'a self, root: &Path) -> Entries<'a> {
        let max_depth = self
            .config
            .max_depth
            .map(|d| d as usize)
            .unwrap_or(usize::MAX);

        let mut walker = WalkDir::new(root)
            .parallelism(self.parallelism())
            .skip_hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_symlinks)
            .min_depth(0)
            .max_depth(max_depth);

        if !self.ignore.is_empty() {
            let ignore = self.ignore.clone();
            walker = walker.process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|child| match child {
                    Ok(entry) => !ignore.is_match(entry.file_name()),
                    Err(_) => true,
                });
            });
        }

        let root = root.to_path_buf();
        Box::new(
            walker
                .into_iter()
                .flat_map(move |result| convert(&root, result).into_iter().flatten()),
        )
    }
}

type Item = Result<WalkEntry, ScanIssue>;

/// Turn one jwalk result into at most an entry plus an issue for a
/// directory whose children could not be read. The root itself only
/// contributes its read error.
fn convert(root: &Path, result: jwalk::Result<DirEntry<((), ())>>) -> [Option<Item>; 2] {
    let entry = match result {
        Ok(entry) => entry,
        Err(err) => {
            let issue = match err.path() {
                Some(path) if !err.is_busy() => ScanIssue::entry(path, err.to_string()),
                // Enumeration stopped; nothing after this is trustworthy.
                _ => ScanIssue::aborted(root, err.to_string()),
            };
            return [Some(Err(issue)), None];
        }
    };

    let path = entry.path();
    let children_error = entry
        .read_children_error
        .as_ref()
        .map(|err| Err(ScanIssue::entry(&path, err.to_string())));

    if entry.depth == 0 {
        return [None, children_error];
    }

    let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
    let file_type = entry.file_type();

    let item = if file_type.is_dir() {
        let modified = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        Ok(WalkEntry::new(relative, EntryKind::Directory { modified }))
    } else if file_type.is_file() {
        match entry.metadata() {
            Ok(metadata) => Ok(WalkEntry::new(
                relative,
                EntryKind::File {
                    size: metadata.len(),
                    modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                },
            )),
            Err(err) => Err(ScanIssue::entry(&path, err.to_string())),
        }
    } else if file_type.is_symlink() {
        let target = std::fs::read_link(&path).unwrap_or_default();
        let broken = std::fs::metadata(&path).is_err();
        Ok(WalkEntry::new(relative, EntryKind::Symlink { target, broken }))
    } else {
        Ok(WalkEntry::new(relative, EntryKind::Other))
    };

    [Some(item), children_error]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn collect(source: &JwalkSource, root: &Path) -> (Vec<WalkEntry>, Vec<ScanIssue>) {
        let mut entries = Vec::new();
        let mut issues = Vec::new();
        for item in source.entries(root) {
            match item {
                Ok(entry) => entries.push(entry),
                Err(issue) => issues.push(issue),
            }
        }
        (entries, issues)
    }

    #[test]
    fn test_stat_reports_kind() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("f.txt"), "hello").unwrap();
        let source = JwalkSource::new(&ScanConfig::default()).unwrap();

        assert!(matches!(
            source.stat(temp.path()).unwrap(),
            EntryKind::Directory { .. }
        ));
        assert!(matches!(
            source.stat(&temp.path().join("f.txt")).unwrap(),
            EntryKind::File { size: 5, .. }
        ));
        assert!(matches!(
            source.stat(&temp.path().join("missing")),
            Err(ScanError::NotFound { .. })
        ));
    }

    #[test]
    fn test_entries_exclude_root_and_are_relative() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/inner.txt"), "abc").unwrap();
        let source = JwalkSource::new(&ScanConfig::default()).unwrap();

        let (entries, issues) = collect(&source, temp.path());
        let mut paths: Vec<_> = entries.iter().map(|e| e.relative.clone()).collect();
        paths.sort();

        assert!(issues.is_empty());
        assert_eq!(paths, vec![PathBuf::from("sub"), PathBuf::from("sub/inner.txt")]);
    }

    #[test]
    fn test_ignore_patterns_prune_subtrees() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("node_modules")).unwrap();
        fs::write(temp.path().join("node_modules/dep.js"), "x").unwrap();
        fs::write(temp.path().join("keep.txt"), "x").unwrap();
        fs::write(temp.path().join("drop.log"), "x").unwrap();

        let config = ScanConfig::builder()
            .ignore_patterns(vec!["node_modules".to_string(), "*.log".to_string()])
            .build()
            .unwrap();
        let source = JwalkSource::new(&config).unwrap();

        let (entries, _) = collect(&source, temp.path());
        let paths: Vec<_> = entries.iter().map(|e| e.relative.clone()).collect();

        assert_eq!(paths, vec![PathBuf::from("keep.txt")]);
    }

    #[test]
    fn test_skip_hidden() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".hidden"), "x").unwrap();
        fs::write(temp.path().join("shown"), "x").unwrap();

        let config = ScanConfig::builder().include_hidden(false).build().unwrap();
        let source = JwalkSource::new(&config).unwrap();

        let (entries, _) = collect(&source, temp.path());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].relative, PathBuf::from("shown"));
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_flagged() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone"), temp.path().join("link")).unwrap();
        let source = JwalkSource::new(&ScanConfig::default()).unwrap();

        let (entries, _) = collect(&source, temp.path());
        assert_eq!(entries.len(), 1);
        assert!(matches!(
            entries[0].kind,
            EntryKind::Symlink { broken: true, .. }
        ));
    }
}
