//! Per-root and aggregate scan results.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanIssue};
use crate::record::{FileRecord, FolderEntry};

/// Summary counters for a scan scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanStats {
    /// Number of regular files.
    pub file_count: u64,
    /// Sum of file sizes in bytes.
    pub total_size: u64,
    /// Number of directories below the roots (roots themselves excluded).
    pub dir_count: u64,
    /// Number of recorded issues.
    pub error_count: u64,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file of the given size.
    pub fn record_file(&mut self, size: u64) {
        self.file_count += 1;
        self.total_size += size;
    }

    /// Record a directory.
    pub fn record_dir(&mut self) {
        self.dir_count += 1;
    }

    /// Record an issue.
    pub fn record_error(&mut self) {
        self.error_count += 1;
    }

    /// Field-wise sum of two stats.
    pub fn merge(&mut self, other: &ScanStats) {
        self.file_count += other.file_count;
        self.total_size += other.total_size;
        self.dir_count += other.dir_count;
        self.error_count += other.error_count;
    }
}

/// Everything a single walker found under one root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialResult {
    /// Root that was scanned.
    pub root: PathBuf,
    /// Regular files found.
    pub files: Vec<FileRecord>,
    /// Entry for the root itself (absent when the root failed).
    pub folder: Option<FolderEntry>,
    /// Issues encountered.
    pub issues: Vec<ScanIssue>,
    /// Counters for this root.
    pub stats: ScanStats,
}

impl PartialResult {
    /// Create an empty result for a root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
            folder: None,
            issues: Vec::new(),
            stats: ScanStats::new(),
        }
    }

    /// Result for a root that could not be scanned at all.
    pub fn root_failure(root: impl Into<PathBuf>, error: &ScanError) -> Self {
        let mut partial = Self::new(root);
        let issue = ScanIssue::root(&partial.root, error);
        partial.record_issue(issue);
        partial
    }

    /// Add a file.
    pub fn record_file(&mut self, file: FileRecord) {
        self.stats.record_file(file.size);
        self.files.push(file);
    }

    /// Count a directory.
    pub fn record_dir(&mut self) {
        self.stats.record_dir();
    }

    /// Add an issue.
    pub fn record_issue(&mut self, issue: ScanIssue) {
        self.stats.record_error();
        self.issues.push(issue);
    }

    /// Synthesize the folder entry for the root from what was accumulated.
    pub fn finish(mut self, root_modified: SystemTime) -> Self {
        self.folder = Some(FolderEntry::new(&self.root, self.stats.total_size, root_modified));
        self
    }

    /// Check if the root failed before anything was scanned.
    pub fn is_root_failure(&self) -> bool {
        self.issues.iter().any(ScanIssue::is_root)
    }
}

/// Merged output of all roots of one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateResult {
    /// All files, concatenated in delivery order.
    pub files: Vec<FileRecord>,
    /// One entry per successfully scanned root.
    pub folders: Vec<FolderEntry>,
    /// Root-level and entry-level issues.
    pub errors: Vec<ScanIssue>,
    /// Field-wise sum of every root's stats.
    pub stats: ScanStats,
    /// Wall-clock duration of the scan.
    pub scan_duration: Duration,
}

impl AggregateResult {
    /// Create an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one partial result in.
    pub fn absorb(&mut self, partial: PartialResult) {
        self.stats.merge(&partial.stats);
        self.files.extend(partial.files);
        self.folders.extend(partial.folder);
        self.errors.extend(partial.issues);
    }

    /// Concatenate two aggregates, `self` first.
    pub fn combine(mut self, other: AggregateResult) -> Self {
        self.stats.merge(&other.stats);
        self.files.extend(other.files);
        self.folders.extend(other.folders);
        self.errors.extend(other.errors);
        self.scan_duration = self.scan_duration.max(other.scan_duration);
        self
    }

    /// Issues that stopped a whole root.
    pub fn root_errors(&self) -> impl Iterator<Item = &ScanIssue> {
        self.errors.iter().filter(|e| e.is_root())
    }

    /// Find the folder entry for a root.
    pub fn folder(&self, root: &Path) -> Option<&FolderEntry> {
        self.folders.iter().find(|f| f.path == root)
    }

    /// Check if there were any issues.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl From<PartialResult> for AggregateResult {
    fn from(partial: PartialResult) -> Self {
        let mut aggregate = Self::new();
        aggregate.absorb(partial);
        aggregate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(root: &str, sizes: &[u64], dirs: u64, issues: usize) -> PartialResult {
        let mut p = PartialResult::new(root);
        for (i, size) in sizes.iter().enumerate() {
            p.record_file(FileRecord::new(format!("f{i}"), *size, SystemTime::UNIX_EPOCH, root));
        }
        for _ in 0..dirs {
            p.record_dir();
        }
        for i in 0..issues {
            p.record_issue(ScanIssue::entry(format!("{root}/bad{i}"), "denied"));
        }
        p.finish(SystemTime::UNIX_EPOCH)
    }

    #[test]
    fn test_scan_stats_default() {
        let stats = ScanStats::default();
        assert_eq!(stats.file_count, 0);
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.dir_count, 0);
        assert_eq!(stats.error_count, 0);
    }

    #[test]
    fn test_partial_tracks_stats() {
        let p = partial("/a", &[100, 200], 1, 1);

        assert_eq!(p.stats.file_count, 2);
        assert_eq!(p.stats.total_size, 300);
        assert_eq!(p.stats.dir_count, 1);
        assert_eq!(p.stats.error_count, 1);
        assert_eq!(p.folder.as_ref().map(|f| f.size), Some(300));
    }

    #[test]
    fn test_root_failure_is_empty_with_one_issue() {
        let err = ScanError::NotFound {
            path: PathBuf::from("/missing"),
        };
        let p = PartialResult::root_failure("/missing", &err);

        assert!(p.files.is_empty());
        assert!(p.folder.is_none());
        assert_eq!(p.issues.len(), 1);
        assert_eq!(p.stats.error_count, 1);
        assert!(p.is_root_failure());
    }

    #[test]
    fn test_absorb_sums_stats() {
        let mut agg = AggregateResult::new();
        agg.absorb(partial("/a", &[100, 100, 100], 1, 0));
        agg.absorb(partial("/b", &[50], 0, 2));

        assert_eq!(agg.stats.file_count, 4);
        assert_eq!(agg.stats.total_size, 350);
        assert_eq!(agg.stats.dir_count, 1);
        assert_eq!(agg.stats.error_count, 2);
        assert_eq!(agg.files.len(), 4);
        assert_eq!(agg.folders.len(), 2);
        assert_eq!(agg.errors.len(), 2);
        assert_eq!(agg.folder(Path::new("/b")).map(|f| f.size), Some(50));
    }

    #[test]
    fn test_combine_matches_absorb() {
        let mut sequential = AggregateResult::new();
        sequential.absorb(partial("/a", &[1, 2], 3, 1));
        sequential.absorb(partial("/b", &[4], 0, 0));

        let combined = AggregateResult::from(partial("/a", &[1, 2], 3, 1))
            .combine(AggregateResult::from(partial("/b", &[4], 0, 0)));

        assert_eq!(sequential.stats, combined.stats);
        assert_eq!(sequential.files, combined.files);
        assert_eq!(sequential.folders, combined.folders);
    }
}
