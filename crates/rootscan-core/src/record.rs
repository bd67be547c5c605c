//! File and folder records produced by a walk.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Convert a filesystem timestamp into UTC.
pub fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

/// A regular file found under a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the root, or the base name for a single-file root.
    pub path: CompactString,

    /// Size in bytes.
    pub size: u64,

    /// Last modification time.
    pub modified_at: DateTime<Utc>,

    /// Root this file was found under.
    pub root: PathBuf,
}

impl FileRecord {
    /// Create a new file record.
    pub fn new(
        path: impl Into<CompactString>,
        size: u64,
        modified: SystemTime,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            path: path.into(),
            size,
            modified_at: to_utc(modified),
            root: root.into(),
        }
    }
}

/// Summary entry describing a scanned root itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    /// The root path as given by the caller.
    pub path: PathBuf,

    /// Aggregate size of everything under the root.
    pub size: u64,

    /// The root's own modification time.
    pub modified_at: DateTime<Utc>,
}

impl FolderEntry {
    /// Create a new folder entry.
    pub fn new(path: &Path, size: u64, modified: SystemTime) -> Self {
        Self {
            path: path.to_path_buf(),
            size,
            modified_at: to_utc(modified),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_file_record_creation() {
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let record = FileRecord::new("sub/file.txt", 100, modified, "/data/a");

        assert_eq!(record.path.as_str(), "sub/file.txt");
        assert_eq!(record.size, 100);
        assert_eq!(record.modified_at.timestamp(), 1_700_000_000);
        assert_eq!(record.root, PathBuf::from("/data/a"));
    }

    #[test]
    fn test_folder_entry_keeps_root_path() {
        let entry = FolderEntry::new(Path::new("/data/b"), 50, SystemTime::UNIX_EPOCH);
        assert_eq!(entry.path, PathBuf::from("/data/b"));
        assert_eq!(entry.size, 50);
        assert_eq!(entry.modified_at.timestamp(), 0);
    }
}
