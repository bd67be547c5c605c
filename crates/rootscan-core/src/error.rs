//! Error types for scanning operations.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that prevent a root from being scanned at all.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Where a scan issue happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueScope {
    /// The root itself could not be scanned.
    Root,
    /// One entry inside a root's tree failed.
    Entry,
}

/// Non-fatal problem recorded during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanIssue {
    /// Root-level or entry-level.
    pub scope: IssueScope,
    /// Path where the issue occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
}

impl ScanIssue {
    /// Create an entry-level issue.
    pub fn entry(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            scope: IssueScope::Entry,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a root-level issue from the error that stopped the root.
    pub fn root(path: impl Into<PathBuf>, error: &ScanError) -> Self {
        Self {
            scope: IssueScope::Root,
            path: path.into(),
            message: error.to_string(),
        }
    }

    /// Create an issue for a root whose enumeration stopped early.
    pub fn aborted(root: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            scope: IssueScope::Root,
            path: root.into(),
            message: message.into(),
        }
    }

    /// Create a broken symlink issue.
    pub fn broken_symlink(path: impl Into<PathBuf>, target: &str) -> Self {
        let path = path.into();
        Self {
            message: format!("Broken symlink -> {target}"),
            path,
            scope: IssueScope::Entry,
        }
    }

    /// Check if this issue stopped a whole root.
    pub fn is_root(&self) -> bool {
        self.scope == IssueScope::Root
    }
}

impl fmt::Display for ScanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            IssueScope::Root => write!(f, "cannot scan {}: {}", self.path.display(), self.message),
            IssueScope::Entry => write!(f, "{}: {}", self.path.display(), self.message),
        }
    }
}
