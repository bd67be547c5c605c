//! Core types and configuration for rootscan.
//!
//! This crate provides the data model shared by the scanning engine and its
//! callers: file and folder records, per-root partial results, the merged
//! aggregate, structured scan issues, and the scan configuration.

mod config;
mod error;
mod record;
mod result;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{IssueScope, ScanError, ScanIssue};
pub use record::{FileRecord, FolderEntry, to_utc};
pub use result::{AggregateResult, PartialResult, ScanStats};
