//! Concurrent multi-root scanning engine for rootscan.
//!
//! This crate walks any number of filesystem roots in parallel and merges
//! what it finds into a single [`AggregateResult`].
//!
//! # Overview
//!
//! - [`FolderWalker`] walks one root to completion, recording per-entry
//!   failures inline instead of aborting
//! - [`ScanDispatcher`] runs one walker per root on tokio's blocking pool
//!   and drains their results through a channel into one [`Aggregator`]
//! - [`EntrySource`] is the enumeration seam; [`JwalkSource`] is the
//!   filesystem implementation
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use rootscan_scan::{ScanConfig, ScanDispatcher};
//!
//! # async fn run() -> Result<(), rootscan_scan::ScanError> {
//! let dispatcher = ScanDispatcher::new(&ScanConfig::default())?;
//! let result = dispatcher
//!     .scan(&[PathBuf::from("/data/a"), PathBuf::from("/data/b")])
//!     .await;
//!
//! println!("Total size: {} bytes", result.stats.total_size);
//! println!("Total files: {}", result.stats.file_count);
//! # Ok(())
//! # }
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use rootscan_scan::{ScanConfig, ScanDispatcher};
//!
//! # fn run() -> Result<(), rootscan_scan::ScanError> {
//! let dispatcher = ScanDispatcher::new(&ScanConfig::default())?;
//! let mut progress_rx = dispatcher.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         println!("{}/{} roots done", progress.roots_completed, progress.roots_total);
//!     }
//! });
//! # Ok(())
//! # }
//! ```

mod aggregate;
mod dispatcher;
mod progress;
mod source;
mod walker;

pub use aggregate::{Aggregator, merge_all};
pub use dispatcher::ScanDispatcher;
pub use progress::ScanProgress;
pub use source::{Entries, EntryKind, EntrySource, JwalkSource, WalkEntry};
pub use walker::FolderWalker;

// Re-export core types for convenience
pub use rootscan_core::{
    AggregateResult, FileRecord, FolderEntry, IssueScope, PartialResult, ScanConfig, ScanError,
    ScanIssue, ScanStats,
};
