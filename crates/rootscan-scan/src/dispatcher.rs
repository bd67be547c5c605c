//! Concurrent multi-root scanning.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use rootscan_core::{AggregateResult, PartialResult, ScanConfig, ScanError};

use crate::aggregate::Aggregator;
use crate::progress::ScanProgress;
use crate::source::{EntrySource, JwalkSource};
use crate::walker::FolderWalker;

/// Runs one walker per root and merges their results.
pub struct ScanDispatcher<S = JwalkSource> {
    walker: Arc<FolderWalker<S>>,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl ScanDispatcher<JwalkSource> {
    /// Create a dispatcher over the real filesystem.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        Ok(Self::with_source(JwalkSource::new(config)?))
    }
}

impl<S: EntrySource + 'static> ScanDispatcher<S> {
    /// Create a dispatcher over the given entry source.
    pub fn with_source(source: S) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            walker: Arc::new(FolderWalker::new(source)),
            progress_tx,
        }
    }

    /// Subscribe to per-root completion updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan every root concurrently and return the merged result.
    ///
    /// Root-level and entry-level failures are carried inside the result;
    /// this never fails as a whole. Duplicate roots are scanned once per
    /// occurrence.
    pub async fn scan(&self, roots: &[PathBuf]) -> AggregateResult {
        let start = Instant::now();
        let total = roots.len();
        if total == 0 {
            return AggregateResult::new();
        }

        // Capacity covers every root, so senders never wait on the consumer.
        let (tx, mut rx) = mpsc::channel::<PartialResult>(total);
        let mut handles = Vec::with_capacity(total);

        for root in roots {
            let walker = Arc::clone(&self.walker);
            let tx = tx.clone();
            let task_root = root.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let partial = walk_or_report(&walker, &task_root);
                let _ = tx.blocking_send(partial);
            });
            handles.push((root.clone(), handle));
        }
        drop(tx);

        let mut aggregator = Aggregator::new();
        let mut progress = ScanProgress::new(total);

        while let Some(partial) = rx.recv().await {
            progress.last_root = partial.root.clone();
            aggregator.merge(partial);
            self.report(&mut progress, &aggregator, start);
        }

        // A walker that panicked never delivered; its root still gets a result.
        for (root, handle) in handles {
            if let Err(err) = handle.await {
                let err = ScanError::Other {
                    message: format!("Walker task failed: {err}"),
                };
                warn!(root = %root.display(), error = %err, "root could not be scanned");
                progress.last_root = root.clone();
                aggregator.merge(PartialResult::root_failure(root, &err));
                self.report(&mut progress, &aggregator, start);
            }
        }

        debug_assert_eq!(aggregator.merged(), total);

        let stats = aggregator.stats();
        debug!(
            roots = total,
            files = stats.file_count,
            bytes = stats.total_size,
            errors = stats.error_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan finished"
        );

        aggregator.finish(start.elapsed())
    }

    fn report(&self, progress: &mut ScanProgress, aggregator: &Aggregator, start: Instant) {
        let stats = aggregator.stats();
        progress.roots_completed = aggregator.merged();
        progress.files_scanned = stats.file_count;
        progress.bytes_scanned = stats.total_size;
        progress.errors_count = stats.error_count;
        progress.elapsed = start.elapsed();
        let _ = self.progress_tx.send(progress.clone());
    }
}

/// Walk a root, turning a root-level failure into an empty result that
/// carries the failure.
fn walk_or_report<S: EntrySource>(walker: &FolderWalker<S>, root: &Path) -> PartialResult {
    match walker.walk(root) {
        Ok(partial) => partial,
        Err(err) => {
            warn!(root = %root.display(), error = %err, "root could not be scanned");
            PartialResult::root_failure(root, &err)
        }
    }
}
