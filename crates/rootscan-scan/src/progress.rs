//! Scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Progress information published each time a root completes.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of roots merged so far.
    pub roots_completed: usize,
    /// Number of roots dispatched.
    pub roots_total: usize,
    /// Number of files merged so far.
    pub files_scanned: u64,
    /// Total bytes merged so far.
    pub bytes_scanned: u64,
    /// Number of issues recorded so far.
    pub errors_count: u64,
    /// Root that just completed.
    pub last_root: PathBuf,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new(roots_total: usize) -> Self {
        Self {
            roots_completed: 0,
            roots_total,
            files_scanned: 0,
            bytes_scanned: 0,
            errors_count: 0,
            last_root: PathBuf::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Check if every dispatched root has been merged.
    pub fn is_complete(&self) -> bool {
        self.roots_completed >= self.roots_total
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let mut progress = ScanProgress::new(2);
        assert_eq!(progress.files_per_second(), 0.0);

        progress.files_scanned = 100;
        progress.elapsed = Duration::from_secs(2);
        assert_eq!(progress.files_per_second(), 50.0);
    }

    #[test]
    fn test_completion() {
        let mut progress = ScanProgress::new(2);
        assert!(!progress.is_complete());
        progress.roots_completed = 2;
        assert!(progress.is_complete());
        assert!(ScanProgress::default().is_complete());
    }
}
