//! Folding per-root results into one aggregate.

use std::time::Duration;

use rayon::prelude::*;

use rootscan_core::{AggregateResult, PartialResult, ScanStats};

/// Sequential fold target owned by the single consumer of a scan.
#[derive(Debug, Default)]
pub struct Aggregator {
    result: AggregateResult,
    merged: usize,
}

impl Aggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one partial result in.
    pub fn merge(&mut self, partial: PartialResult) {
        self.result.absorb(partial);
        self.merged += 1;
    }

    /// Number of partials merged so far.
    pub fn merged(&self) -> usize {
        self.merged
    }

    /// Running totals.
    pub fn stats(&self) -> &ScanStats {
        &self.result.stats
    }

    /// Finish with the total scan duration.
    pub fn finish(mut self, scan_duration: Duration) -> AggregateResult {
        self.result.scan_duration = scan_duration;
        self.result
    }
}

/// Merge an already collected set of partials.
///
/// List order follows the input order; totals do not depend on it.
pub fn merge_all(partials: Vec<PartialResult>) -> AggregateResult {
    partials
        .into_par_iter()
        .map(AggregateResult::from)
        .reduce(AggregateResult::new, AggregateResult::combine)
}
