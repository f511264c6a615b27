//! Statistics aggregation
//!
//! Collects [`WorkerStats`] from every map and reduce task and provides both
//! an aggregate and a per-worker view. Adding stats for a worker index that is
//! already present merges them, so the map and reduce halves of a worker can
//! be reported separately.
//!
//! # Example
//!
//! ```
//! use plgraph::stats::{WorkerStats, aggregator::StatisticsAggregator};
//!
//! let mut aggregator = StatisticsAggregator::new();
//! aggregator.add_worker(0, WorkerStats { nodes: 5, ..Default::default() });
//! aggregator.add_worker(1, WorkerStats { nodes: 7, ..Default::default() });
//! aggregator.add_worker(1, WorkerStats { edges: 3, ..Default::default() });
//!
//! let aggregate = aggregator.aggregate();
//! assert_eq!(aggregate.nodes, 12);
//! assert_eq!(aggregate.edges, 3);
//! assert_eq!(aggregator.num_workers(), 2);
//! ```

use crate::stats::WorkerStats;
use std::collections::BTreeMap;

/// Statistics aggregator for multiple workers
#[derive(Debug, Default, Clone)]
pub struct StatisticsAggregator {
    /// Per-worker statistics (worker_id → stats), ordered by id
    workers: BTreeMap<usize, WorkerStats>,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add statistics from a worker, merging with any already recorded
    ///
    /// # Arguments
    ///
    /// * `worker_id` - ID of the worker
    /// * `stats` - Statistics from the worker
    pub fn add_worker(&mut self, worker_id: usize, stats: WorkerStats) {
        self.workers
            .entry(worker_id)
            .and_modify(|existing| existing.merge(&stats))
            .or_insert(stats);
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Sum of all workers
    pub fn aggregate(&self) -> WorkerStats {
        let mut aggregate = WorkerStats::new();
        for stats in self.workers.values() {
            aggregate.merge(stats);
        }
        aggregate
    }

    pub fn worker_stats(&self, worker_id: usize) -> Option<&WorkerStats> {
        self.workers.get(&worker_id)
    }

    /// Per-worker statistics in ascending worker order
    pub fn per_worker(&self) -> impl Iterator<Item = (usize, &WorkerStats)> {
        self.workers.iter().map(|(&id, stats)| (id, stats))
    }
}
