//! Statistics collection
//!
//! Per-worker counters for the map and reduce stages of a generation run.
//!
//! Each worker owns its own [`WorkerStats`] and never shares it while running,
//! so plain integers are enough. The driver merges them afterwards through the
//! [`aggregator::StatisticsAggregator`].
//!
//! # Example
//!
//! ```
//! use plgraph::graph::EdgeSink;
//! use plgraph::stats::{TrackedSink, WorkerStats};
//!
//! let mut edges: Vec<(u64, u64)> = Vec::new();
//! let mut stats = WorkerStats::new();
//! {
//!     let mut sink = TrackedSink::new(&mut edges, &mut stats);
//!     sink.emit((0, 1)).unwrap();
//!     sink.emit((2, 2)).unwrap();
//! }
//! assert_eq!(stats.edges, 2);
//! assert_eq!(stats.self_loops, 1);
//! ```

pub mod aggregator;

use crate::graph::{Edge, EdgeSink};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counters for one worker
///
/// Map-stage and reduce-stage fields are filled by different tasks that share
/// a worker index; [`WorkerStats::merge`] folds them together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    // Map stage
    /// Nodes in the worker's block
    pub nodes: u64,
    /// Sum of sampled degrees over the block
    pub input_degree: u64,
    /// Degree units cancelled by the saturation pass
    pub cancelled: u64,
    /// Distinct credit entries handed to the shuffle
    pub credits_emitted: u64,
    /// Sum of those credits
    pub credit_total: u64,

    // Reduce stage
    /// Sources that reached an edge generator
    pub sources: u64,
    /// Edges written
    pub edges: u64,
    /// Edges with `source == target`
    pub self_loops: u64,

    /// Wall time spent in this worker's tasks, in microseconds
    pub elapsed_us: u64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single emitted edge
    #[inline]
    pub fn record_edge(&mut self, edge: Edge) {
        self.edges += 1;
        if edge.0 == edge.1 {
            self.self_loops += 1;
        }
    }

    pub fn record_elapsed(&mut self, elapsed: Duration) {
        self.elapsed_us += elapsed.as_micros() as u64;
    }

    /// Add another worker's counters into this one
    pub fn merge(&mut self, other: &WorkerStats) {
        self.nodes += other.nodes;
        self.input_degree += other.input_degree;
        self.cancelled += other.cancelled;
        self.credits_emitted += other.credits_emitted;
        self.credit_total += other.credit_total;
        self.sources += other.sources;
        self.edges += other.edges;
        self.self_loops += other.self_loops;
        self.elapsed_us += other.elapsed_us;
    }

    /// Edges written minus the sampled degree of the block (approximation drift)
    pub fn degree_drift(&self) -> i64 {
        self.edges as i64 - self.input_degree as i64
    }
}

/// Edge sink wrapper that records every edge into a [`WorkerStats`]
pub struct TrackedSink<'a> {
    inner: &'a mut dyn EdgeSink,
    stats: &'a mut WorkerStats,
}

impl<'a> TrackedSink<'a> {
    pub fn new(inner: &'a mut dyn EdgeSink, stats: &'a mut WorkerStats) -> Self {
        Self { inner, stats }
    }
}

impl EdgeSink for TrackedSink<'_> {
    fn emit(&mut self, edge: Edge) -> std::io::Result<()> {
        self.inner.emit(edge)?;
        self.stats.record_edge(edge);
        Ok(())
    }
}
