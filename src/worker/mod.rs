//! Map and reduce tasks
//!
//! A [`Worker`] is one execution unit of the generation job. It runs at most
//! one map task and one reduce task, both keyed by its explicit worker index.
//!
//! # Pipeline
//!
//! 1. **Map**: load the broadcast degree vector, plan the worker's block and
//!    turn it into degree credits. The exact path credits every node with a
//!    positive degree; the approximate path saturates a private copy of the
//!    block first and credits the residuals. Credits are combined locally in a
//!    [`CreditTable`] and split into one table per reducer.
//! 2. **Shuffle**: the driver merges the tables addressed to each reducer.
//! 3. **Reduce**: sum the credits per node and run the path's edge generator
//!    into an [`EdgeSink`].
//!
//! Routing decides which reducer sees a node. The exact path spreads nodes by
//! `node % reduce_tasks`. The approximate path sends each node to the reducer
//! with the same index as the block owning it, so local generation always has
//! the node's own block at hand.
//!
//! # Example
//!
//! ```
//! use plgraph::broadcast::{stage_degrees, InMemoryBroadcast};
//! use plgraph::generator::{EdgeDirection, GeneratorMode};
//! use plgraph::graph::DegreeVector;
//! use plgraph::worker::{JobPlan, Worker};
//! use std::sync::Arc;
//!
//! let channel = InMemoryBroadcast::new();
//! stage_degrees(&channel, &DegreeVector::new(vec![2, 1, 0, 1])).unwrap();
//!
//! let plan = Arc::new(JobPlan::new(4, 1, 1, GeneratorMode::Exact, EdgeDirection::Forward));
//! let worker = Worker::new(0, Arc::clone(&plan));
//! let map = worker.run_map(&channel).unwrap();
//!
//! let mut edges: Vec<(u64, u64)> = Vec::new();
//! let stats = worker.run_reduce(map.partitions, &mut edges).unwrap();
//! assert_eq!(edges, vec![(0, 1), (0, 2), (1, 2), (3, 0)]);
//! assert_eq!(stats.edges, 4);
//! ```

use crate::broadcast::{load_degrees, BroadcastChannel};
use crate::config::Config;
use crate::error::{GenError, GenResult};
use crate::generator::{
    generate_global, generate_local, saturate_block, CreditTable, DegreeCredit, EdgeDirection,
    GeneratorMode,
};
use crate::graph::{DegreeVector, EdgeSink, Node};
use crate::partition::{self, Block};
use crate::stats::{TrackedSink, WorkerStats};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

/// Parameters shared by every task of one generation job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPlan {
    pub num_nodes: u64,
    pub map_tasks: usize,
    pub reduce_tasks: usize,
    pub mode: GeneratorMode,
    pub direction: EdgeDirection,
}

impl JobPlan {
    /// # Arguments
    ///
    /// * `num_nodes` - Total node count N
    /// * `map_tasks` - Number of map workers (blocks)
    /// * `reduce_tasks` - Number of reducers; the approximate path always
    ///   uses `map_tasks` reducers regardless of this value
    /// * `mode` - Edge assignment path
    /// * `direction` - Back edge emission for the approximate path
    pub fn new(
        num_nodes: u64,
        map_tasks: usize,
        reduce_tasks: usize,
        mode: GeneratorMode,
        direction: EdgeDirection,
    ) -> Self {
        let reduce_tasks = match mode {
            GeneratorMode::Exact => reduce_tasks,
            GeneratorMode::Approximate => map_tasks,
        };
        Self {
            num_nodes,
            map_tasks,
            reduce_tasks,
            mode,
            direction,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.graph.num_nodes as u64,
            config.map_tasks(),
            config.reduce_tasks(),
            config.graph.mode,
            config.graph.direction,
        )
    }

    /// Reducer index responsible for `node`
    pub fn route(&self, node: Node) -> usize {
        let reducers = self.reduce_tasks.max(1);
        match self.mode {
            GeneratorMode::Exact => (node % reducers as u64) as usize,
            GeneratorMode::Approximate => {
                partition::owner_of(node, self.num_nodes, self.map_tasks).unwrap_or(reducers - 1)
            }
        }
    }

    /// Block of the map worker with index `worker_index`
    pub fn block(&self, worker_index: usize) -> GenResult<Block> {
        partition::plan(self.num_nodes, self.map_tasks, worker_index)
    }
}

/// Result of one map task
#[derive(Debug)]
pub struct MapOutput {
    pub worker_index: usize,
    /// One table per reducer, indexed by reducer
    pub partitions: Vec<CreditTable>,
    pub stats: WorkerStats,
}

/// One execution unit of the generation job
#[derive(Debug, Clone)]
pub struct Worker {
    index: usize,
    plan: Arc<JobPlan>,
}

impl Worker {
    pub fn new(index: usize, plan: Arc<JobPlan>) -> Self {
        Self { index, plan }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Run the map task of this worker
    ///
    /// # Errors
    ///
    /// Fails if the degree buffer is missing or malformed, or if the worker
    /// index is not a valid map task.
    #[instrument(skip(self, channel), fields(worker = self.index))]
    pub fn run_map(&self, channel: &dyn BroadcastChannel) -> GenResult<MapOutput> {
        let started = Instant::now();
        let block = self.plan.block(self.index)?;
        let degrees = load_degrees(channel, self.plan.num_nodes as usize)?;

        let mut stats = WorkerStats::new();
        let table = self.map_block(&degrees, block, &mut stats);
        stats.credits_emitted = table.len() as u64;
        stats.credit_total = table.total();

        let partitions = table.split_by(self.plan.reduce_tasks, |node| self.plan.route(node));
        stats.record_elapsed(started.elapsed());

        debug!(
            %block,
            credits = stats.credits_emitted,
            cancelled = stats.cancelled,
            "map task finished"
        );

        Ok(MapOutput {
            worker_index: self.index,
            partitions,
            stats,
        })
    }

    /// Credits of one block, combined per node
    fn map_block(&self, degrees: &DegreeVector, block: Block, stats: &mut WorkerStats) -> CreditTable {
        let slice = degrees.slice(block);
        stats.nodes = slice.len() as u64;
        stats.input_degree = slice.iter().map(|&d| d as u64).sum();

        match self.plan.mode {
            GeneratorMode::Exact => slice
                .iter()
                .zip(block.nodes())
                .filter(|&(&degree, _)| degree > 0)
                .map(|(&degree, node)| DegreeCredit::new(node, degree as u64))
                .collect(),
            GeneratorMode::Approximate => {
                let saturation = saturate_block(degrees, block);
                stats.cancelled = saturation.cancelled;
                saturation
                    .residual
                    .iter()
                    .zip(block.nodes())
                    .filter(|&(&residual, _)| residual > 0)
                    .map(|(&residual, node)| DegreeCredit::new(node, residual as u64))
                    .collect()
            }
        }
    }

    /// Run the reduce task of this worker over all tables routed to it
    ///
    /// # Errors
    ///
    /// Fails if the sink cannot be written or a credited node lies outside
    /// every block.
    #[instrument(skip(self, inputs, sink), fields(worker = self.index))]
    pub fn run_reduce<I>(&self, inputs: I, sink: &mut dyn EdgeSink) -> GenResult<WorkerStats>
    where
        I: IntoIterator<Item = CreditTable>,
    {
        let started = Instant::now();
        let mut table = CreditTable::new();
        for input in inputs {
            table.merge(input);
        }

        let mut stats = WorkerStats::new();
        {
            let mut tracked = TrackedSink::new(sink, &mut stats);
            for credit in table.iter() {
                self.generate(credit, &mut tracked)?;
            }
        }
        stats.sources = table.len() as u64;
        stats.record_elapsed(started.elapsed());

        debug!(
            sources = stats.sources,
            edges = stats.edges,
            self_loops = stats.self_loops,
            "reduce task finished"
        );
        Ok(stats)
    }

    fn generate(&self, credit: DegreeCredit, sink: &mut dyn EdgeSink) -> GenResult<u64> {
        match self.plan.mode {
            GeneratorMode::Exact => {
                Ok(generate_global(credit.node, credit.amount, self.plan.num_nodes, sink)?)
            }
            GeneratorMode::Approximate => {
                let owner = partition::owner_of(credit.node, self.plan.num_nodes, self.plan.map_tasks)
                    .ok_or_else(|| {
                        GenError::Config(format!(
                            "node {} is outside the graph of {} nodes",
                            credit.node, self.plan.num_nodes
                        ))
                    })?;
                let block = self.plan.block(owner)?;
                generate_local(credit.node, credit.amount, block, self.plan.direction, sink)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::{stage_degrees, InMemoryBroadcast};
    use crate::graph::Edge;
    use rstest::rstest;

    fn staged(degrees: Vec<u32>) -> InMemoryBroadcast {
        let channel = InMemoryBroadcast::new();
        stage_degrees(&channel, &DegreeVector::new(degrees)).unwrap();
        channel
    }

    fn exact_plan(num_nodes: u64, workers: usize) -> Arc<JobPlan> {
        Arc::new(JobPlan::new(
            num_nodes,
            workers,
            workers,
            GeneratorMode::Exact,
            EdgeDirection::Forward,
        ))
    }

    #[rstest]
    #[case(0, 0)]
    #[case(5, 1)]
    #[case(7, 3)]
    fn test_exact_route_is_modulo(#[case] node: Node, #[case] expected: usize) {
        let plan = exact_plan(100, 4);
        assert_eq!(plan.route(node), expected);
    }

    #[test]
    fn test_approximate_route_follows_block_owner() {
        let plan = JobPlan::new(10, 3, 7, GeneratorMode::Approximate, EdgeDirection::Forward);
        assert_eq!(plan.reduce_tasks, 3);
        // Blocks [0,3) [3,6) [6,10)
        assert_eq!(plan.route(2), 0);
        assert_eq!(plan.route(3), 1);
        assert_eq!(plan.route(9), 2);
    }

    #[test]
    fn test_exact_map_skips_zero_degrees() {
        let channel = staged(vec![2, 0, 3, 0, 1, 4]);
        let worker = Worker::new(1, exact_plan(6, 2));
        let output = worker.run_map(&channel).unwrap();

        assert_eq!(output.partitions.len(), 2);
        // Block [3, 6): node 4 -> reducer 0, node 5 -> reducer 1
        assert_eq!(output.partitions[0].get(4), 1);
        assert_eq!(output.partitions[1].get(5), 4);
        assert_eq!(output.stats.nodes, 3);
        assert_eq!(output.stats.input_degree, 5);
        assert_eq!(output.stats.credits_emitted, 2);
        assert_eq!(output.stats.credit_total, 5);
    }

    #[test]
    fn test_approximate_map_emits_residuals() {
        let channel = staged(vec![2, 1, 0, 0, 3, 0]);
        let plan = Arc::new(JobPlan::new(
            6,
            1,
            1,
            GeneratorMode::Approximate,
            EdgeDirection::Forward,
        ));
        let output = Worker::new(0, plan).run_map(&channel).unwrap();

        let credits: Vec<_> = output.partitions[0].iter().collect();
        assert_eq!(credits, vec![DegreeCredit::new(4, 2)]);
        assert_eq!(output.stats.cancelled, 2);
        assert_eq!(output.stats.input_degree, 6);
    }

    #[test]
    fn test_map_requires_staged_buffer() {
        let channel = InMemoryBroadcast::new();
        let err = Worker::new(0, exact_plan(4, 1)).run_map(&channel).unwrap_err();
        assert!(matches!(err, GenError::BroadcastMissing(_)));
    }

    #[test]
    fn test_map_rejects_mismatched_buffer() {
        let channel = staged(vec![1, 1, 1]);
        let err = Worker::new(0, exact_plan(4, 1)).run_map(&channel).unwrap_err();
        assert!(matches!(err, GenError::Format(_)));
    }

    #[test]
    fn test_map_rejects_bad_worker_index() {
        let channel = staged(vec![1, 1, 1, 1]);
        let err = Worker::new(2, exact_plan(4, 2)).run_map(&channel).unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }

    #[test]
    fn test_reduce_merges_tables_from_several_maps() {
        let worker = Worker::new(0, exact_plan(5, 1));
        let first: CreditTable = [DegreeCredit::new(3, 1)].into_iter().collect();
        let second: CreditTable = [DegreeCredit::new(3, 2)].into_iter().collect();

        let mut edges: Vec<Edge> = Vec::new();
        let stats = worker.run_reduce([first, second], &mut edges).unwrap();
        assert_eq!(edges, vec![(3, 4), (3, 0), (3, 1)]);
        assert_eq!(stats.sources, 1);
        assert_eq!(stats.edges, 3);
    }

    #[test]
    fn test_approximate_reduce_stays_in_block() {
        let plan = Arc::new(JobPlan::new(
            8,
            2,
            2,
            GeneratorMode::Approximate,
            EdgeDirection::Symmetric,
        ));
        let worker = Worker::new(1, plan);
        let table: CreditTable = [DegreeCredit::new(7, 2)].into_iter().collect();

        let mut edges: Vec<Edge> = Vec::new();
        worker.run_reduce([table], &mut edges).unwrap();
        // Block [4, 8)
        assert_eq!(edges, vec![(7, 4), (4, 7), (7, 5), (5, 7)]);
    }
}
