//! plgraph - partitioned power-law graph generator
//!
//! plgraph samples a degree sequence from a discrete power law and turns it
//! into an edge list with a map/reduce style job, split across workers that
//! each own a contiguous block of node ids.
//!
//! # Architecture
//!
//! - **Sampling**: [`distribution::powerlaw`] draws a degree per node
//! - **Broadcast**: [`broadcast`] ships the degree vector to every worker
//! - **Partitioning**: [`partition`] assigns each worker its block
//! - **Edge assignment**: [`generator`] holds the exact (global wraparound)
//!   and approximate (block-local saturation) paths
//! - **Execution**: [`worker`] runs map and reduce tasks, [`coordinator`]
//!   drives them in parallel and writes part files
//! - **Reporting**: [`stats`] counters, [`output`] text, merge and JSON

pub mod broadcast;
pub mod config;
pub mod coordinator;
pub mod distribution;
pub mod error;
pub mod generator;
pub mod graph;
pub mod logging;
pub mod output;
pub mod partition;
pub mod stats;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use error::{GenError, GenResult};
pub use graph::{DegreeVector, Edge, EdgeSink, Node};
pub use worker::{JobPlan, Worker};

/// Result type used by the configuration and driver layers
pub type Result<T> = anyhow::Result<T>;
