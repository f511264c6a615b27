//! Degree sequence distributions
//!
//! This module provides samplers that produce the per-node target degrees of a
//! synthetic graph. The result of a sampler is a [`DegreeSample`]: the degree
//! vector itself plus the class histogram it was built from.
//!
//! # Distributions
//!
//! - **Power law**: `P(k) ∝ k^(-τ)` with τ = 2.0, a few hubs and a long tail
//!
//! # Example
//!
//! ```
//! use plgraph::distribution::{DegreeSampler, powerlaw::{Normalization, PowerLawSampler}};
//!
//! let mut sampler = PowerLawSampler::with_seed(Normalization::Full, 7);
//! let sample = sampler.sample(100);
//! assert_eq!(sample.degrees.len(), 100);
//! assert!(sample.degrees.as_slice().iter().all(|&d| d < 100));
//! ```

use crate::graph::DegreeVector;

/// Degree sequence sampler
///
/// Samplers own their random number generator and must be `Send` so the
/// driver can build them on one thread and run them on another.
pub trait DegreeSampler: Send {
    /// Draw the degree sequence of a graph with `num_nodes` nodes
    ///
    /// The returned vector always has exactly `num_nodes` entries.
    fn sample(&mut self, num_nodes: usize) -> DegreeSample;
}

/// Output of a [`DegreeSampler`]
#[derive(Debug, Clone)]
pub struct DegreeSample {
    /// Degree per node id
    pub degrees: DegreeVector,
    /// Number of draws that landed in each degree class (index = class)
    pub histogram: Vec<u64>,
    /// Draws that matched no class and were discarded
    pub dropped_draws: u64,
}

impl DegreeSample {
    /// Number of draws that were assigned to a class
    pub fn assigned_draws(&self) -> u64 {
        self.histogram.iter().sum()
    }
}

pub mod powerlaw;
