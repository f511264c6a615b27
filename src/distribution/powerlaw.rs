//! Power-law degree sampler
//!
//! Degree classes `k = 1 .. N-1` get mass `p_k = C · k^(-τ)` with τ = 2.0 and
//! `C = 2(τ-1)/(τ+1)`. The sampler draws N uniforms, maps each one to a class
//! through the cumulative distribution and counts the hits per class.
//!
//! Degrees are then handed out in descending class order starting at node 0,
//! so hubs always sit at the lowest ids. Given the histogram, the mapping from
//! node id to degree is fully deterministic.
//!
//! # Normalization
//!
//! The reference generator only normalizes classes `1 .. N-2` and leaves the
//! top class holding its raw mass. A draw above the last normalized bucket then
//! matches nothing and is silently dropped, so fewer than N draws end up in the
//! histogram. [`Normalization::Legacy`] keeps that behavior for comparisons;
//! [`Normalization::Full`] normalizes the whole range and never drops a draw.

use super::{DegreeSample, DegreeSampler};
use crate::graph::DegreeVector;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Power-law exponent τ
pub const TAU: f64 = 2.0;

/// How the cumulative distribution is normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Normalize every class including the top one
    #[default]
    Full,
    /// Reference behavior: the top class is never normalized
    Legacy,
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Normalization::Full => write!(f, "full"),
            Normalization::Legacy => write!(f, "legacy"),
        }
    }
}

/// Power-law degree sequence sampler
pub struct PowerLawSampler {
    normalization: Normalization,
    rng: Xoshiro256PlusPlus,
}

impl PowerLawSampler {
    /// Create a sampler seeded from system entropy
    pub fn new(normalization: Normalization) -> Self {
        Self {
            normalization,
            rng: Xoshiro256PlusPlus::from_entropy(),
        }
    }

    /// Create a sampler with a fixed seed
    pub fn with_seed(normalization: Normalization, seed: u64) -> Self {
        Self {
            normalization,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Class range this sampler normalizes over
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }
}

impl DegreeSampler for PowerLawSampler {
    fn sample(&mut self, num_nodes: usize) -> DegreeSample {
        let cdf = cumulative_distribution(num_nodes, self.normalization);

        let mut histogram = vec![0u64; num_nodes];
        let mut dropped_draws = 0u64;
        for _ in 0..num_nodes {
            let draw: f64 = self.rng.gen();
            match find_class(&cdf, draw) {
                Some(class) => histogram[class] += 1,
                None => dropped_draws += 1,
            }
        }

        if dropped_draws > 0 {
            warn!(
                dropped_draws,
                num_nodes,
                normalization = %self.normalization,
                "degree draws matched no class and were discarded"
            );
        }

        let degrees = assign_degrees(&histogram);
        debug!(num_nodes, dropped_draws, "sampled power-law degree sequence");

        DegreeSample {
            degrees: DegreeVector::new(degrees),
            histogram,
            dropped_draws,
        }
    }
}

/// Build the cumulative distribution over classes `1 .. N-1`
///
/// Index 0 is unused and stays 0.0.
pub(crate) fn cumulative_distribution(num_nodes: usize, normalization: Normalization) -> Vec<f64> {
    let c = 2.0 * (TAU - 1.0) / (TAU + 1.0);

    let mut cdf = vec![0.0f64; num_nodes];
    let mut total = 0.0;
    for k in 1..num_nodes {
        let mass = c * (k as f64).powf(-TAU);
        cdf[k] = mass;
        total += mass;
    }

    // Highest class index that gets normalized and accumulated
    let last_normalized = match normalization {
        Normalization::Full => num_nodes.saturating_sub(1),
        Normalization::Legacy => num_nodes.saturating_sub(2),
    };
    for k in 1..=last_normalized {
        cdf[k] /= total;
        cdf[k] += cdf[k - 1];
    }

    // Rounding can leave the sum a hair under 1.0
    if normalization == Normalization::Full && num_nodes >= 2 {
        cdf[num_nodes - 1] = 1.0;
    }

    cdf
}

/// Smallest class `k >= 1` with `draw <= cdf[k]`
///
/// Classes `1 .. N-2` are always a monotone prefix and are binary searched.
/// The top class is checked on its own because in legacy mode it still holds
/// raw, unaccumulated mass.
pub(crate) fn find_class(cdf: &[f64], draw: f64) -> Option<usize> {
    if cdf.len() < 2 {
        return None;
    }
    let top = cdf.len() - 1;

    let prefix = &cdf[1..top];
    let pos = prefix.partition_point(|&c| c < draw);
    if pos < prefix.len() {
        return Some(pos + 1);
    }

    if draw <= cdf[top] {
        Some(top)
    } else {
        None
    }
}

/// Hand out degree classes to node ids, largest class first
fn assign_degrees(histogram: &[u64]) -> Vec<u32> {
    let num_nodes = histogram.len();
    let mut degrees = vec![0u32; num_nodes];

    let mut index = 0;
    for class in (1..num_nodes).rev() {
        let degree = u32::try_from(class).unwrap_or(u32::MAX);
        for _ in 0..histogram[class] {
            if index >= num_nodes {
                return degrees;
            }
            degrees[index] = degree;
            index += 1;
        }
    }

    degrees
}
