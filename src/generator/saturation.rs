//! Block-local degree saturation
//!
//! Before the approximate path generates edges, each worker cancels degree
//! credit between nodes of its own block. Walking the block front to back, a
//! node with residual `d` visits its forward neighbors in order; every
//! neighbor that still has residual degree gives up one unit and `d` drops by
//! one. The walk ends when `d` reaches zero or the block ends, and what is left
//! of `d` becomes the node's residual.
//!
//! Only the worker's private slice is read or written. A node near the end of
//! its block may stay unsatisfied even though a node in the next block could
//! have absorbed its credit; that boundary error is what buys independence
//! between workers.
//!
//! The forward scan skips exhausted neighbors through a next-positive index
//! with path compression, so long runs of zero residuals are crossed once
//! instead of once per scanning node.

use crate::graph::DegreeVector;
use crate::partition::Block;

/// Outcome of one saturation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saturation {
    /// Residual degree per local index
    pub residual: Vec<u32>,
    /// Units of credit cancelled against forward neighbors
    pub cancelled: u64,
}

/// Saturate a worker's private slice in place
///
/// Returns the number of units cancelled against forward neighbors. Residuals
/// never go below zero.
pub fn saturate(local: &mut [u32]) -> u64 {
    let len = local.len();

    // next[j] == j  <=>  j is the sentinel or local[j] > 0
    let mut next: Vec<usize> = (0..=len)
        .map(|j| if j < len && local[j] == 0 { j + 1 } else { j })
        .collect();

    let mut cancelled = 0u64;
    for i in 0..len {
        let mut remaining = local[i];
        let mut cursor = i + 1;
        while remaining > 0 {
            let target = next_positive(&mut next, cursor);
            if target >= len {
                break;
            }
            local[target] -= 1;
            if local[target] == 0 {
                next[target] = target + 1;
            }
            remaining -= 1;
            cancelled += 1;
            cursor = target + 1;
        }
        local[i] = remaining;
        if remaining == 0 {
            next[i] = i + 1;
        }
    }

    cancelled
}

/// Take a private copy of the block and saturate it
pub fn saturate_block(degrees: &DegreeVector, block: Block) -> Saturation {
    let mut residual = degrees.local_copy(block);
    let cancelled = saturate(&mut residual);
    Saturation {
        residual,
        cancelled,
    }
}

/// First index `>= from` that still has positive residual (or the sentinel)
fn next_positive(next: &mut [usize], from: usize) -> usize {
    let mut j = from;
    while next[j] != j {
        let parent = next[j];
        next[j] = next[parent];
        j = parent;
    }
    j
}
