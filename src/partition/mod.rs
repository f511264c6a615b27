//! Node-to-worker partitioning
//!
//! The id space `[0, N)` is cut into `W` contiguous blocks. Every worker gets
//! `N / W` nodes and the last worker also absorbs the remainder `N mod W`, so
//! the blocks are disjoint and together cover the whole id space.
//!
//! Blocks are pure functions of `(N, W, worker_index)`. Workers recompute
//! their own block instead of receiving it, and nothing here is stored.
//!
//! # Example
//!
//! ```
//! use plgraph::partition::{plan, Block};
//!
//! // 10 nodes over 3 workers: 3 + 3 + 4
//! assert_eq!(plan(10, 3, 0).unwrap(), Block::new(0, 3));
//! assert_eq!(plan(10, 3, 1).unwrap(), Block::new(3, 6));
//! assert_eq!(plan(10, 3, 2).unwrap(), Block::new(6, 10));
//! ```

use crate::error::{GenError, GenResult};
use crate::graph::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open range of node ids `[start, end)` owned by one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub start: Node,
    pub end: Node,
}

impl Block {
    pub const fn new(start: Node, end: Node) -> Self {
        Self { start, end }
    }

    /// Number of nodes in the block
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, node: Node) -> bool {
        node >= self.start && node < self.end
    }

    /// Iterate node ids in the block
    pub fn nodes(&self) -> std::ops::Range<Node> {
        self.start..self.end
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Compute the block of one worker
///
/// # Arguments
///
/// * `num_nodes` - Total node count N
/// * `num_workers` - Worker count W (must be at least 1)
/// * `worker_index` - Index of the worker in `[0, W)`
///
/// # Errors
///
/// Returns [`GenError::Config`] if `num_workers` is zero or `worker_index` is
/// not below `num_workers`.
pub fn plan(num_nodes: u64, num_workers: usize, worker_index: usize) -> GenResult<Block> {
    if num_workers < 1 {
        return Err(GenError::Config(
            "worker count must be at least 1".to_string(),
        ));
    }
    if worker_index >= num_workers {
        return Err(GenError::Config(format!(
            "worker index {} out of range for {} workers",
            worker_index, num_workers
        )));
    }

    let nodes_per_worker = num_nodes / num_workers as u64;
    let start = worker_index as u64 * nodes_per_worker;
    let end = if worker_index == num_workers - 1 {
        num_nodes
    } else {
        start + nodes_per_worker
    };

    Ok(Block::new(start, end))
}

/// Blocks of all workers, in worker order
pub fn plan_all(num_nodes: u64, num_workers: usize) -> GenResult<Vec<Block>> {
    (0..num_workers)
        .map(|worker_index| plan(num_nodes, num_workers, worker_index))
        .collect()
}

/// Index of the worker whose block contains `node`
///
/// Returns `None` when `node` is outside `[0, N)` or `num_workers` is zero.
pub fn owner_of(node: Node, num_nodes: u64, num_workers: usize) -> Option<usize> {
    if num_workers == 0 || node >= num_nodes {
        return None;
    }
    let nodes_per_worker = num_nodes / num_workers as u64;
    if nodes_per_worker == 0 {
        // Every block but the last is empty
        return Some(num_workers - 1);
    }
    let index = (node / nodes_per_worker) as usize;
    Some(index.min(num_workers - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(10, 1, 0, Block::new(0, 10))]
    #[case(10, 3, 0, Block::new(0, 3))]
    #[case(10, 3, 2, Block::new(6, 10))]
    #[case(7, 7, 6, Block::new(6, 7))]
    #[case(3, 5, 0, Block::new(0, 0))]
    #[case(3, 5, 4, Block::new(0, 3))]
    #[case(0, 2, 1, Block::new(0, 0))]
    fn test_plan_cases(
        #[case] n: u64,
        #[case] w: usize,
        #[case] idx: usize,
        #[case] expected: Block,
    ) {
        assert_eq!(plan(n, w, idx).unwrap(), expected);
    }

    #[test]
    fn test_plan_rejects_zero_workers() {
        let err = plan(10, 0, 0).unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }

    #[test]
    fn test_plan_rejects_index_out_of_range() {
        let err = plan(10, 2, 2).unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }

    #[test]
    fn test_block_helpers() {
        let block = Block::new(4, 8);
        assert_eq!(block.len(), 4);
        assert!(block.contains(4));
        assert!(!block.contains(8));
        assert_eq!(block.nodes().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
        assert_eq!(block.to_string(), "[4, 8)");
        assert!(Block::new(3, 3).is_empty());
    }

    proptest! {
        #[test]
        fn test_blocks_cover_id_space(n in 0u64..5_000, w in 1usize..64) {
            let blocks = plan_all(n, w).unwrap();
            prop_assert_eq!(blocks.len(), w);

            // Contiguous in worker order means disjoint and gap-free
            let mut expected_start = 0;
            for block in &blocks {
                prop_assert_eq!(block.start, expected_start);
                prop_assert!(block.end >= block.start);
                expected_start = block.end;
            }
            prop_assert_eq!(expected_start, n);

            let per_worker = n / w as u64;
            for block in &blocks[..w - 1] {
                prop_assert_eq!(block.len(), per_worker);
            }
            prop_assert_eq!(blocks[w - 1].len(), per_worker + n % w as u64);
        }

        #[test]
        fn test_owner_matches_plan(n in 1u64..2_000, w in 1usize..32, pick in 0u64..2_000) {
            let node = pick % n;
            let owner = owner_of(node, n, w).unwrap();
            prop_assert!(plan(n, w, owner).unwrap().contains(node));
        }
    }
}
