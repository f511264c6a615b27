//! Block-local forward edge generator
//!
//! The approximate path never looks outside the worker's block. Targets start
//! at `source + 1` and wrap back to the block start (not to 0) when they reach
//! the block end. When the walk lands on the source it advances one more step
//! with the same wrap rule, so a block of two or more nodes never produces a
//! self-loop. A single-node block has nowhere else to go and yields self-loops.
//!
//! Neighboring blocks are never consulted, so edges near a block boundary can
//! be duplicated by the adjacent worker and realized out-degrees can drift a
//! little from the sampled targets. That is accepted.
//!
//! # Example
//!
//! ```
//! use plgraph::generator::{EdgeDirection, local::LocalForwardEdges};
//! use plgraph::partition::Block;
//!
//! let edges: Vec<_> = LocalForwardEdges::new(5, 3, Block::new(4, 7), EdgeDirection::Forward)
//!     .unwrap()
//!     .collect();
//! assert_eq!(edges, vec![(5, 6), (5, 4), (5, 6)]);
//! ```

use super::EdgeDirection;
use crate::error::{GenError, GenResult};
use crate::graph::{Edge, EdgeSink, Node};
use crate::partition::Block;

/// Iterator over the edges of one source in the approximate path
#[derive(Debug, Clone)]
pub struct LocalForwardEdges {
    source: Node,
    block: Block,
    direction: EdgeDirection,
    next_target: Node,
    remaining: u64,
    pending_back_edge: Option<Edge>,
}

impl LocalForwardEdges {
    /// # Arguments
    ///
    /// * `source` - Source node id, must lie inside `block`
    /// * `degree` - Number of forward edges to emit
    /// * `block` - The worker's block; every target stays inside it
    /// * `direction` - Whether to also emit the `(target, source)` back edge
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Config`] if `source` is not inside `block`.
    pub fn new(source: Node, degree: u64, block: Block, direction: EdgeDirection) -> GenResult<Self> {
        if !block.contains(source) {
            return Err(GenError::Config(format!(
                "source {} is outside block {}",
                source, block
            )));
        }
        Ok(Self {
            source,
            block,
            direction,
            next_target: wrap(source + 1, block),
            remaining: degree,
            pending_back_edge: None,
        })
    }
}

/// Bring `target` back into the block when it runs off the end
fn wrap(target: Node, block: Block) -> Node {
    if target >= block.end {
        block.start
    } else {
        target
    }
}

impl Iterator for LocalForwardEdges {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        if let Some(back) = self.pending_back_edge.take() {
            return Some(back);
        }
        if self.remaining == 0 {
            return None;
        }

        let mut target = self.next_target;
        if target == self.source {
            target = wrap(target + 1, self.block);
        }

        self.next_target = wrap(target + 1, self.block);
        self.remaining -= 1;
        if self.direction == EdgeDirection::Symmetric {
            self.pending_back_edge = Some((target, self.source));
        }

        Some((self.source, target))
    }
}

/// Emit all edges of `source` into `sink`, returning how many were written
///
/// In symmetric mode the count includes the back edges.
pub fn generate_local(
    source: Node,
    degree: u64,
    block: Block,
    direction: EdgeDirection,
    sink: &mut dyn EdgeSink,
) -> GenResult<u64> {
    let mut written = 0;
    for edge in LocalForwardEdges::new(source, degree, block, direction)? {
        sink.emit(edge)?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn forward(source: Node, degree: u64, block: Block) -> Vec<Edge> {
        LocalForwardEdges::new(source, degree, block, EdgeDirection::Forward)
            .unwrap()
            .collect()
    }

    #[test]
    fn test_wraps_to_block_start() {
        assert_eq!(
            forward(5, 3, Block::new(4, 7)),
            vec![(5, 6), (5, 4), (5, 6)]
        );
    }

    #[test]
    fn test_last_node_of_block_starts_at_block_start() {
        assert_eq!(forward(6, 2, Block::new(4, 7)), vec![(6, 4), (6, 5)]);
    }

    #[test]
    fn test_skips_source_on_wrap() {
        assert_eq!(
            forward(0, 4, Block::new(0, 3)),
            vec![(0, 1), (0, 2), (0, 1), (0, 2)]
        );
    }

    #[test]
    fn test_single_node_block_self_loops() {
        assert_eq!(forward(9, 2, Block::new(9, 10)), vec![(9, 9), (9, 9)]);
    }

    #[test]
    fn test_symmetric_emits_back_edges() {
        let edges: Vec<_> =
            LocalForwardEdges::new(1, 2, Block::new(0, 3), EdgeDirection::Symmetric)
                .unwrap()
                .collect();
        assert_eq!(edges, vec![(1, 2), (2, 1), (1, 0), (0, 1)]);
    }

    #[test]
    fn test_rejects_source_outside_block() {
        let err = LocalForwardEdges::new(10, 1, Block::new(0, 5), EdgeDirection::Forward);
        assert!(matches!(err, Err(GenError::Config(_))));
        let empty = LocalForwardEdges::new(3, 1, Block::new(3, 3), EdgeDirection::Forward);
        assert!(empty.is_err());
    }

    #[test]
    fn test_generate_local_counts() {
        let mut sink: Vec<Edge> = Vec::new();
        let written =
            generate_local(2, 3, Block::new(0, 4), EdgeDirection::Symmetric, &mut sink).unwrap();
        assert_eq!(written, 6);
        assert_eq!(sink.len(), 6);
    }

    proptest! {
        #[test]
        fn test_targets_stay_in_block(
            start in 0u64..100,
            len in 1u64..40,
            offset in 0u64..40,
            degree in 0u64..120,
        ) {
            let block = Block::new(start, start + len);
            let source = start + offset % len;
            let edges = forward(source, degree, block);

            prop_assert_eq!(edges.len() as u64, degree);
            prop_assert!(edges.iter().all(|&(s, t)| s == source && block.contains(t)));
            if len >= 2 {
                prop_assert!(edges.iter().all(|&(s, t)| s != t));
            }
        }
    }
}
