//! Shared graph types
//!
//! Nodes are plain integer ids and edges are `(source, target)` tuples. The
//! only materialized structure is the [`DegreeVector`], which is produced once
//! per run and then shared read-only by every worker.

use crate::partition::Block;
use std::sync::Arc;

/// Node id in `[0, N)`.
pub type Node = u64;

/// Directed edge `(source, target)`.
pub type Edge = (Node, Node);

/// Target degree per node, indexed by node id.
///
/// Cloning is cheap: every clone points at the same immutable buffer. There is
/// no mutable access to the shared copy; a worker that wants to modify degrees
/// takes a private copy of its block with [`DegreeVector::local_copy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreeVector {
    degrees: Arc<[u32]>,
}

impl DegreeVector {
    /// Wrap an owned degree sequence
    pub fn new(degrees: Vec<u32>) -> Self {
        Self {
            degrees: degrees.into(),
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// Degree of a single node, `None` when out of range
    pub fn get(&self, node: Node) -> Option<u32> {
        usize::try_from(node)
            .ok()
            .and_then(|idx| self.degrees.get(idx).copied())
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.degrees
    }

    /// Read-only view of one block
    ///
    /// The block is clamped to the vector length so a block planned for a
    /// larger node count never reads out of bounds.
    pub fn slice(&self, block: Block) -> &[u32] {
        let end = (block.end as usize).min(self.degrees.len());
        let start = (block.start as usize).min(end);
        &self.degrees[start..end]
    }

    /// Private, writable copy of one block
    pub fn local_copy(&self, block: Block) -> Vec<u32> {
        self.slice(block).to_vec()
    }

    /// Sum of all degrees (total edge credit of the run)
    pub fn total_degree(&self) -> u64 {
        self.degrees.iter().map(|&d| d as u64).sum()
    }

    /// Largest degree, 0 for an empty vector
    pub fn max_degree(&self) -> u32 {
        self.degrees.iter().copied().max().unwrap_or(0)
    }
}

impl From<Vec<u32>> for DegreeVector {
    fn from(degrees: Vec<u32>) -> Self {
        Self::new(degrees)
    }
}

/// Destination for generated edges
///
/// Generators never retain edges; they push each one into a sink as soon as
/// it is produced.
pub trait EdgeSink {
    /// Accept one edge
    fn emit(&mut self, edge: Edge) -> std::io::Result<()>;
}

impl EdgeSink for Vec<Edge> {
    fn emit(&mut self, edge: Edge) -> std::io::Result<()> {
        self.push(edge);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_vector_shared_buffer() {
        let degrees = DegreeVector::new(vec![3, 2, 1, 0]);
        let clone = degrees.clone();
        assert!(std::ptr::eq(degrees.as_slice(), clone.as_slice()));
        assert_eq!(degrees.total_degree(), 6);
        assert_eq!(degrees.max_degree(), 3);
    }

    #[test]
    fn test_local_copy_is_private() {
        let degrees = DegreeVector::new(vec![5, 4, 3, 2, 1]);
        let mut local = degrees.local_copy(Block::new(1, 4));
        assert_eq!(local, vec![4, 3, 2]);
        local[0] = 0;
        assert_eq!(degrees.get(1), Some(4));
    }

    #[test]
    fn test_slice_clamps_to_length() {
        let degrees = DegreeVector::new(vec![1, 1, 1]);
        assert_eq!(degrees.slice(Block::new(2, 10)), &[1]);
        assert!(degrees.slice(Block::new(5, 10)).is_empty());
        assert_eq!(degrees.get(3), None);
    }
}
