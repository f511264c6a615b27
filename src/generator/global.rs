//! Exact forward edge generator
//!
//! A source with degree `d` gets exactly `d` edges. Targets run forward from
//! `source + 1` to `N - 1`, then continue from 0 upward. Nothing is filtered:
//! once `d` reaches `N` the walk comes back around to the source (self-loop)
//! and keeps going, repeating targets. The generator is exact in edge count
//! per source, not in simplicity of the graph.
//!
//! # Example
//!
//! ```
//! use plgraph::generator::global::GlobalForwardEdges;
//!
//! let edges: Vec<_> = GlobalForwardEdges::new(3, 3, 5).collect();
//! assert_eq!(edges, vec![(3, 4), (3, 0), (3, 1)]);
//! ```

use crate::graph::{Edge, EdgeSink, Node};

/// Iterator over the edges of one source in the exact path
#[derive(Debug, Clone)]
pub struct GlobalForwardEdges {
    source: Node,
    num_nodes: u64,
    next_target: Node,
    remaining: u64,
}

impl GlobalForwardEdges {
    /// # Arguments
    ///
    /// * `source` - Source node id
    /// * `degree` - Number of edges to emit
    /// * `num_nodes` - Size of the id space N
    ///
    /// With `num_nodes == 0` there is no valid target and nothing is emitted.
    pub fn new(source: Node, degree: u64, num_nodes: u64) -> Self {
        let (next_target, remaining) = if num_nodes == 0 {
            (0, 0)
        } else {
            ((source % num_nodes + 1) % num_nodes, degree)
        };
        Self {
            source,
            num_nodes,
            next_target,
            remaining,
        }
    }
}

impl Iterator for GlobalForwardEdges {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        if self.remaining == 0 {
            return None;
        }
        let edge = (self.source, self.next_target);
        self.next_target += 1;
        if self.next_target >= self.num_nodes {
            self.next_target = 0;
        }
        self.remaining -= 1;
        Some(edge)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Emit all edges of `source` into `sink`, returning how many were written
pub fn generate_global(
    source: Node,
    degree: u64,
    num_nodes: u64,
    sink: &mut dyn EdgeSink,
) -> std::io::Result<u64> {
    let mut written = 0;
    for edge in GlobalForwardEdges::new(source, degree, num_nodes) {
        sink.emit(edge)?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_wraps_to_zero() {
        let edges: Vec<_> = GlobalForwardEdges::new(3, 3, 5).collect();
        assert_eq!(edges, vec![(3, 4), (3, 0), (3, 1)]);
    }

    #[test]
    fn test_forward_only_when_room() {
        let edges: Vec<_> = GlobalForwardEdges::new(0, 3, 10).collect();
        assert_eq!(edges, vec![(0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_last_node_starts_at_zero() {
        let edges: Vec<_> = GlobalForwardEdges::new(4, 2, 5).collect();
        assert_eq!(edges, vec![(4, 0), (4, 1)]);
    }

    #[test]
    fn test_degree_at_node_count_hits_self_loop() {
        let edges: Vec<_> = GlobalForwardEdges::new(2, 4, 4).collect();
        assert_eq!(edges, vec![(2, 3), (2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_large_degree_repeats_targets() {
        let edges: Vec<_> = GlobalForwardEdges::new(1, 7, 3).collect();
        assert_eq!(edges.len(), 7);
        assert!(edges.iter().all(|&(s, t)| s == 1 && t < 3));
        assert_eq!(edges[0], (1, 2));
        assert_eq!(edges[3], (1, 2));
    }

    #[test]
    fn test_zero_degree_and_empty_graph() {
        assert_eq!(GlobalForwardEdges::new(3, 0, 5).count(), 0);
        assert_eq!(GlobalForwardEdges::new(0, 4, 0).count(), 0);
    }

    #[test]
    fn test_generate_global_into_sink() {
        let mut sink: Vec<Edge> = Vec::new();
        let written = generate_global(0, 2, 3, &mut sink).unwrap();
        assert_eq!(written, 2);
        assert_eq!(sink, vec![(0, 1), (0, 2)]);
    }

    proptest! {
        #[test]
        fn test_emits_exact_degree(n in 1u64..200, pick in 0u64..200, degree in 0u64..600) {
            let source = pick % n;
            let edges: Vec<_> = GlobalForwardEdges::new(source, degree, n).collect();
            prop_assert_eq!(edges.len() as u64, degree);
            prop_assert!(edges.iter().all(|&(s, t)| s == source && t < n));

            if degree >= n {
                let distinct: HashSet<_> = edges.iter().map(|&(_, t)| t).collect();
                let has_self_loop = edges.iter().any(|&(s, t)| s == t);
                prop_assert!(has_self_loop || distinct.len() < edges.len());
            }
        }
    }
}
