//! Degree credit aggregation
//!
//! A [`CreditTable`] maps node ids to the amount of out-degree they still
//! need. Adding and merging are plain sums, so the table can be combined any
//! number of times, in any grouping and in any order, before the final merge
//! without changing the totals. That lets a worker pre-merge its own credits
//! (combiner) and lets the shuffle merge tables in whatever order they arrive.

use crate::graph::Node;
use std::collections::btree_map::{self, BTreeMap};

/// `node` still needs `amount` more outgoing edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeCredit {
    pub node: Node,
    pub amount: u64,
}

impl DegreeCredit {
    pub const fn new(node: Node, amount: u64) -> Self {
        Self { node, amount }
    }
}

/// Commutative reduction over the credits of one node
pub fn sum_credits<I: IntoIterator<Item = u64>>(amounts: I) -> u64 {
    amounts.into_iter().sum()
}

/// Accumulated credit per node, ordered by node id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditTable {
    credits: BTreeMap<Node, u64>,
}

impl CreditTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add credit for a node
    ///
    /// Zero amounts are ignored so a table never holds empty entries.
    pub fn add(&mut self, node: Node, amount: u64) {
        if amount == 0 {
            return;
        }
        *self.credits.entry(node).or_insert(0) += amount;
    }

    pub fn add_credit(&mut self, credit: DegreeCredit) {
        self.add(credit.node, credit.amount);
    }

    /// Fold another table into this one
    pub fn merge(&mut self, other: CreditTable) {
        // Fold the smaller map into the larger one
        let (mut base, extra) = if self.credits.len() >= other.credits.len() {
            (std::mem::take(&mut self.credits), other.credits)
        } else {
            (other.credits, std::mem::take(&mut self.credits))
        };
        for (node, amount) in extra {
            *base.entry(node).or_insert(0) += amount;
        }
        self.credits = base;
    }

    /// Accumulated credit of a node (0 if absent)
    pub fn get(&self, node: Node) -> u64 {
        self.credits.get(&node).copied().unwrap_or(0)
    }

    /// Number of distinct nodes
    pub fn len(&self) -> usize {
        self.credits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }

    /// Sum of all credits in the table
    pub fn total(&self) -> u64 {
        sum_credits(self.credits.values().copied())
    }

    /// Credits in ascending node order
    pub fn iter(&self) -> impl Iterator<Item = DegreeCredit> + '_ {
        self.credits
            .iter()
            .map(|(&node, &amount)| DegreeCredit::new(node, amount))
    }

    /// Split into `parts` tables using `route` to pick the destination
    ///
    /// `route` must return an index below `parts`; larger values are clamped to
    /// the last table.
    pub fn split_by<F>(self, parts: usize, mut route: F) -> Vec<CreditTable>
    where
        F: FnMut(Node) -> usize,
    {
        let parts = parts.max(1);
        let mut tables = vec![CreditTable::new(); parts];
        for (node, amount) in self.credits {
            let index = route(node).min(parts - 1);
            tables[index].add(node, amount);
        }
        tables
    }
}

impl FromIterator<DegreeCredit> for CreditTable {
    fn from_iter<I: IntoIterator<Item = DegreeCredit>>(iter: I) -> Self {
        let mut table = CreditTable::new();
        table.extend(iter);
        table
    }
}

impl Extend<DegreeCredit> for CreditTable {
    fn extend<I: IntoIterator<Item = DegreeCredit>>(&mut self, iter: I) {
        for credit in iter {
            self.add_credit(credit);
        }
    }
}

impl IntoIterator for CreditTable {
    type Item = DegreeCredit;
    type IntoIter = std::iter::Map<btree_map::IntoIter<Node, u64>, fn((Node, u64)) -> DegreeCredit>;

    fn into_iter(self) -> Self::IntoIter {
        fn to_credit((node, amount): (Node, u64)) -> DegreeCredit {
            DegreeCredit::new(node, amount)
        }
        self.credits.into_iter().map(to_credit as fn((Node, u64)) -> DegreeCredit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_and_get() {
        let mut table = CreditTable::new();
        table.add(3, 2);
        table.add(3, 5);
        table.add(1, 0);
        assert_eq!(table.get(3), 7);
        assert_eq!(table.get(1), 0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.total(), 7);
    }

    #[test]
    fn test_merge_sums_overlapping_keys() {
        let mut left: CreditTable = vec![DegreeCredit::new(1, 2), DegreeCredit::new(2, 1)]
            .into_iter()
            .collect();
        let right: CreditTable = vec![DegreeCredit::new(2, 4), DegreeCredit::new(9, 1)]
            .into_iter()
            .collect();
        left.merge(right);

        let credits: Vec<_> = left.iter().collect();
        assert_eq!(
            credits,
            vec![
                DegreeCredit::new(1, 2),
                DegreeCredit::new(2, 5),
                DegreeCredit::new(9, 1),
            ]
        );
    }

    #[test]
    fn test_split_by_routes_every_credit() {
        let table: CreditTable = (0..10).map(|n| DegreeCredit::new(n, n + 1)).collect();
        let total = table.total();
        let parts = table.split_by(3, |node| (node % 3) as usize);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.iter().map(CreditTable::total).sum::<u64>(), total);
        assert!(parts[1].iter().all(|c| c.node % 3 == 1));
    }

    #[test]
    fn test_into_iter_is_ordered() {
        let table: CreditTable = vec![DegreeCredit::new(5, 1), DegreeCredit::new(2, 1)]
            .into_iter()
            .collect();
        let nodes: Vec<_> = table.into_iter().map(|c| c.node).collect();
        assert_eq!(nodes, vec![2, 5]);
    }

    proptest! {
        #[test]
        fn test_aggregation_is_grouping_and_order_independent(
            amounts in proptest::collection::vec(0u64..1_000, 0..64),
            cuts in proptest::collection::vec(any::<prop::sample::Index>(), 0..8),
            rotate in 0usize..64,
        ) {
            let expected = sum_credits(amounts.iter().copied());

            // Split the credits of one node into arbitrary groups
            let mut bounds: Vec<usize> = cuts.iter().map(|c| c.index(amounts.len() + 1)).collect();
            bounds.push(0);
            bounds.push(amounts.len());
            bounds.sort_unstable();

            let mut groups: Vec<CreditTable> = bounds
                .windows(2)
                .map(|w| amounts[w[0]..w[1]].iter().map(|&a| DegreeCredit::new(7, a)).collect())
                .collect();

            // Pre-combine each group, then merge groups in a rotated order
            if !groups.is_empty() {
                let shift = rotate % groups.len();
                groups.rotate_left(shift);
            }
            let mut merged = CreditTable::new();
            for group in groups {
                merged.merge(group);
            }

            prop_assert_eq!(merged.get(7), expected);
            prop_assert_eq!(merged.total(), expected);
        }

        #[test]
        fn test_merge_is_commutative(
            left in proptest::collection::vec((0u64..16, 0u64..100), 0..32),
            right in proptest::collection::vec((0u64..16, 0u64..100), 0..32),
        ) {
            let build = |pairs: &[(u64, u64)]| -> CreditTable {
                pairs.iter().map(|&(n, a)| DegreeCredit::new(n, a)).collect()
            };
            let mut ab = build(&left);
            ab.merge(build(&right));
            let mut ba = build(&right);
            ba.merge(build(&left));
            prop_assert_eq!(ab, ba);
        }
    }
}
