// SPDX-License-Identifier: MIT OR Apache-2.0
//! Critical-path leveling of a topological order.
//!
//! Each node's distance is the length, in edges, of the longest path from an
//! input to that node. Nodes sharing a distance have no path between them,
//! so every bucket is a batch that may be dispatched in parallel, and
//! concatenating buckets by increasing distance is again topological.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 24.2
//! (Single-source shortest paths in directed acyclic graphs), adapted to
//! longest paths from multiple sources.

use dispatch_order_graph::{Graph, NodeId};
use std::collections::HashMap;

/// Nodes grouped by longest-path distance from the graph inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leveling {
    buckets: Vec<Vec<NodeId>>,
    distances: HashMap<NodeId, usize>,
}

impl Leveling {
    /// Buckets indexed by distance
    pub fn buckets(&self) -> &[Vec<NodeId>] {
        &self.buckets
    }

    /// Nodes at exactly `distance`
    pub fn bucket(&self, distance: usize) -> Option<&[NodeId]> {
        self.buckets.get(distance).map(Vec::as_slice)
    }

    /// Longest-path distance of a leveled node
    pub fn distance(&self, node: NodeId) -> Option<usize> {
        self.distances.get(&node).copied()
    }

    /// Largest distance, or `None` for an empty leveling
    pub fn max_distance(&self) -> Option<usize> {
        self.buckets.len().checked_sub(1)
    }

    /// Number of leveled nodes
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Whether no node was leveled
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Leveled order: buckets concatenated by increasing distance
    pub fn order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.buckets.iter().flatten().copied()
    }

    /// Consume the leveling, returning the leveled order
    pub fn into_order(self) -> Vec<NodeId> {
        self.buckets.into_iter().flatten().collect()
    }
}

/// Level `order` by longest-path distance from the graph inputs
///
/// `order` should already be topological; it is not re-derived. Given a
/// misordered input the result is still a complete bucketing of `order`,
/// but it is no longer guaranteed to be topological. A node whose
/// distance has not been relaxed by the time it is reached counts as an
/// input (distance 0). Within a bucket nodes keep their relative order from
/// `order`. The graph is only read.
pub fn level_order(graph: &Graph, order: &[NodeId]) -> Leveling {
    let mut distances: HashMap<NodeId, usize> = HashMap::with_capacity(order.len());

    for node in order {
        let distance = *distances.entry(*node).or_insert(0);
        for user in graph.users(*node) {
            let relaxed = distance + 1;
            distances
                .entry(*user)
                .and_modify(|d| *d = (*d).max(relaxed))
                .or_insert(relaxed);
        }
    }

    if order.is_empty() {
        return Leveling::default();
    }

    // Users outside `order` were relaxed but are not part of the result.
    let scheduled: HashMap<NodeId, usize> = order
        .iter()
        .map(|node| (*node, distances[node]))
        .collect();
    let max_distance = scheduled.values().copied().max().unwrap_or(0);

    let mut buckets = vec![Vec::new(); max_distance + 1];
    for node in order {
        buckets[scheduled[node]].push(*node);
    }

    tracing::debug!(
        nodes = order.len(),
        levels = buckets.len(),
        widest = buckets.iter().map(Vec::len).max().unwrap_or(0),
        "leveled processing order"
    );

    Leveling {
        buckets,
        distances: scheduled,
    }
}
