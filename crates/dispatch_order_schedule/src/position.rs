// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node -> slot lookup for a processing order.

use dispatch_order_graph::NodeId;
use std::collections::HashMap;

/// Maps each scheduled node to its slot in an order
///
/// The index is a snapshot: it reflects exactly the order it was rebuilt
/// from. Editing that order without rebuilding leaves the index stale.
/// [`ProcessingOrder`](crate::ProcessingOrder) owns both halves and rebuilds
/// on every edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionIndex {
    positions: HashMap<NodeId, usize>,
}

impl PositionIndex {
    /// Build the index for `order`
    pub fn rebuild(order: &[NodeId]) -> Self {
        let positions = order
            .iter()
            .enumerate()
            .map(|(slot, id)| (*id, slot))
            .collect();
        Self { positions }
    }

    /// Slot of `node`, or `None` if it is not scheduled
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.positions.get(&node).copied()
    }

    /// Whether `a` is scheduled strictly before `b`
    ///
    /// `None` when either node is not scheduled.
    pub fn is_before(&self, a: NodeId, b: NodeId) -> Option<bool> {
        Some(self.index_of(a)? < self.index_of(b)?)
    }

    /// Check whether a node is indexed
    pub fn contains(&self, node: NodeId) -> bool {
        self.positions.contains_key(&node)
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
