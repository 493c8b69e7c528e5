// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge (dependency -> user) view of the graph.

use crate::node::NodeId;

/// A data-flow edge from a producing node to a consuming node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Producing node
    pub dependency: NodeId,
    /// Consuming node
    pub user: NodeId,
    /// Index of `dependency` in the user's input list
    pub slot: usize,
}

impl Edge {
    /// Create a new edge view
    pub fn new(dependency: NodeId, user: NodeId, slot: usize) -> Self {
        Self {
            dependency,
            user,
            slot,
        }
    }

    /// Check if this edge involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.dependency == node_id || self.user == node_id
    }
}
