// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the compute graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
///
/// Handles are stable for the lifetime of the node and never reused, so a
/// handle held by an optimization pass cannot silently alias a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A computation unit in the graph
///
/// The dependency and user relations are handles into the owning
/// [`Graph`](crate::Graph); they are only edited through the graph so both
/// directions stay in sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Primitive type tag, e.g. `"convolution"`
    pub primitive: String,
    /// Nodes whose outputs this node consumes, in input-slot order
    #[serde(default)]
    pub(crate) dependencies: Vec<NodeId>,
    /// Nodes consuming this node's output, in connection order
    #[serde(skip)]
    pub(crate) users: Vec<NodeId>,
}

impl Node {
    /// Create a new unconnected node
    pub fn new(name: impl Into<String>, primitive: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            primitive: primitive.into(),
            dependencies: Vec::new(),
            users: Vec::new(),
        }
    }

    /// Dependencies in input-slot order (may repeat a node)
    pub fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    /// Users of this node's output (no duplicates)
    pub fn users(&self) -> &[NodeId] {
        &self.users
    }

    /// Whether this node consumes no other node's output
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// Whether any node consumes this node's output
    pub fn has_users(&self) -> bool {
        !self.users.is_empty()
    }

    /// Whether `other` is one of this node's dependencies
    pub fn depends_on(&self, other: NodeId) -> bool {
        self.dependencies.contains(&other)
    }
}
