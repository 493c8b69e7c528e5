// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and their data-flow relations.

use crate::edge::Edge;
use crate::node::{Node, NodeId};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A compute graph
///
/// Nodes live in an arena keyed by [`NodeId`]. Edges are stored on both
/// endpoints: a user lists its dependencies in input-slot order and a
/// dependency lists its users. Every mutation goes through the graph so the
/// two directions never disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GraphData")]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in insertion order
    nodes: IndexMap<NodeId, Node>,
    /// Designated input nodes, in designation order
    inputs: IndexSet<NodeId>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            inputs: IndexSet::new(),
        }
    }

    /// Add a node to the graph
    ///
    /// Any relations carried by the node are discarded; use [`Graph::connect`].
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        node.dependencies.clear();
        node.users.clear();
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Add a node and designate it as a graph input
    pub fn add_input(&mut self, node: Node) -> NodeId {
        let id = self.add_node(node);
        self.inputs.insert(id);
        id
    }

    /// Designate an existing node as a graph input
    pub fn designate_input(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let node = self.nodes.get(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        if node.has_dependencies() {
            return Err(GraphError::InputHasDependencies(node_id));
        }
        self.inputs.insert(node_id);
        Ok(())
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let mut node = self.nodes.shift_remove(&node_id)?;
        self.inputs.shift_remove(&node_id);

        for dep in &node.dependencies {
            if let Some(dep_node) = self.nodes.get_mut(dep) {
                dep_node.users.retain(|u| *u != node_id);
            }
        }
        for user in &node.users {
            if let Some(user_node) = self.nodes.get_mut(user) {
                user_node.dependencies.retain(|d| *d != node_id);
            }
        }

        tracing::trace!(
            node = %node.name,
            dependencies = node.dependencies.len(),
            users = node.users.len(),
            "removed node"
        );
        node.dependencies.clear();
        node.users.clear();
        Some(node)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Check whether a node belongs to this graph
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Dependencies of a node in input-slot order
    ///
    /// Unknown handles have no edges and yield an empty slice.
    pub fn dependencies(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes.get(&node_id).map_or(&[][..], Node::dependencies)
    }

    /// Users of a node in connection order
    ///
    /// Unknown handles have no edges and yield an empty slice.
    pub fn users(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes.get(&node_id).map_or(&[][..], Node::users)
    }

    /// Designated input nodes in designation order
    pub fn inputs(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inputs.iter().copied()
    }

    /// Check whether a node is a designated input
    pub fn is_input(&self, node_id: NodeId) -> bool {
        self.inputs.contains(&node_id)
    }

    /// Connect `dependency`'s output to the next input slot of `user`
    pub fn connect(&mut self, dependency: NodeId, user: NodeId) -> Result<Edge, GraphError> {
        if !self.nodes.contains_key(&dependency) {
            return Err(GraphError::NodeNotFound(dependency));
        }
        if !self.nodes.contains_key(&user) {
            return Err(GraphError::NodeNotFound(user));
        }
        if dependency == user {
            return Err(GraphError::SelfLoop(user));
        }
        if self.inputs.contains(&user) {
            return Err(GraphError::UserIsInput(user));
        }

        let user_node = self.nodes.get_mut(&user)
            .ok_or(GraphError::NodeNotFound(user))?;
        user_node.dependencies.push(dependency);
        let slot = user_node.dependencies.len() - 1;

        let dep_node = self.nodes.get_mut(&dependency)
            .ok_or(GraphError::NodeNotFound(dependency))?;
        if !dep_node.users.contains(&user) {
            dep_node.users.push(user);
        }

        Ok(Edge::new(dependency, user, slot))
    }

    /// Remove one `dependency -> user` edge
    ///
    /// Returns `false` if no such edge exists. When the dependency feeds
    /// several slots of the user, only the last one is removed.
    pub fn disconnect(&mut self, dependency: NodeId, user: NodeId) -> bool {
        let Some(user_node) = self.nodes.get_mut(&user) else {
            return false;
        };
        let Some(slot) = user_node.dependencies.iter().rposition(|d| *d == dependency) else {
            return false;
        };
        user_node.dependencies.remove(slot);
        let still_connected = user_node.depends_on(dependency);

        if !still_connected {
            if let Some(dep_node) = self.nodes.get_mut(&dependency) {
                dep_node.users.retain(|u| *u != user);
            }
        }
        true
    }

    /// Get all edges, grouped by user in insertion order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes.values().flat_map(|node| {
            node.dependencies
                .iter()
                .enumerate()
                .map(move |(slot, dep)| Edge::new(*dep, node.id, slot))
        })
    }

    /// Get edges involving a node
    pub fn edges_for_node(&self, node_id: NodeId) -> impl Iterator<Item = Edge> + '_ {
        self.edges().filter(move |e| e.involves_node(node_id))
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.dependencies.len()).sum()
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, GraphError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Deserialize from RON format, rebuilding the user relation
    pub fn from_ron(s: &str) -> Result<Self, GraphError> {
        let data: GraphData = ron::from_str(s)?;
        Self::try_from(data)
    }

    /// Save graph to file
    pub fn save(&self, path: &Path) -> Result<(), GraphError> {
        let content = self.to_ron()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load graph from file
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path)?;
        let graph = Self::from_ron(&content)?;
        tracing::debug!(
            graph = %graph.name,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded graph from {}",
            path.display()
        );
        Ok(graph)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// On-disk shape of a graph; users are derived, not stored
#[derive(Deserialize)]
struct GraphData {
    name: String,
    nodes: IndexMap<NodeId, Node>,
    #[serde(default)]
    inputs: IndexSet<NodeId>,
}

impl TryFrom<GraphData> for Graph {
    type Error = GraphError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        let GraphData { name, mut nodes, inputs } = data;

        let mut edges = Vec::new();
        for (key, node) in &nodes {
            if *key != node.id {
                return Err(GraphError::Corrupt(format!(
                    "node '{}' stored under a foreign key",
                    node.name
                )));
            }
            for dep in &node.dependencies {
                if *dep == node.id {
                    return Err(GraphError::SelfLoop(node.id));
                }
                if !nodes.contains_key(dep) {
                    return Err(GraphError::Corrupt(format!(
                        "node '{}' depends on unknown node {:?}",
                        node.name, dep
                    )));
                }
                edges.push((*dep, node.id));
            }
        }

        for node in nodes.values_mut() {
            node.users.clear();
        }
        for (dep, user) in edges {
            if let Some(dep_node) = nodes.get_mut(&dep) {
                if !dep_node.users.contains(&user) {
                    dep_node.users.push(user);
                }
            }
        }

        for input in &inputs {
            match nodes.get(input) {
                None => {
                    return Err(GraphError::Corrupt(format!(
                        "unknown input node {input:?}"
                    )))
                }
                Some(node) if node.has_dependencies() => {
                    return Err(GraphError::InputHasDependencies(*input))
                }
                Some(_) => {}
            }
        }

        Ok(Self { name, nodes, inputs })
    }
}

/// Error when editing, loading or saving a graph
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed on node {0:?}")]
    SelfLoop(NodeId),

    /// Designated inputs cannot consume other nodes
    #[error("Input node cannot have dependencies: {0:?}")]
    UserIsInput(NodeId),

    /// Node with dependencies cannot be designated as an input
    #[error("Node with dependencies cannot be an input: {0:?}")]
    InputHasDependencies(NodeId),

    /// Serialized graph is inconsistent
    #[error("Corrupt graph: {0}")]
    Corrupt(String),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON serialization failure
    #[error("RON serialization error: {0}")]
    Ron(#[from] ron::Error),

    /// RON parse failure
    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
