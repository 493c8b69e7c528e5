// SPDX-License-Identifier: MIT OR Apache-2.0
//! Topological ordering of a compute graph.
//!
//! The order is a depth-first post-order over the *users* relation, started
//! from each designated input and then reversed. A node is emitted only once
//! everything consuming its output (transitively) has been emitted, so after
//! the reversal producers precede consumers.
//!
//! Nodes that cannot be reached from any designated input are left out of
//! the order. This is not an error: callers that need every node scheduled
//! should compare against the graph, see
//! [`ProcessingOrder::unscheduled`](crate::ProcessingOrder::unscheduled).

use dispatch_order_graph::{Graph, NodeId};
use std::collections::HashMap;

/// Per-traversal node state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current DFS path
    InProgress,
    /// Emitted
    Finished,
}

/// Compute a topological order of every node reachable from the graph inputs
///
/// Inputs are traversed in designation order and users in connection order,
/// so the result is deterministic for a given graph. Runs in O(V + E) with an
/// explicit work stack, so deep chains do not exhaust the native stack.
///
/// Returns [`OrderingError::CycleDetected`] naming the node that closed a
/// cycle if one is reachable from an input.
pub fn compute_topological_order(graph: &Graph) -> Result<Vec<NodeId>, OrderingError> {
    let mut marks: HashMap<NodeId, Mark> = HashMap::with_capacity(graph.node_count());
    let mut finished = Vec::with_capacity(graph.node_count());
    // (node, index of the next user to visit)
    let mut stack: Vec<(NodeId, usize)> = Vec::new();

    for input in graph.inputs() {
        if marks.contains_key(&input) {
            continue;
        }
        marks.insert(input, Mark::InProgress);
        stack.push((input, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            match graph.users(node).get(next).copied() {
                Some(user) => {
                    frame.1 += 1;
                    match marks.get(&user) {
                        Some(Mark::Finished) => {}
                        Some(Mark::InProgress) => {
                            tracing::debug!(node = ?user, "cycle closed during ordering");
                            return Err(OrderingError::CycleDetected(user));
                        }
                        None => {
                            marks.insert(user, Mark::InProgress);
                            stack.push((user, 0));
                        }
                    }
                }
                None => {
                    stack.pop();
                    marks.insert(node, Mark::Finished);
                    finished.push(node);
                }
            }
        }
    }

    finished.reverse();
    tracing::debug!(
        graph = %graph.name,
        scheduled = finished.len(),
        total = graph.node_count(),
        "computed topological order"
    );
    Ok(finished)
}

/// Error produced while building or editing a processing order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderingError {
    /// A cycle is reachable from a graph input
    #[error("Graph contains a cycle through node {0:?}")]
    CycleDetected(NodeId),

    /// The same node appears twice in an order
    #[error("Node appears more than once in the order: {0:?}")]
    DuplicateNode(NodeId),

    /// Node is not part of the order
    #[error("Node is not scheduled: {0:?}")]
    NotScheduled(NodeId),

    /// Node is already part of the order
    #[error("Node is already scheduled: {0:?}")]
    AlreadyScheduled(NodeId),

    /// A node is scheduled before one of its dependencies
    #[error("Node {node:?} is scheduled before its dependency {dependency:?}")]
    Misordered {
        /// The misplaced node
        node: NodeId,
        /// The dependency it precedes (or that is missing from the order)
        dependency: NodeId,
    },

    /// Some graph nodes were left out of the order
    #[error("{} node(s) are not reachable from any input", .0.len())]
    Incomplete(Vec<NodeId>),
}
