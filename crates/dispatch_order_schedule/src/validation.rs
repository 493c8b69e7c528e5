// SPDX-License-Identifier: MIT OR Apache-2.0
//! Consistency checks for a processing order.
//!
//! These are oracles for tests and debug assertions after an order is
//! built or edited, not part of the dispatch hot path.

use crate::ordering::OrderingError;
use crate::position::PositionIndex;
use dispatch_order_graph::{Graph, NodeId};

/// A node scheduled before one of its dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    /// The misplaced node
    pub node: NodeId,
    /// The dependency that is scheduled later
    pub dependency: NodeId,
}

impl From<Violation> for OrderingError {
    fn from(v: Violation) -> Self {
        OrderingError::Misordered {
            node: v.node,
            dependency: v.dependency,
        }
    }
}

/// Check that `node` is not scheduled before any of its dependencies
///
/// Only scheduled positions are compared. A dependency missing from the
/// index (e.g. a constant that no input reaches) is a completeness matter,
/// see [`ProcessingOrder::unscheduled`](crate::ProcessingOrder::unscheduled),
/// and an unscheduled node has nothing to compare against.
pub fn is_correct(graph: &Graph, node: NodeId, index: &PositionIndex) -> bool {
    first_violation(graph, node, index).is_none()
}

fn first_violation(graph: &Graph, node: NodeId, index: &PositionIndex) -> Option<Violation> {
    let position = index.index_of(node)?;
    graph
        .dependencies(node)
        .iter()
        .find(|dep| index.index_of(**dep).is_some_and(|d| position < d))
        .map(|dep| Violation {
            node,
            dependency: *dep,
        })
}

/// Collect every violation in `order`
pub fn find_violations(graph: &Graph, order: &[NodeId], index: &PositionIndex) -> Vec<Violation> {
    let mut violations = Vec::new();
    for node in order {
        let Some(position) = index.index_of(*node) else {
            continue;
        };
        for dep in graph.dependencies(*node) {
            if index.index_of(*dep).is_some_and(|d| position < d) {
                violations.push(Violation {
                    node: *node,
                    dependency: *dep,
                });
            }
        }
    }
    violations
}

/// Verify every node in `order`, failing on the first violation
pub fn verify_order(graph: &Graph, order: &[NodeId], index: &PositionIndex) -> Result<(), OrderingError> {
    for node in order {
        if let Some(violation) = first_violation(graph, *node, index) {
            tracing::debug!(
                node = ?violation.node,
                dependency = ?violation.dependency,
                "order verification failed"
            );
            return Err(violation.into());
        }
    }
    Ok(())
}
