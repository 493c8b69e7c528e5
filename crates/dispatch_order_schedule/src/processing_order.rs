// SPDX-License-Identifier: MIT OR Apache-2.0
//! Processing order with its position index kept in lock-step.

use crate::leveling::{level_order, Leveling};
use crate::ordering::{compute_topological_order, OrderingError};
use crate::position::PositionIndex;
use crate::validation::{find_violations, is_correct, verify_order, Violation};
use dispatch_order_graph::{Graph, NodeId};
use std::collections::HashSet;

/// The order in which graph nodes are dispatched
///
/// Every edit rebuilds the position index before returning, so lookups
/// always describe the current order. Rebuilding is O(V); optimization
/// passes that edit the graph itself should call
/// [`ProcessingOrder::calculate`] again instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingOrder {
    order: Vec<NodeId>,
    index: PositionIndex,
}

impl ProcessingOrder {
    /// Compute a topological processing order for `graph`
    pub fn calculate(graph: &Graph) -> Result<Self, OrderingError> {
        let order = compute_topological_order(graph)?;
        let index = PositionIndex::rebuild(&order);
        Ok(Self { order, index })
    }

    /// Wrap an existing order, rejecting duplicates
    ///
    /// The order is not checked against any graph; see [`Self::verify`].
    pub fn from_nodes(order: Vec<NodeId>) -> Result<Self, OrderingError> {
        let mut seen = HashSet::with_capacity(order.len());
        if let Some(dup) = order.iter().find(|id| !seen.insert(**id)) {
            return Err(OrderingError::DuplicateNode(*dup));
        }
        let index = PositionIndex::rebuild(&order);
        Ok(Self { order, index })
    }

    /// Replace the order with its critical-path leveling
    ///
    /// The current order should be topological; see [`level_order`].
    pub fn level(&mut self, graph: &Graph) -> Leveling {
        let leveling = level_order(graph, &self.order);
        self.order = leveling.order().collect();
        self.rebuild_index();
        leveling
    }

    /// Nodes in processing order
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    /// Iterate nodes in processing order
    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.order.iter()
    }

    /// Number of scheduled nodes
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is scheduled
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check whether a node is scheduled
    pub fn contains(&self, node: NodeId) -> bool {
        self.index.contains(node)
    }

    /// Slot of `node` in the order
    pub fn processing_number(&self, node: NodeId) -> Option<usize> {
        self.index.index_of(node)
    }

    /// Whether `a` is processed strictly before `b`
    pub fn is_before(&self, a: NodeId, b: NodeId) -> Option<bool> {
        self.index.is_before(a, b)
    }

    /// The position index for the current order
    pub fn position_index(&self) -> &PositionIndex {
        &self.index
    }

    /// Schedule `node` immediately before `anchor`
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) -> Result<(), OrderingError> {
        let slot = self.slot_for_insert(anchor, node)?;
        self.order.insert(slot, node);
        self.rebuild_index();
        Ok(())
    }

    /// Schedule `node` immediately after `anchor`
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> Result<(), OrderingError> {
        let slot = self.slot_for_insert(anchor, node)?;
        self.order.insert(slot + 1, node);
        self.rebuild_index();
        Ok(())
    }

    /// Schedule `node` last
    pub fn push_back(&mut self, node: NodeId) -> Result<(), OrderingError> {
        if self.contains(node) {
            return Err(OrderingError::AlreadyScheduled(node));
        }
        self.order.push(node);
        self.rebuild_index();
        Ok(())
    }

    /// Remove `node` from the order, returning whether it was scheduled
    pub fn erase(&mut self, node: NodeId) -> bool {
        let Some(slot) = self.index.index_of(node) else {
            return false;
        };
        self.order.remove(slot);
        self.rebuild_index();
        true
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.order.clear();
        self.index = PositionIndex::default();
    }

    /// Check that `node` is not processed before any of its dependencies
    pub fn is_correct(&self, graph: &Graph, node: NodeId) -> bool {
        is_correct(graph, node, &self.index)
    }

    /// Every scheduled node processed before one of its dependencies
    pub fn violations(&self, graph: &Graph) -> Vec<Violation> {
        find_violations(graph, &self.order, &self.index)
    }

    /// Verify every scheduled node, failing on the first violation
    pub fn verify(&self, graph: &Graph) -> Result<(), OrderingError> {
        verify_order(graph, &self.order, &self.index)
    }

    /// Graph nodes missing from the order, in graph insertion order
    pub fn unscheduled(&self, graph: &Graph) -> Vec<NodeId> {
        graph.node_ids().filter(|id| !self.contains(*id)).collect()
    }

    fn slot_for_insert(&self, anchor: NodeId, node: NodeId) -> Result<usize, OrderingError> {
        if self.contains(node) {
            return Err(OrderingError::AlreadyScheduled(node));
        }
        self.index
            .index_of(anchor)
            .ok_or(OrderingError::NotScheduled(anchor))
    }

    fn rebuild_index(&mut self) {
        self.index = PositionIndex::rebuild(&self.order);
    }
}

impl<'a> IntoIterator for &'a ProcessingOrder {
    type Item = &'a NodeId;
    type IntoIter = std::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{chain, diamond};
    use dispatch_order_graph::Node;

    #[test]
    fn test_calculate_indexes_every_node() {
        let (graph, [a, b, c, d]) = diamond();
        let order = ProcessingOrder::calculate(&graph).unwrap();
        assert_eq!(order.len(), 4);
        for (slot, id) in order.iter().enumerate() {
            assert_eq!(order.processing_number(*id), Some(slot));
        }
        assert_eq!(order.is_before(a, d), Some(true));
        assert_eq!(order.is_before(d, b), Some(false));
        assert!(order.contains(c));
        assert_eq!(order.verify(&graph), Ok(()));
    }

    #[test]
    fn test_level_keeps_index_consistent() {
        let (graph, [a, b, c, d]) = diamond();
        let mut order = ProcessingOrder::calculate(&graph).unwrap();
        let leveling = order.level(&graph);

        assert_eq!(leveling.max_distance(), Some(2));
        assert_eq!(order.processing_number(a), Some(0));
        assert_eq!(order.processing_number(d), Some(3));
        assert!(order.processing_number(b).is_some_and(|p| p == 1 || p == 2));
        assert!(order.processing_number(c).is_some_and(|p| p == 1 || p == 2));
        assert!(order.iter().all(|n| order.is_correct(&graph, *n)));
    }

    #[test]
    fn test_insert_and_erase() {
        let mut graph = Graph::new("edit");
        let ids = chain(&mut graph, &["a", "b", "c"]);
        let mut order = ProcessingOrder::calculate(&graph).unwrap();

        // A pass splices a reorder between `a` and `b`.
        let reorder = graph.add_node(Node::new("reorder", "reorder"));
        graph.disconnect(ids[0], ids[1]);
        graph.connect(ids[0], reorder).unwrap();
        graph.connect(reorder, ids[1]).unwrap();
        order.insert_after(ids[0], reorder).unwrap();
        assert_eq!(order.nodes(), &[ids[0], reorder, ids[1], ids[2]]);
        assert_eq!(order.processing_number(ids[2]), Some(3));
        assert_eq!(order.verify(&graph), Ok(()));

        assert!(order.erase(reorder));
        assert!(!order.erase(reorder));
        assert_eq!(order.processing_number(ids[1]), Some(1));
        assert_eq!(order.processing_number(reorder), None);
        assert!(order.is_correct(&graph, ids[1]));
        assert_eq!(order.unscheduled(&graph), vec![reorder]);

        order.insert_before(ids[1], reorder).unwrap();
        assert_eq!(order.processing_number(reorder), Some(1));
        assert!(order.violations(&graph).is_empty());
    }

    #[test]
    fn test_edit_errors() {
        let mut graph = Graph::new("edit");
        let ids = chain(&mut graph, &["a", "b"]);
        let mut order = ProcessingOrder::calculate(&graph).unwrap();
        let stranger = NodeId::new();

        assert_eq!(
            order.insert_before(ids[0], ids[1]),
            Err(OrderingError::AlreadyScheduled(ids[1]))
        );
        assert_eq!(
            order.insert_after(stranger, NodeId::new()),
            Err(OrderingError::NotScheduled(stranger))
        );
        assert_eq!(order.push_back(ids[0]), Err(OrderingError::AlreadyScheduled(ids[0])));
        order.push_back(stranger).unwrap();
        assert_eq!(order.processing_number(stranger), Some(2));
    }

    #[test]
    fn test_from_nodes_rejects_duplicates() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_eq!(
            ProcessingOrder::from_nodes(vec![a, b, a]),
            Err(OrderingError::DuplicateNode(a))
        );
        let order = ProcessingOrder::from_nodes(vec![b, a]).unwrap();
        assert_eq!(order.processing_number(a), Some(1));
    }

    #[test]
    fn test_unscheduled_reports_orphans() {
        let mut graph = Graph::new("orphan");
        chain(&mut graph, &["a", "b"]);
        let orphan = graph.add_node(Node::new("orphan", "data"));
        let mut order = ProcessingOrder::calculate(&graph).unwrap();
        assert_eq!(order.unscheduled(&graph), vec![orphan]);

        order.clear();
        assert!(order.is_empty());
        assert!(order.position_index().is_empty());
        assert_eq!(order.unscheduled(&graph).len(), 3);
    }

    #[test]
    fn test_level_after_misordered_edit() {
        let mut graph = Graph::new("edit");
        let ids = chain(&mut graph, &["a", "b"]);
        let mut order = ProcessingOrder::calculate(&graph).unwrap();
        order.erase(ids[1]);
        order.insert_before(ids[0], ids[1]).unwrap();

        let leveling = order.level(&graph);
        assert_eq!(leveling.len(), 2);
        assert_eq!(order.nodes(), &[ids[0], ids[1]]);
        assert_eq!(order.verify(&graph), Ok(()));
    }

    #[test]
    fn test_misordered_edit_is_detected() {
        let (graph, [a, _, _, d]) = diamond();
        let mut order = ProcessingOrder::calculate(&graph).unwrap();
        order.erase(d);
        order.insert_before(a, d).unwrap();
        assert!(!order.is_correct(&graph, d));
        assert!(matches!(
            order.verify(&graph),
            Err(OrderingError::Misordered { node, .. }) if node == d
        ));
    }
}
