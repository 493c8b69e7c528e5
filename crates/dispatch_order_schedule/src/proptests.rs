// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property tests over random DAGs.
//!
//! Edges always run from a lower to a higher creation index, so creation
//! order is itself topological and serves as the reference.

use crate::{compute_topological_order, level_order, ProcessingOrder, ScheduleOptions, Scheduler};
use dispatch_order_graph::{Graph, Node, NodeId};
use proptest::prelude::*;
use std::collections::HashSet;

type DagShape = (usize, Vec<(usize, usize)>, Vec<bool>);

fn dag_strategy() -> impl Strategy<Value = DagShape> {
    (1..40usize).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n), 0..n * 3),
            prop::collection::vec(any::<bool>(), n),
        )
    })
}

/// Sources are designated as inputs when `designate` says so (or always,
/// when `all_sources` is set). Node 0 is always an input.
fn build((n, edges, designate): &DagShape, all_sources: bool) -> (Graph, Vec<NodeId>) {
    let mut graph = Graph::new("random");
    let ids: Vec<NodeId> = (0..*n)
        .map(|i| graph.add_node(Node::new(format!("n{i}"), "eltwise")))
        .collect();
    for (a, b) in edges {
        let (lo, hi) = (*a.min(b), *a.max(b));
        if lo != hi {
            graph.connect(ids[lo], ids[hi]).unwrap();
        }
    }
    for (i, id) in ids.iter().enumerate() {
        let wanted = i == 0 || all_sources || designate[i];
        if wanted && graph.dependencies(*id).is_empty() {
            graph.designate_input(*id).unwrap();
        }
    }
    (graph, ids)
}

fn reachable(graph: &Graph) -> HashSet<NodeId> {
    let mut seen: HashSet<NodeId> = graph.inputs().collect();
    let mut stack: Vec<NodeId> = seen.iter().copied().collect();
    while let Some(node) = stack.pop() {
        for user in graph.users(node) {
            if seen.insert(*user) {
                stack.push(*user);
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn test_order_respects_every_edge(dag in dag_strategy()) {
        let (graph, _) = build(&dag, false);
        let order = ProcessingOrder::calculate(&graph).unwrap();
        for edge in graph.edges() {
            if let (Some(d), Some(u)) = (
                order.processing_number(edge.dependency),
                order.processing_number(edge.user),
            ) {
                prop_assert!(d < u);
            }
        }
    }

    #[test]
    fn test_order_holds_exactly_the_reachable_nodes(dag in dag_strategy()) {
        let (graph, _) = build(&dag, false);
        let order = compute_topological_order(&graph).unwrap();
        let scheduled: HashSet<NodeId> = order.iter().copied().collect();
        prop_assert_eq!(scheduled.len(), order.len());
        prop_assert_eq!(scheduled, reachable(&graph));
    }

    #[test]
    fn test_every_node_is_correct_after_ordering_and_leveling(dag in dag_strategy()) {
        let (graph, _) = build(&dag, false);
        let mut order = ProcessingOrder::calculate(&graph).unwrap();
        prop_assert!(order.iter().all(|n| order.is_correct(&graph, *n)));

        order.level(&graph);
        prop_assert!(order.iter().all(|n| order.is_correct(&graph, *n)));
    }

    #[test]
    fn test_verified_schedule_accepts_undesignated_sources(dag in dag_strategy()) {
        let (graph, _) = build(&dag, false);
        let scheduler = Scheduler::new(ScheduleOptions {
            leveled: true,
            verify: true,
            require_complete: false,
        });
        let schedule = scheduler.schedule(&graph).unwrap();
        prop_assert_eq!(
            schedule.order.len() + schedule.order.unscheduled(&graph).len(),
            graph.node_count()
        );
    }

    #[test]
    fn test_distance_is_longest_path(dag in dag_strategy()) {
        let (graph, ids) = build(&dag, true);
        let mut longest = vec![0usize; ids.len()];
        for (j, id) in ids.iter().enumerate() {
            for dep in graph.dependencies(*id) {
                let i = ids.iter().position(|x| x == dep).unwrap();
                longest[j] = longest[j].max(longest[i] + 1);
            }
        }

        let order = compute_topological_order(&graph).unwrap();
        let leveling = level_order(&graph, &order);
        for (j, id) in ids.iter().enumerate() {
            prop_assert_eq!(leveling.distance(*id), Some(longest[j]));
        }
    }

    #[test]
    fn test_releveling_keeps_buckets(dag in dag_strategy()) {
        let (graph, _) = build(&dag, true);
        let order = compute_topological_order(&graph).unwrap();
        let first = level_order(&graph, &order);
        let second = level_order(&graph, &first.order().collect::<Vec<_>>());

        let as_sets = |buckets: &[Vec<NodeId>]| -> Vec<HashSet<NodeId>> {
            buckets.iter().map(|b| b.iter().copied().collect()).collect()
        };
        prop_assert_eq!(as_sets(first.buckets()), as_sets(second.buckets()));
    }
}
