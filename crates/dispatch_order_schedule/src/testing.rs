// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph fixtures shared by unit tests.

use dispatch_order_graph::{Graph, Node, NodeId};

/// Install a fmt subscriber honouring `RUST_LOG`; repeated calls are no-ops.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `names[0] -> names[1] -> ...`, first node designated as input.
pub(crate) fn chain(graph: &mut Graph, names: &[&str]) -> Vec<NodeId> {
    let mut ids = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let id = if i == 0 {
            graph.add_input(Node::new(*name, "input_layout"))
        } else {
            let id = graph.add_node(Node::new(*name, "activation"));
            graph.connect(ids[i - 1], id).unwrap();
            id
        };
        ids.push(id);
    }
    ids
}

/// `a -> b`, `a -> c`, `b -> d`, `c -> d`.
pub(crate) fn diamond() -> (Graph, [NodeId; 4]) {
    let mut graph = Graph::new("diamond");
    let a = graph.add_input(Node::new("a", "input_layout"));
    let b = graph.add_node(Node::new("b", "activation"));
    let c = graph.add_node(Node::new("c", "activation"));
    let d = graph.add_node(Node::new("d", "eltwise"));
    graph.connect(a, b).unwrap();
    graph.connect(a, c).unwrap();
    graph.connect(b, d).unwrap();
    graph.connect(c, d).unwrap();
    (graph, [a, b, c, d])
}
