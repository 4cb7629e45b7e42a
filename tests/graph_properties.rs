//! Property-based tests for network graphs
//!
//! Invariants that should hold for all generated networks:
//! - Transposing twice yields the original graph
//! - In-degrees and out-degrees both sum to the edge count
//! - A topological sort of an acyclic graph respects every edge
//! - `is_successor` agrees with `successors`
//! - Cycle detection agrees with petgraph

use petgraph::algo::is_cyclic_directed;
use procgraph::prelude::*;
use proptest::prelude::*;
use std::collections::HashMap;

// ============================================================================
// Generators
// ============================================================================

/// A network with `n` processors and the given (from, to) connections.
fn build_network(n: usize, edges: &[(usize, usize)]) -> (ProcessorNetwork, Vec<ProcessorId>) {
    let mut network = ProcessorNetwork::new();
    let ids: Vec<ProcessorId> = (0..n)
        .map(|i| {
            network
                .add_processor(
                    Processor::new(format!("p{}", i))
                        .with_port(PortDefinition::input("in", PortKind::Generic))
                        .with_port(PortDefinition::output("out", PortKind::Generic)),
                )
                .unwrap()
        })
        .collect();
    for &(from, to) in edges {
        // duplicate pairs are rejected by the network; ignore them
        let _ = network.connect_ports(ids[from], "out", ids[to], "in");
    }
    (network, ids)
}

/// Arbitrary directed graphs, self-loops and cycles included.
fn arb_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..12).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..30)))
}

/// Acyclic graphs: every edge points from a lower to a higher index.
fn arb_dag() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    arb_graph().prop_map(|(n, edges)| {
        let edges = edges
            .into_iter()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        (n, edges)
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_double_transpose_is_identity((n, edges) in arb_graph()) {
        let (network, _) = build_network(n, &edges);
        let graph = NetworkGraph::new(&network);

        prop_assert_eq!(graph.to_transposed().to_transposed(), graph.clone());
        prop_assert_eq!(graph.transposed().edge_count(), graph.edge_count());
    }

    #[test]
    fn prop_degree_sums_match_edge_count((n, edges) in arb_graph()) {
        let (network, _) = build_network(n, &edges);
        let graph = NetworkGraph::new(&network);

        let in_total: usize = graph.nodes().iter().map(GraphNode::in_degree).sum();
        let out_total: usize = graph.nodes().iter().map(GraphNode::out_degree).sum();
        prop_assert_eq!(in_total, graph.edge_count());
        prop_assert_eq!(out_total, graph.edge_count());
        prop_assert_eq!(graph.edge_count(), network.connection_count());
    }

    #[test]
    fn prop_topological_order_respects_edges((n, edges) in arb_dag()) {
        let (network, _) = build_network(n, &edges);
        let graph = NetworkGraph::new(&network);

        let order = graph.try_sort_topologically(&[]).unwrap();
        prop_assert_eq!(order.len(), n);

        let position: HashMap<ProcessorId, usize> =
            order.iter().enumerate().map(|(i, &p)| (p, i)).collect();
        for connection in network.connections() {
            prop_assert!(position[&connection.from.processor] < position[&connection.to.processor]);
        }
    }

    #[test]
    fn prop_is_successor_matches_successors((n, edges) in arb_graph()) {
        let (network, ids) = build_network(n, &edges);
        let graph = NetworkGraph::new(&network);

        for &a in &ids {
            let successors = graph.successors(a);
            prop_assert!(successors.contains(&a));
            for &b in &ids {
                prop_assert_eq!(graph.is_successor(a, b), successors.contains(&b));
                prop_assert_eq!(successors.contains(&b), graph.predecessors(b).contains(&a));
            }
        }
    }

    #[test]
    fn prop_cycle_detection_agrees_with_petgraph((n, edges) in arb_graph()) {
        let (network, _) = build_network(n, &edges);
        let graph = NetworkGraph::new(&network);

        prop_assert_eq!(graph.has_cycle(), is_cyclic_directed(&graph.to_digraph()));
    }

    #[test]
    fn prop_full_traversals_visit_every_node((n, edges) in arb_graph()) {
        let (network, _) = build_network(n, &edges);
        let graph = NetworkGraph::new(&network);

        let mut collector = CollectSuccessorsVisitor::new();
        let bfs = graph.full_traverse_breadth_first(Some(&mut collector));
        prop_assert_eq!(collector.successors_ordered().len(), graph.node_count());
        prop_assert_eq!(bfs.discovery_order().len(), graph.node_count());

        let dfs = graph.full_traverse_depth_first(None, None);
        for node in graph.nodes() {
            let id = node.id().unwrap();
            prop_assert!(dfs.discovery_time(id) < dfs.finishing_time(id));
        }
    }
}
