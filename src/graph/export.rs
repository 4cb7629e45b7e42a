//! Conversion to petgraph and Graphviz DOT.

use crate::core::error::ProcessorId;
use crate::graph::network_graph::NetworkGraph;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};

impl NetworkGraph<'_> {
    /// Copy the graph into a petgraph `DiGraph`.
    ///
    /// Node indices equal the node ids of this graph.
    pub fn to_digraph(&self) -> DiGraph<ProcessorId, ()> {
        let mut graph = DiGraph::with_capacity(self.node_count(), self.edge_count());
        for node in self.nodes() {
            graph.add_node(node.processor());
        }
        for (index, node) in self.nodes().iter().enumerate() {
            for successor in node.successors() {
                graph.add_edge(NodeIndex::new(index), NodeIndex::new(successor.index()), ());
            }
        }
        graph
    }

    /// Render the graph in Graphviz DOT format.
    ///
    /// Nodes are labelled with the processor name and the node id, so copies
    /// created by loop unrolling stay distinguishable.
    pub fn to_dot(&self) -> String {
        let network = self.network();
        let labelled = self.to_digraph().map(
            |index, processor| format!("{} #{}", network.display_name(*processor), index.index()),
            |_, _| "",
        );
        format!("{}", Dot::with_config(&labelled, &[Config::EdgeNoLabel]))
    }
}
