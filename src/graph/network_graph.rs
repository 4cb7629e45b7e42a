//! Network graph construction and reachability queries.
//!
//! A NetworkGraph is the directed graph of a processor network: one node per
//! processor (more after loop unrolling) and an edge wherever an output port
//! feeds an input port. Nodes live in an arena and refer to each other by
//! [`NodeId`], so copying or transposing a graph never has to rewire
//! pointers.

use crate::config::BuildOptions;
use crate::core::error::ProcessorId;
use crate::graph::node::{GraphNode, NodeId};
use crate::graph::port_check::PortTypeCheck;
use crate::graph::traversal::CollectSuccessorsVisitor;
use crate::network::connection::Endpoint;
use crate::network::structure::ProcessorNetwork;
use log::{debug, warn};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

/// Directed graph over the processors of a [`ProcessorNetwork`].
///
/// The graph borrows the network it was built from; port-based queries
/// resolve ports and connections through it. Once built, the graph is
/// read-only: traversals keep their bookkeeping in per-call records.
pub struct NetworkGraph<'n> {
    network: &'n ProcessorNetwork,
    /// Node arena; a node's id equals its index.
    nodes: Vec<GraphNode>,
    /// Nodes wrapping each processor, in id order.
    by_processor: HashMap<ProcessorId, Vec<NodeId>>,
    /// Lazily built transposed graph.
    transposed: OnceLock<Box<NetworkGraph<'n>>>,
}

impl<'n> NetworkGraph<'n> {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Build the unrestricted graph over all processors of `network`.
    pub fn new(network: &'n ProcessorNetwork) -> Self {
        let processors: Vec<ProcessorId> = network.processor_ids().collect();
        Self::from_processors(network, &processors)
    }

    /// Build the unrestricted graph over `processors`.
    ///
    /// Every processor becomes a node and every connection between two of
    /// them becomes an edge. Loops are not unrolled.
    pub fn from_processors(network: &'n ProcessorNetwork, processors: &[ProcessorId]) -> Self {
        Self::with_checks(
            network,
            processors,
            PortTypeCheck::Accept,
            PortTypeCheck::Reject,
            &BuildOptions::default().with_keep_nodes(true),
        )
    }

    /// Build a restricted graph over `processors`.
    ///
    /// Only connections whose ports both satisfy `port_check` become edges.
    /// Connections leaving an output that satisfies `loop_check` are static
    /// loops and get unrolled.
    pub fn with_checks(
        network: &'n ProcessorNetwork,
        processors: &[ProcessorId],
        port_check: PortTypeCheck,
        loop_check: PortTypeCheck,
        options: &BuildOptions,
    ) -> Self {
        let mut graph = Self::empty(network);
        graph.build(processors, port_check, loop_check, options);
        graph
    }

    fn empty(network: &'n ProcessorNetwork) -> Self {
        Self {
            network,
            nodes: Vec::new(),
            by_processor: HashMap::new(),
            transposed: OnceLock::new(),
        }
    }

    fn build(
        &mut self,
        processors: &[ProcessorId],
        port_check: PortTypeCheck,
        loop_check: PortTypeCheck,
        options: &BuildOptions,
    ) {
        self.clear();
        let network = self.network;

        for &processor in processors {
            if self.contains_processor(processor) {
                debug!("Processor {} listed twice, keeping one node", processor);
                continue;
            }

            match network.processor(processor) {
                Some(p) if !options.keep_nodes && !port_check.has_a(p) => {
                    debug!("Dropping processor \"{}\": no matching port", p.name);
                    continue;
                }
                None if !options.keep_nodes => {
                    warn!("Processor {} is not part of the network, skipping", processor);
                    continue;
                }
                None => warn!("Processor {} is not part of the network", processor),
                Some(_) => {}
            }

            self.add_node(processor);
        }

        self.connect_nodes(port_check, loop_check);
        self.unroll_loops(loop_check, options);
    }

    /// Add edges for all connections matching `port_check`.
    ///
    /// Connections leaving an output that satisfies `loop_check` close static
    /// loops. They never become edges; unrolling chains the loop body instead.
    fn connect_nodes(&mut self, port_check: PortTypeCheck, loop_check: PortTypeCheck) {
        let network = self.network;

        for index in 0..self.nodes.len() {
            self.clear_successors(NodeId(index));
        }
        for node in &mut self.nodes {
            node.in_degree = 0;
        }

        for index in 0..self.nodes.len() {
            let source = NodeId(index);
            let Some(processor) = network.processor(self.nodes[index].processor) else {
                continue;
            };

            for port in processor.outputs().filter(|p| port_check.is_a(p)) {
                let endpoint = Endpoint::new(processor.id, port.name.clone());
                if loop_check.is_a(port) {
                    debug!("Not adding edges for loop port {}", endpoint);
                    continue;
                }
                for target in network.connected(&endpoint) {
                    match network.port(target) {
                        Some(target_port) if port_check.is_a(target_port) => {}
                        Some(_) => continue,
                        None => {
                            warn!("Connection from {} ends at unknown port {}", endpoint, target);
                            continue;
                        }
                    }

                    let targets = self.nodes_of(target.processor).to_vec();
                    if targets.is_empty() {
                        debug!(
                            "Connection {} -> {} leaves the graph",
                            endpoint, target
                        );
                    }
                    if targets.len() > 1 {
                        warn!(
                            "More than one graph node for processor \"{}\"",
                            network.display_name(target.processor)
                        );
                    }
                    for target_node in targets {
                        self.add_edge(source, target_node);
                    }
                }
            }
        }
    }

    // ========================================================================
    // Mutation (construction only)
    // ========================================================================

    /// Append a node for `processor` and return its id.
    pub(crate) fn add_node(&mut self, processor: ProcessorId) -> NodeId {
        self.invalidate_transposed();
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode::with_id(processor, id));
        self.by_processor.entry(processor).or_default().push(id);
        id
    }

    /// Add the edge `from -> to`.
    ///
    /// Returns false if either node is unknown or the edge already exists.
    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        if from.index() >= self.nodes.len() || to.index() >= self.nodes.len() {
            return false;
        }
        if !self.nodes[from.index()].push_successor(to) {
            return false;
        }
        self.invalidate_transposed();
        self.nodes[to.index()].in_degree += 1;
        true
    }

    /// Remove all outgoing edges of `node`.
    pub(crate) fn clear_successors(&mut self, node: NodeId) {
        let Some(n) = self.nodes.get_mut(node.index()) else {
            return;
        };
        let successors = std::mem::take(&mut n.successors);
        n.out_degree = 0;
        if successors.is_empty() {
            return;
        }

        self.invalidate_transposed();
        for s in successors {
            let target = &mut self.nodes[s.index()];
            target.in_degree = target.in_degree.saturating_sub(1);
        }
    }

    fn clear(&mut self) {
        self.invalidate_transposed();
        self.nodes.clear();
        self.by_processor.clear();
    }

    fn invalidate_transposed(&mut self) {
        self.transposed.take();
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// The network this graph was built from.
    pub fn network(&self) -> &'n ProcessorNetwork {
        self.network
    }

    /// All nodes, in id order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.index())
    }

    /// Nodes wrapping `processor`, in id order.
    pub fn nodes_of(&self, processor: ProcessorId) -> &[NodeId] {
        self.by_processor
            .get(&processor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(GraphNode::out_degree).sum()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check whether some node wraps `processor`.
    pub fn contains_processor(&self, processor: ProcessorId) -> bool {
        !self.nodes_of(processor).is_empty()
    }

    /// Check whether some node of `from` has a direct edge to some node of `to`.
    pub fn has_edge_between(&self, from: ProcessorId, to: ProcessorId) -> bool {
        let targets = self.nodes_of(to);
        self.nodes_of(from).iter().any(|&n| {
            self.nodes[n.index()]
                .successors()
                .iter()
                .any(|s| targets.contains(s))
        })
    }

    /// All distinct processors of this graph.
    ///
    /// With `sort_by_id` the processors are ordered by their first node's id
    /// (insertion order); otherwise the order is unspecified.
    pub fn processors(&self, sort_by_id: bool) -> Vec<ProcessorId> {
        if !sort_by_id {
            return self.by_processor.keys().copied().collect();
        }

        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .map(GraphNode::processor)
            .filter(|p| seen.insert(*p))
            .collect()
    }

    /// Re-derive a restricted graph from the processors of this graph.
    pub fn sub_graph(
        &self,
        port_check: PortTypeCheck,
        loop_check: PortTypeCheck,
        options: &BuildOptions,
    ) -> NetworkGraph<'n> {
        NetworkGraph::with_checks(
            self.network,
            &self.processors(true),
            port_check,
            loop_check,
            options,
        )
    }

    /// The transposed graph, built on first use and cached.
    ///
    /// The cache belongs to this graph; use [`to_transposed`](Self::to_transposed)
    /// for an independent copy.
    pub fn transposed(&self) -> &NetworkGraph<'n> {
        self.transposed
            .get_or_init(|| Box::new(self.to_transposed()))
    }

    /// Build a new graph with every edge reversed. Node ids are kept.
    pub fn to_transposed(&self) -> NetworkGraph<'n> {
        let mut transposed = Self::empty(self.network);
        transposed.nodes = self.nodes.iter().map(GraphNode::detached).collect();
        transposed.by_processor = self.by_processor.clone();

        for (index, node) in self.nodes.iter().enumerate() {
            for &successor in node.successors() {
                transposed.add_edge(successor, NodeId(index));
            }
        }
        transposed
    }

    // ========================================================================
    // Reachability
    // ========================================================================

    /// Nodes reachable from `starts`, the start nodes included.
    pub(crate) fn reachable_nodes(&self, starts: &[NodeId]) -> BTreeSet<NodeId> {
        let mut collector = CollectSuccessorsVisitor::new();
        self.breadth_first_from_all(starts, &mut collector);
        collector.successors().iter().copied().collect()
    }

    /// Nodes lying on some path from `from` to `to`, both ends included.
    pub(crate) fn path_nodes(&self, from: &[NodeId], to: &[NodeId]) -> BTreeSet<NodeId> {
        let forward = self.reachable_nodes(from);
        if forward.is_empty() {
            return forward;
        }
        let backward = self.transposed().reachable_nodes(to);
        forward.intersection(&backward).copied().collect()
    }

    fn processors_of_nodes(&self, nodes: &BTreeSet<NodeId>) -> HashSet<ProcessorId> {
        nodes.iter().map(|n| self.nodes[n.index()].processor).collect()
    }

    fn nodes_of_all<I>(&self, processors: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = ProcessorId>,
    {
        processors
            .into_iter()
            .flat_map(|p| self.nodes_of(p).iter().copied())
            .collect()
    }

    /// Processors reachable from `processor`, including itself.
    pub fn successors(&self, processor: ProcessorId) -> HashSet<ProcessorId> {
        self.successors_of([processor])
    }

    /// Processors reachable from any of `processors`, including themselves.
    ///
    /// Processors that are not part of the graph contribute nothing.
    pub fn successors_of<I>(&self, processors: I) -> HashSet<ProcessorId>
    where
        I: IntoIterator<Item = ProcessorId>,
    {
        let starts = self.nodes_of_all(processors);
        self.processors_of_nodes(&self.reachable_nodes(&starts))
    }

    /// Processors from which `processor` is reachable, including itself.
    pub fn predecessors(&self, processor: ProcessorId) -> HashSet<ProcessorId> {
        self.predecessors_of([processor])
    }

    /// Processors from which any of `processors` is reachable, including
    /// themselves.
    pub fn predecessors_of<I>(&self, processors: I) -> HashSet<ProcessorId>
    where
        I: IntoIterator<Item = ProcessorId>,
    {
        self.transposed().successors_of(processors)
    }

    /// Processors reachable through the connections of `port`.
    ///
    /// For an output port this starts at the processors the port feeds
    /// directly (over edges of this graph), which are included. An input
    /// port resolves to its owner.
    pub fn port_successors(&self, port: &Endpoint) -> HashSet<ProcessorId> {
        let Some(definition) = self.network.port(port) else {
            warn!("port_successors(): unknown port {}", port);
            return HashSet::new();
        };
        if definition.is_input() {
            return self.successors(port.processor);
        }

        let reachable = self.successors(port.processor);
        let direct: Vec<ProcessorId> = self
            .network
            .connected(port)
            .map(|e| e.processor)
            .filter(|p| reachable.contains(p))
            .collect();
        self.successors_of(direct)
    }

    /// Processors from which the connections of `port` are reachable.
    ///
    /// For an input port this starts at the processors feeding the port
    /// directly (over edges of this graph), which are included. An output
    /// port resolves to its owner.
    pub fn port_predecessors(&self, port: &Endpoint) -> HashSet<ProcessorId> {
        let Some(definition) = self.network.port(port) else {
            warn!("port_predecessors(): unknown port {}", port);
            return HashSet::new();
        };
        if definition.is_output() {
            return self.predecessors(port.processor);
        }

        let reaching = self.predecessors(port.processor);
        let direct: Vec<ProcessorId> = self
            .network
            .connected(port)
            .map(|e| e.processor)
            .filter(|p| reaching.contains(p))
            .collect();
        self.predecessors_of(direct)
    }

    /// Check whether `successor` is reachable from `predecessor`.
    ///
    /// Every processor of the graph is its own successor.
    pub fn is_successor(&self, predecessor: ProcessorId, successor: ProcessorId) -> bool {
        if !self.contains_processor(successor) {
            return false;
        }
        self.successors(predecessor).contains(&successor)
    }

    /// [`is_successor`](Self::is_successor) with the predecessor given by one
    /// of its ports.
    pub fn is_successor_from_port(&self, predecessor: &Endpoint, successor: ProcessorId) -> bool {
        self.resolve_port(predecessor)
            .is_some_and(|p| self.is_successor(p, successor))
    }

    /// [`is_successor`](Self::is_successor) with the successor given by one of
    /// its ports.
    pub fn is_successor_to_port(&self, predecessor: ProcessorId, successor: &Endpoint) -> bool {
        self.resolve_port(successor)
            .is_some_and(|s| self.is_successor(predecessor, s))
    }

    /// [`is_successor`](Self::is_successor) with both processors given by
    /// ports.
    pub fn is_successor_between_ports(&self, predecessor: &Endpoint, successor: &Endpoint) -> bool {
        match (self.resolve_port(predecessor), self.resolve_port(successor)) {
            (Some(p), Some(s)) => self.is_successor(p, s),
            _ => false,
        }
    }

    /// Check whether `processor` lies on a path from `root` to `end`.
    ///
    /// The ends themselves count as path elements as long as `end` is
    /// reachable from `root`.
    pub fn is_path_element(&self, processor: ProcessorId, root: ProcessorId, end: ProcessorId) -> bool {
        let path = self.path_nodes(self.nodes_of(root), self.nodes_of(end));
        self.nodes_of(processor).iter().any(|n| path.contains(n))
    }

    /// [`is_path_element`](Self::is_path_element) with the path ends given by
    /// ports.
    pub fn is_path_element_between_ports(
        &self,
        processor: ProcessorId,
        root: &Endpoint,
        end: &Endpoint,
    ) -> bool {
        match (self.resolve_port(root), self.resolve_port(end)) {
            (Some(r), Some(e)) => self.is_path_element(processor, r, e),
            _ => false,
        }
    }

    /// [`is_path_element`](Self::is_path_element) with all processors given
    /// by ports.
    pub fn is_port_path_element(&self, port: &Endpoint, root: &Endpoint, end: &Endpoint) -> bool {
        self.resolve_port(port)
            .is_some_and(|p| self.is_path_element_between_ports(p, root, end))
    }

    /// Processors lying on some path from `root` to `end`.
    pub fn path_processors(&self, root: ProcessorId, end: ProcessorId) -> HashSet<ProcessorId> {
        self.processors_of_nodes(&self.path_nodes(self.nodes_of(root), self.nodes_of(end)))
    }

    fn resolve_port(&self, port: &Endpoint) -> Option<ProcessorId> {
        if self.network.port(port).is_none() {
            warn!("Unknown port {}", port);
            return None;
        }
        Some(port.processor)
    }
}

impl Clone for NetworkGraph<'_> {
    /// Copies nodes and edges into a fresh arena. The transposed cache is
    /// not carried over.
    fn clone(&self) -> Self {
        let mut copy = Self::empty(self.network);
        copy.nodes = self.nodes.iter().map(GraphNode::detached).collect();
        copy.by_processor = self.by_processor.clone();

        for (index, node) in self.nodes.iter().enumerate() {
            for &successor in node.successors() {
                copy.add_edge(NodeId(index), successor);
            }
        }
        copy
    }
}

impl PartialEq for NetworkGraph<'_> {
    /// Graphs are equal if they have the same nodes (by id and processor),
    /// the same degrees and the same successor sets.
    fn eq(&self, other: &Self) -> bool {
        if self.nodes.len() != other.nodes.len() {
            return false;
        }

        self.nodes.iter().zip(&other.nodes).all(|(a, b)| {
            a == b
                && a.in_degree() == b.in_degree()
                && a.out_degree() == b.out_degree()
                && a.successors().iter().collect::<HashSet<_>>()
                    == b.successors().iter().collect::<HashSet<_>>()
        })
    }
}

impl std::fmt::Debug for NetworkGraph<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkGraph")
            .field("nodes", &self.nodes)
            .field("transposed_cached", &self.transposed.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::port::{PortDefinition, PortKind};
    use crate::core::processor::Processor;
    use crate::graph::testing::{chain, diamond};

    #[test]
    fn test_chain_construction() {
        let (network, ids) = chain(3);
        let graph = NetworkGraph::new(&network);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.processors(true), ids);
        for (index, node) in graph.nodes().iter().enumerate() {
            assert_eq!(node.id(), Some(NodeId(index)));
            assert_eq!(node.out_degree(), node.successors().len());
        }
    }

    #[test]
    fn test_contains_processor() {
        let (network, ids) = chain(2);
        let graph = NetworkGraph::from_processors(&network, &ids[..1]);

        assert!(graph.contains_processor(ids[0]));
        assert!(!graph.contains_processor(ids[1]));
        assert!(!graph.contains_processor(ProcessorId::new()));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_processors_get_one_node() {
        let (network, ids) = chain(2);
        let graph = NetworkGraph::from_processors(&network, &[ids[0], ids[1], ids[0]]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_unknown_processor_kept_as_isolated_node() {
        let (network, ids) = chain(2);
        let stranger = ProcessorId::new();
        let graph = NetworkGraph::from_processors(&network, &[ids[0], stranger, ids[1]]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.nodes_of(stranger), &[NodeId(1)]);
        assert_eq!(graph.node(NodeId(1)).map(GraphNode::in_degree), Some(0));
    }

    #[test]
    fn test_processors_unsorted_contains_all() {
        let (network, ids) = chain(4);
        let graph = NetworkGraph::new(&network);

        let mut unsorted = graph.processors(false);
        let mut expected = ids.clone();
        unsorted.sort();
        expected.sort();
        assert_eq!(unsorted, expected);
    }

    #[test]
    fn test_transposed_chain() {
        let (network, ids) = chain(3);
        let graph = NetworkGraph::new(&network);
        let transposed = graph.transposed();

        assert!(transposed.has_edge_between(ids[1], ids[0]));
        assert!(transposed.has_edge_between(ids[2], ids[1]));
        assert!(!transposed.has_edge_between(ids[0], ids[1]));
        assert_eq!(transposed.edge_count(), 2);

        // cached
        assert!(std::ptr::eq(transposed, graph.transposed()));
    }

    #[test]
    fn test_double_transpose_is_identity() {
        let (network, _) = diamond();
        let graph = NetworkGraph::new(&network);

        assert_eq!(graph.to_transposed().to_transposed(), graph);
        assert_ne!(graph.to_transposed(), graph);
    }

    #[test]
    fn test_clone_is_equal_and_independent() {
        let (network, _) = diamond();
        let graph = NetworkGraph::new(&network);
        let _ = graph.transposed();

        let copy = graph.clone();
        assert_eq!(copy, graph);
        assert_eq!(copy.edge_count(), graph.edge_count());
    }

    #[test]
    fn test_predecessors_and_successors_include_self() {
        let (network, ids) = chain(3);
        let graph = NetworkGraph::new(&network);

        let predecessors = graph.predecessors(ids[2]);
        assert_eq!(predecessors, ids.iter().copied().collect());

        let successors = graph.successors(ids[1]);
        assert_eq!(successors, [ids[1], ids[2]].into_iter().collect());

        assert!(graph.successors(ProcessorId::new()).is_empty());
    }

    #[test]
    fn test_successors_of_set() {
        let (network, [a, b, c, d]) = diamond();
        let graph = NetworkGraph::new(&network);

        let successors = graph.successors_of([b, c]);
        assert_eq!(successors, [b, c, d].into_iter().collect());

        let predecessors = graph.predecessors_of([b, c]);
        assert_eq!(predecessors, [a, b, c].into_iter().collect());
    }

    #[test]
    fn test_is_successor() {
        let (network, [a, b, c, d]) = diamond();
        let graph = NetworkGraph::new(&network);

        assert!(graph.is_successor(a, d));
        assert!(graph.is_successor(b, d));
        assert!(graph.is_successor(a, a));
        assert!(!graph.is_successor(b, c));
        assert!(!graph.is_successor(d, a));
        assert!(!graph.is_successor(a, ProcessorId::new()));
    }

    #[test]
    fn test_port_overloads_resolve_to_owner() {
        let (network, [a, b, c, d]) = diamond();
        let graph = NetworkGraph::new(&network);

        let a_out = Endpoint::new(a, "out");
        let d_in = Endpoint::new(d, "in");

        assert!(graph.is_successor_from_port(&a_out, d));
        assert!(graph.is_successor_to_port(b, &d_in));
        assert!(graph.is_successor_between_ports(&a_out, &d_in));
        assert!(graph.is_successor_between_ports(&Endpoint::new(d, "in"), &Endpoint::new(d, "out")));
        assert!(!graph.is_successor_to_port(c, &Endpoint::new(b, "in")));
        assert!(!graph.is_successor_from_port(&Endpoint::new(a, "nope"), d));
    }

    #[test]
    fn test_port_successors_and_predecessors() {
        let (network, [a, b, c, d]) = diamond();
        let graph = NetworkGraph::new(&network);

        let a_out = Endpoint::new(a, "out");
        assert_eq!(graph.port_successors(&a_out), [b, c, d].into_iter().collect());

        // an input port resolves to its owner
        let b_in = Endpoint::new(b, "in");
        assert_eq!(graph.port_successors(&b_in), [b, d].into_iter().collect());

        let d_in = Endpoint::new(d, "in");
        assert_eq!(graph.port_predecessors(&d_in), [a, b, c].into_iter().collect());

        assert!(graph.port_successors(&Endpoint::new(a, "missing")).is_empty());
    }

    #[test]
    fn test_port_successors_respect_graph_edges() {
        let (network, [a, b, c, _]) = diamond();
        // b is left out, so the a -> b connection is not an edge
        let graph = NetworkGraph::from_processors(&network, &[a, c]);

        let a_out = Endpoint::new(a, "out");
        assert_eq!(graph.port_successors(&a_out), [c].into_iter().collect());
    }

    #[test]
    fn test_port_successors_through_filtered_connection() {
        let mut network = ProcessorNetwork::new();
        let a = network
            .add_processor(
                Processor::new("a")
                    .with_port(PortDefinition::output("vol", PortKind::Volume))
                    .with_port(PortDefinition::output("img", PortKind::Render)),
            )
            .unwrap();
        let b = network.add_processor(crate::graph::testing::processor("b")).unwrap();
        let c = network
            .add_processor(
                Processor::new("c")
                    .with_port(PortDefinition::input("vol", PortKind::Volume))
                    .with_port(PortDefinition::input("img", PortKind::Render)),
            )
            .unwrap();
        network.connect_ports(a, "vol", b, "in").unwrap();
        network.connect_ports(b, "out", c, "vol").unwrap();
        network.connect_ports(a, "img", c, "img").unwrap();

        // the render connection is no edge, but c is still reachable from a
        let graph = NetworkGraph::with_checks(
            &network,
            &[a, b, c],
            PortTypeCheck::kind(PortKind::Volume),
            PortTypeCheck::Reject,
            &BuildOptions::default().with_keep_nodes(true),
        );
        assert_eq!(graph.edge_count(), 2);

        assert_eq!(graph.port_successors(&Endpoint::new(a, "img")), [c].into_iter().collect());
        assert_eq!(graph.port_predecessors(&Endpoint::new(c, "img")), [a].into_iter().collect());
    }

    #[test]
    fn test_co_processor_connections_become_edges() {
        let mut network = ProcessorNetwork::new();
        let host = network
            .add_processor(
                Processor::new("host").with_port(PortDefinition::output("co", PortKind::CoProcessor)),
            )
            .unwrap();
        let guest = network
            .add_processor(
                Processor::new("guest").with_port(PortDefinition::input("co", PortKind::CoProcessor)),
            )
            .unwrap();
        network.connect_ports(host, "co", guest, "co").unwrap();

        let graph = NetworkGraph::new(&network);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.is_successor(host, guest));
        assert!(!graph.is_successor(guest, host));

        let co_only = NetworkGraph::with_checks(
            &network,
            &[host, guest],
            PortTypeCheck::kind(PortKind::CoProcessor),
            PortTypeCheck::Reject,
            &BuildOptions::default(),
        );
        assert_eq!(co_only.edge_count(), 1);

        let volume_only = NetworkGraph::with_checks(
            &network,
            &[host, guest],
            PortTypeCheck::kind(PortKind::Volume),
            PortTypeCheck::Reject,
            &BuildOptions::default().with_keep_nodes(true),
        );
        assert_eq!(volume_only.node_count(), 2);
        assert_eq!(volume_only.edge_count(), 0);
    }

    #[test]
    fn test_is_path_element() {
        let (network, [a, b, c, d]) = diamond();
        let graph = NetworkGraph::new(&network);

        assert!(graph.is_path_element(b, a, d));
        assert!(graph.is_path_element(c, a, d));
        assert!(graph.is_path_element(a, a, d));
        assert!(graph.is_path_element(d, a, d));
        assert!(!graph.is_path_element(c, b, d));
        assert!(!graph.is_path_element(a, b, c));
        assert!(!graph.is_path_element(b, b, c));

        assert_eq!(graph.path_processors(b, d), [b, d].into_iter().collect());
    }

    #[test]
    fn test_path_element_port_overloads() {
        let (network, [a, b, _, d]) = diamond();
        let graph = NetworkGraph::new(&network);

        let root = Endpoint::new(a, "out");
        let end = Endpoint::new(d, "in");

        assert!(graph.is_path_element_between_ports(b, &root, &end));
        assert!(graph.is_port_path_element(&Endpoint::new(b, "out"), &root, &end));
        assert!(!graph.is_port_path_element(&Endpoint::new(b, "bogus"), &root, &end));
    }

    #[test]
    fn test_clear_successors_updates_degrees() {
        let (network, [a, _, _, d]) = diamond();
        let mut graph = NetworkGraph::new(&network);
        let a_node = graph.nodes_of(a)[0];
        let d_node = graph.nodes_of(d)[0];

        assert_eq!(graph.node(d_node).map(GraphNode::in_degree), Some(2));
        graph.clear_successors(a_node);

        assert_eq!(graph.node(a_node).map(GraphNode::out_degree), Some(0));
        assert_eq!(graph.edge_count(), 2);
        let in_total: usize = graph.nodes().iter().map(GraphNode::in_degree).sum();
        assert_eq!(in_total, graph.edge_count());
    }

    #[test]
    fn test_add_edge_rejects_duplicates_and_unknown_nodes() {
        let (network, ids) = chain(2);
        let mut graph = NetworkGraph::from_processors(&network, &ids);
        graph.clear_successors(NodeId(0));

        assert!(graph.add_edge(NodeId(0), NodeId(1)));
        assert!(!graph.add_edge(NodeId(0), NodeId(1)));
        assert!(!graph.add_edge(NodeId(0), NodeId(7)));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_mutation_invalidates_transposed_cache() {
        let (network, ids) = chain(3);
        let mut graph = NetworkGraph::new(&network);
        assert_eq!(graph.transposed().edge_count(), 2);

        let first = graph.nodes_of(ids[0])[0];
        graph.clear_successors(first);
        assert_eq!(graph.transposed().edge_count(), 1);
        assert_eq!(graph.predecessors(ids[2]), [ids[1], ids[2]].into_iter().collect());
    }
}
