//! Breadth-first and depth-first traversal.
//!
//! Traversals never mutate the graph. Marks, distances and timestamps live in
//! a record owned by the call and handed back to the caller, so any number of
//! traversals can run over a shared graph.

use crate::core::error::ProcessorId;
use crate::graph::network_graph::NetworkGraph;
use crate::graph::node::{GraphNode, NodeId};
use indexmap::IndexSet;
use log::trace;
use std::collections::{HashSet, VecDeque};

/// Callback invoked for nodes reached by a traversal.
///
/// Returning `false` signals a failed visit. Traversal continues regardless;
/// failures are only counted in the traversal record.
pub trait GraphVisitor {
    /// Called once per reached node.
    fn visit(&mut self, node: &GraphNode) -> bool;
}

impl<F> GraphVisitor for F
where
    F: FnMut(&GraphNode) -> bool,
{
    fn visit(&mut self, node: &GraphNode) -> bool {
        self(node)
    }
}

/// Visitor collecting every node it sees.
#[derive(Debug, Default, Clone)]
pub struct CollectSuccessorsVisitor {
    seen: HashSet<NodeId>,
    ordered: Vec<NodeId>,
    processors: IndexSet<ProcessorId>,
}

impl CollectSuccessorsVisitor {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct nodes visited.
    pub fn successors(&self) -> &HashSet<NodeId> {
        &self.seen
    }

    /// Distinct nodes in the order they were first visited.
    pub fn successors_ordered(&self) -> &[NodeId] {
        &self.ordered
    }

    /// Distinct processors of the visited nodes, in first-visit order.
    pub fn processors(&self) -> &IndexSet<ProcessorId> {
        &self.processors
    }

    /// Forget everything collected so far.
    pub fn clear(&mut self) {
        self.seen.clear();
        self.ordered.clear();
        self.processors.clear();
    }
}

impl GraphVisitor for CollectSuccessorsVisitor {
    fn visit(&mut self, node: &GraphNode) -> bool {
        if let Some(id) = node.id() {
            if self.seen.insert(id) {
                self.ordered.push(id);
            }
        }
        self.processors.insert(node.processor());
        true
    }
}

/// Bookkeeping of a breadth-first traversal.
#[derive(Debug, Clone)]
pub struct BreadthFirstRecord {
    marked: Vec<bool>,
    distance: Vec<Option<usize>>,
    order: Vec<NodeId>,
    visit_failures: usize,
}

impl BreadthFirstRecord {
    fn new(node_count: usize) -> Self {
        Self {
            marked: vec![false; node_count],
            distance: vec![None; node_count],
            order: Vec::new(),
            visit_failures: 0,
        }
    }

    /// Whether `node` was reached.
    pub fn is_marked(&self, node: NodeId) -> bool {
        self.marked.get(node.index()).copied().unwrap_or(false)
    }

    /// Edge count from the root of the node's tree, `None` if unreached.
    pub fn min_distance_to_root(&self, node: NodeId) -> Option<usize> {
        self.distance.get(node.index()).copied().flatten()
    }

    /// Nodes in the order they were reached.
    pub fn discovery_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Number of visits the visitor reported as failed.
    pub fn visit_failures(&self) -> usize {
        self.visit_failures
    }

    fn mark(&mut self, node: NodeId, distance: usize) {
        self.marked[node.index()] = true;
        self.distance[node.index()] = Some(distance);
        self.order.push(node);
    }
}

/// Bookkeeping of a depth-first traversal.
///
/// Timestamps start at 1 and increase strictly across all roots of one
/// traversal; 0 means "not yet".
#[derive(Debug, Clone)]
pub struct DepthFirstRecord {
    discovered: Vec<usize>,
    finished: Vec<usize>,
    time: usize,
    visit_failures: usize,
}

impl DepthFirstRecord {
    fn new(node_count: usize) -> Self {
        Self {
            discovered: vec![0; node_count],
            finished: vec![0; node_count],
            time: 0,
            visit_failures: 0,
        }
    }

    /// Discovery timestamp of `node`.
    pub fn discovery_time(&self, node: NodeId) -> Option<usize> {
        self.discovered.get(node.index()).copied().filter(|&t| t > 0)
    }

    /// Finishing timestamp of `node`.
    pub fn finishing_time(&self, node: NodeId) -> Option<usize> {
        self.finished.get(node.index()).copied().filter(|&t| t > 0)
    }

    /// Whether `node` was reached.
    pub fn is_discovered(&self, node: NodeId) -> bool {
        self.discovery_time(node).is_some()
    }

    /// Whether all successors of `node` were done.
    pub fn is_finished(&self, node: NodeId) -> bool {
        self.finishing_time(node).is_some()
    }

    /// Number of visits the visitors reported as failed.
    pub fn visit_failures(&self) -> usize {
        self.visit_failures
    }

    /// Finished nodes, latest finish first.
    pub fn by_finishing_time_descending(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = (0..self.finished.len())
            .map(NodeId)
            .filter(|&n| self.is_finished(n))
            .collect();
        nodes.sort_by(|a, b| self.finished[b.index()].cmp(&self.finished[a.index()]));
        nodes
    }

    /// Whether the edge `from -> to` points back to an ancestor of `from`.
    ///
    /// Ids outside the traversed graph never form a back edge.
    pub fn is_back_edge(&self, from: NodeId, to: NodeId) -> bool {
        let (f, t) = (from.index(), to.index());
        match (
            self.discovered.get(f),
            self.discovered.get(t),
            self.finished.get(f),
            self.finished.get(t),
        ) {
            (Some(df), Some(dt), Some(ff), Some(ft)) => dt <= df && ff <= ft,
            _ => false,
        }
    }

    fn discover(&mut self, node: NodeId) {
        self.time += 1;
        self.discovered[node.index()] = self.time;
    }

    fn finish(&mut self, node: NodeId) {
        self.time += 1;
        self.finished[node.index()] = self.time;
    }
}

/// Runs `visitor` if one was given, treating a missing visitor as success.
fn visit_with(visitor: &mut Option<&mut dyn GraphVisitor>, node: &GraphNode) -> bool {
    match visitor {
        Some(v) => v.visit(node),
        None => true,
    }
}

impl NetworkGraph<'_> {
    /// Roots for a full traversal: nodes without predecessors first, then
    /// every node in id order so that cycles without an entry are covered.
    fn traversal_roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        let sources = self
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.in_degree() == 0)
            .map(|(i, _)| NodeId(i));
        sources.chain((0..self.node_count()).map(NodeId))
    }

    /// Breadth-first traversal over the whole graph.
    pub fn full_traverse_breadth_first(
        &self,
        mut visitor: Option<&mut dyn GraphVisitor>,
    ) -> BreadthFirstRecord {
        let mut record = BreadthFirstRecord::new(self.node_count());
        for root in self.traversal_roots() {
            if !record.is_marked(root) {
                trace!("Breadth-first traversal from root {}", root);
                self.breadth_first_from(root, &mut record, &mut visitor);
            }
        }
        record
    }

    /// Breadth-first traversal from every node of `processor`.
    ///
    /// Returns `None` if the processor is not part of the graph.
    pub fn traverse_breadth_first(
        &self,
        processor: ProcessorId,
        mut visitor: Option<&mut dyn GraphVisitor>,
    ) -> Option<BreadthFirstRecord> {
        let roots = self.nodes_of(processor);
        if roots.is_empty() {
            return None;
        }

        let mut record = BreadthFirstRecord::new(self.node_count());
        for &root in roots {
            if !record.is_marked(root) {
                self.breadth_first_from(root, &mut record, &mut visitor);
            }
        }
        Some(record)
    }

    /// Breadth-first traversal sharing marks across all of `roots`.
    pub(crate) fn breadth_first_from_all(
        &self,
        roots: &[NodeId],
        visitor: &mut dyn GraphVisitor,
    ) -> BreadthFirstRecord {
        let mut record = BreadthFirstRecord::new(self.node_count());
        let mut visitor = Some(visitor);
        for &root in roots {
            if root.index() < self.node_count() && !record.is_marked(root) {
                self.breadth_first_from(root, &mut record, &mut visitor);
            }
        }
        record
    }

    fn breadth_first_from(
        &self,
        root: NodeId,
        record: &mut BreadthFirstRecord,
        visitor: &mut Option<&mut dyn GraphVisitor>,
    ) {
        let mut queue = VecDeque::new();
        record.mark(root, 0);
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            let node = &self.nodes()[current.index()];
            if !visit_with(visitor, node) {
                record.visit_failures += 1;
            }

            let distance = record.min_distance_to_root(current).unwrap_or(0) + 1;
            for &successor in node.successors() {
                if !record.is_marked(successor) {
                    record.mark(successor, distance);
                    queue.push_back(successor);
                }
            }
        }
    }

    /// Depth-first traversal over the whole graph.
    ///
    /// `on_discover` runs when a node is first reached, `on_finish` once all
    /// of its successors are done.
    pub fn full_traverse_depth_first(
        &self,
        mut on_discover: Option<&mut dyn GraphVisitor>,
        mut on_finish: Option<&mut dyn GraphVisitor>,
    ) -> DepthFirstRecord {
        let mut record = DepthFirstRecord::new(self.node_count());
        for root in self.traversal_roots() {
            if !record.is_discovered(root) {
                trace!("Depth-first traversal from root {}", root);
                self.depth_first_from(root, &mut record, &mut on_discover, &mut on_finish);
            }
        }
        record
    }

    /// Depth-first traversal from every node of `processor`.
    ///
    /// Timestamps continue across the processor's nodes. Returns `None` if
    /// the processor is not part of the graph.
    pub fn traverse_depth_first(
        &self,
        processor: ProcessorId,
        mut on_discover: Option<&mut dyn GraphVisitor>,
        mut on_finish: Option<&mut dyn GraphVisitor>,
    ) -> Option<DepthFirstRecord> {
        let roots = self.nodes_of(processor);
        if roots.is_empty() {
            return None;
        }

        let mut record = DepthFirstRecord::new(self.node_count());
        for &root in roots {
            if !record.is_discovered(root) {
                self.depth_first_from(root, &mut record, &mut on_discover, &mut on_finish);
            }
        }
        Some(record)
    }

    fn depth_first_from(
        &self,
        root: NodeId,
        record: &mut DepthFirstRecord,
        on_discover: &mut Option<&mut dyn GraphVisitor>,
        on_finish: &mut Option<&mut dyn GraphVisitor>,
    ) {
        let nodes = self.nodes();

        record.discover(root);
        if !visit_with(on_discover, &nodes[root.index()]) {
            record.visit_failures += 1;
        }
        // (node, index of the next successor to look at)
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];

        while let Some(top) = stack.last_mut() {
            let current = top.0;
            let successors = nodes[current.index()].successors();

            let mut next = None;
            while top.1 < successors.len() {
                let candidate = successors[top.1];
                top.1 += 1;
                if !record.is_discovered(candidate) {
                    next = Some(candidate);
                    break;
                }
            }

            match next {
                Some(child) => {
                    record.discover(child);
                    if !visit_with(on_discover, &nodes[child.index()]) {
                        record.visit_failures += 1;
                    }
                    stack.push((child, 0));
                }
                None => {
                    stack.pop();
                    record.finish(current);
                    if !visit_with(on_finish, &nodes[current.index()]) {
                        record.visit_failures += 1;
                    }
                }
            }
        }
    }
}
