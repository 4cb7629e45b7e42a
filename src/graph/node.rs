//! Graph nodes.

use crate::core::error::ProcessorId;
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a node within one network graph.
///
/// Ids are assigned in insertion order and double as the node's index in the
/// graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in a network graph, wrapping one processor.
///
/// A processor may be wrapped by several nodes once loops are unrolled.
/// Successors are graph-local ids, so nodes are only meaningful together
/// with the graph that owns them.
#[derive(Debug)]
pub struct GraphNode {
    pub(crate) processor: ProcessorId,
    pub(crate) id: Option<NodeId>,
    pub(crate) successors: Vec<NodeId>,
    pub(crate) in_degree: usize,
    pub(crate) out_degree: usize,
}

impl GraphNode {
    /// Create a node without an id; the owning graph assigns one.
    pub fn new(processor: ProcessorId) -> Self {
        Self {
            processor,
            id: None,
            successors: Vec::new(),
            in_degree: 0,
            out_degree: 0,
        }
    }

    /// Create a node with an explicit id.
    pub fn with_id(processor: ProcessorId, id: NodeId) -> Self {
        Self {
            id: Some(id),
            ..Self::new(processor)
        }
    }

    /// Copy processor and id, but neither successors nor degrees.
    ///
    /// Successor ids refer to the arena of the source graph; whoever copies a
    /// node must re-establish its edges in the target graph.
    pub fn detached(&self) -> Self {
        Self {
            processor: self.processor,
            id: self.id,
            successors: Vec::new(),
            in_degree: 0,
            out_degree: 0,
        }
    }

    /// The wrapped processor.
    pub fn processor(&self) -> ProcessorId {
        self.processor
    }

    /// The node id, `None` while unassigned.
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    /// Direct successors in insertion order.
    pub fn successors(&self) -> &[NodeId] {
        &self.successors
    }

    /// Number of nodes that list this node as a successor.
    pub fn in_degree(&self) -> usize {
        self.in_degree
    }

    /// Number of successors.
    pub fn out_degree(&self) -> usize {
        self.out_degree
    }

    /// Check whether `node` is a direct successor.
    pub fn has_successor(&self, node: NodeId) -> bool {
        self.successors.contains(&node)
    }

    /// Append a successor unless already present.
    ///
    /// Only the owning graph calls this, since the target's in-degree has to
    /// be updated alongside.
    pub(crate) fn push_successor(&mut self, node: NodeId) -> bool {
        if self.has_successor(node) {
            return false;
        }
        self.successors.push(node);
        self.out_degree += 1;
        true
    }
}

impl PartialEq for GraphNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.processor == other.processor
    }
}

impl Eq for GraphNode {}

impl PartialOrd for GraphNode {
    /// Orders by id. Nodes with equal ids but different processors are
    /// unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.id.cmp(&other.id) {
            Ordering::Equal if self.processor != other.processor => None,
            ordering => Some(ordering),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_unassigned() {
        let node = GraphNode::new(ProcessorId::new());
        assert_eq!(node.id(), None);
        assert_eq!(node.in_degree(), 0);
        assert_eq!(node.out_degree(), 0);
    }

    #[test]
    fn test_push_successor_rejects_duplicates() {
        let mut node = GraphNode::with_id(ProcessorId::new(), NodeId(0));
        assert!(node.push_successor(NodeId(1)));
        assert!(!node.push_successor(NodeId(1)));
        assert!(node.push_successor(NodeId(2)));

        assert_eq!(node.successors(), &[NodeId(1), NodeId(2)]);
        assert_eq!(node.out_degree(), 2);
    }

    #[test]
    fn test_detached_drops_edges() {
        let processor = ProcessorId::new();
        let mut node = GraphNode::with_id(processor, NodeId(3));
        node.push_successor(NodeId(4));
        node.in_degree = 2;

        let copy = node.detached();
        assert_eq!(copy, node);
        assert!(copy.successors().is_empty());
        assert_eq!(copy.in_degree(), 0);
        assert_eq!(copy.out_degree(), 0);
    }

    #[test]
    fn test_equality_needs_same_processor() {
        let a = GraphNode::with_id(ProcessorId::new(), NodeId(1));
        let b = GraphNode::with_id(ProcessorId::new(), NodeId(1));
        let c = GraphNode::with_id(a.processor(), NodeId(1));

        assert_ne!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.partial_cmp(&b), None);
    }

    #[test]
    fn test_ordering_by_id() {
        let processor = ProcessorId::new();
        let a = GraphNode::with_id(processor, NodeId(1));
        let b = GraphNode::with_id(ProcessorId::new(), NodeId(2));

        assert!(a < b);
        assert!(!(b < a));
        assert!(GraphNode::new(processor) < a);
    }
}
