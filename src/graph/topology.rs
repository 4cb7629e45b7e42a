//! Topological ordering of network graphs.
//!
//! Provides algorithms for:
//! - Execution order (topological sort by DFS finishing time)
//! - Cycle detection through back edges

use crate::core::error::{GraphError, GraphResult, ProcessorId};
use crate::graph::network_graph::NetworkGraph;
use crate::graph::node::NodeId;
use crate::graph::traversal::DepthFirstRecord;
use indexmap::IndexSet;
use std::collections::HashSet;

impl NetworkGraph<'_> {
    /// Processors in execution order.
    ///
    /// Nodes are ordered by descending depth-first finishing time, so on an
    /// acyclic graph every processor precedes its successors. A processor
    /// wrapped by several nodes appears once per node. A non-empty `subset`
    /// restricts the result to those processors.
    ///
    /// Residual cycles do not fail the sort; the relative order of processors
    /// on a cycle is then unspecified. Use
    /// [`try_sort_topologically`](Self::try_sort_topologically) to reject them.
    pub fn sort_topologically(&self, subset: &[ProcessorId]) -> Vec<ProcessorId> {
        let record = self.full_traverse_depth_first(None, None);
        self.order_by_finishing_time(&record, subset)
    }

    /// Like [`sort_topologically`](Self::sort_topologically), but fails if
    /// the graph contains a cycle.
    ///
    /// The error lists the processors at both ends of every back edge.
    pub fn try_sort_topologically(&self, subset: &[ProcessorId]) -> GraphResult<Vec<ProcessorId>> {
        let record = self.full_traverse_depth_first(None, None);

        let back_edges = self.back_edges(&record);
        if !back_edges.is_empty() {
            let processors: IndexSet<ProcessorId> = back_edges
                .iter()
                .flat_map(|&(from, to)| [self.nodes()[from.index()].processor(), self.nodes()[to.index()].processor()])
                .collect();
            return Err(GraphError::CycleDetected {
                processors: processors.into_iter().collect(),
            });
        }

        Ok(self.order_by_finishing_time(&record, subset))
    }

    /// Check if the graph has any cycles.
    pub fn has_cycle(&self) -> bool {
        let record = self.full_traverse_depth_first(None, None);
        !self.back_edges(&record).is_empty()
    }

    fn order_by_finishing_time(&self, record: &DepthFirstRecord, subset: &[ProcessorId]) -> Vec<ProcessorId> {
        let subset: HashSet<ProcessorId> = subset.iter().copied().collect();
        record
            .by_finishing_time_descending()
            .into_iter()
            .map(|n| self.nodes()[n.index()].processor())
            .filter(|p| subset.is_empty() || subset.contains(p))
            .collect()
    }

    fn back_edges(&self, record: &DepthFirstRecord) -> Vec<(NodeId, NodeId)> {
        self.nodes()
            .iter()
            .enumerate()
            .flat_map(|(i, node)| node.successors().iter().map(move |&s| (NodeId(i), s)))
            .filter(|&(from, to)| record.is_back_edge(from, to))
            .collect()
    }
}
