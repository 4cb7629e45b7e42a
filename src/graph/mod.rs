//! Graph module for network graphs.
//!
//! A network graph is the directed graph of a processor network: nodes wrap
//! processors and edges follow port connections. Restricted graphs keep only
//! connections whose ports satisfy a [`PortTypeCheck`], and static loops can
//! be unrolled into acyclic chains.

pub mod export;
pub mod network_graph;
pub mod node;
pub mod port_check;
pub mod topology;
pub mod traversal;
mod unroll;

// Re-export commonly used types
pub use network_graph::NetworkGraph;
pub use node::{GraphNode, NodeId};
pub use port_check::PortTypeCheck;
pub use traversal::{BreadthFirstRecord, CollectSuccessorsVisitor, DepthFirstRecord, GraphVisitor};
