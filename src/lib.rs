//! # Procgraph - Processor Network Graphs
//!
//! Procgraph turns a network of processors connected through typed ports into
//! a directed graph that can be queried, traversed and sorted into an
//! execution order.
//!
//! ## Features
//!
//! - **Restricted views**: Keep only connections whose ports satisfy a [`PortTypeCheck`]
//! - **Loop unrolling**: Static loops closed through loop ports become acyclic chains
//! - **Reachability**: Successors, predecessors and path membership, by processor or port
//! - **Traversal**: Breadth-first and depth-first search with visitor callbacks
//! - **Ordering**: Topological sort with optional cycle rejection
//!
//! ## Quick Start
//!
//! ```rust
//! use procgraph::prelude::*;
//!
//! let mut network = ProcessorNetwork::new();
//! let source = network
//!     .add_processor(Processor::new("source").with_port(PortDefinition::output("out", PortKind::Volume)))
//!     .unwrap();
//! let sink = network
//!     .add_processor(Processor::new("sink").with_port(PortDefinition::input("in", PortKind::Volume)))
//!     .unwrap();
//! network.connect_ports(source, "out", sink, "in").unwrap();
//!
//! let graph = NetworkGraph::new(&network);
//! assert_eq!(graph.sort_topologically(&[]), vec![source, sink]);
//! assert!(graph.is_successor(source, sink));
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`core`]: Processor and port descriptors, identifiers and errors
//! - [`network`]: The processor network a graph is built from, and its JSON form
//! - [`graph`]: Network graphs, traversal, ordering and export
//! - [`config`]: Graph construction options
//!
//! [`PortTypeCheck`]: graph::PortTypeCheck

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod graph;
pub mod network;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use procgraph::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::error::{
        ConnectionId, GraphError, GraphResult, ProcessorId, ProcgraphError, ProcgraphResult,
    };
    pub use crate::core::port::{PortDefinition, PortDirection, PortKind};
    pub use crate::core::processor::Processor;

    // Network
    pub use crate::network::connection::{Connection, Endpoint};
    pub use crate::network::serialization::{SerializedConnection, SerializedNetwork, SerializedProcessor};
    pub use crate::network::structure::ProcessorNetwork;

    // Graph
    pub use crate::graph::network_graph::NetworkGraph;
    pub use crate::graph::node::{GraphNode, NodeId};
    pub use crate::graph::port_check::PortTypeCheck;
    pub use crate::graph::traversal::{
        BreadthFirstRecord, CollectSuccessorsVisitor, DepthFirstRecord, GraphVisitor,
    };

    // Configuration
    pub use crate::config::BuildOptions;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
