//! Core types for the procgraph processor network model.
//!
//! This module contains the foundational types that the network graph is
//! built from:
//! - Processor and port descriptors
//! - Identifier types
//! - Error types

pub mod error;
pub mod port;
pub mod processor;

// Re-export commonly used types
pub use error::{ConnectionId, GraphError, ProcessorId, ProcgraphError};
pub use port::{PortDefinition, PortDirection, PortKind};
pub use processor::Processor;
