//! Processor descriptors.
//!
//! A processor is opaque to the graph: only its identity and its ports are
//! consulted when building a network graph.

use crate::core::error::ProcessorId;
use crate::core::port::PortDefinition;
use serde::{Deserialize, Serialize};

/// A processor as seen by the network graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Processor {
    /// Stable identity
    pub id: ProcessorId,
    /// Human-readable name, used in log messages and DOT output
    pub name: String,
    /// Ports in declaration order (inputs and outputs mixed)
    pub ports: Vec<PortDefinition>,
}

impl Processor {
    /// Create a processor with no ports.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProcessorId::new(),
            name: name.into(),
            ports: Vec::new(),
        }
    }

    /// Create with a specific ID.
    pub fn with_id(mut self, id: ProcessorId) -> Self {
        self.id = id;
        self
    }

    /// Add a port.
    pub fn with_port(mut self, port: PortDefinition) -> Self {
        self.ports.push(port);
        self
    }

    /// Look up a port by name.
    pub fn port(&self, name: &str) -> Option<&PortDefinition> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Input ports, in declaration order.
    pub fn inputs(&self) -> impl Iterator<Item = &PortDefinition> {
        self.ports.iter().filter(|p| p.is_input())
    }

    /// Output ports (co-processor outputs included), in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = &PortDefinition> {
        self.ports.iter().filter(|p| p.is_output())
    }
}
