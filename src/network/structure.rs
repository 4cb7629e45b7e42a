//! Processor network structure.
//!
//! The ProcessorNetwork is the topology snapshot a network graph is built
//! from. It holds all processors and the connections between their ports.
//! Unlike a processing DAG it accepts cycles: loops are closed through
//! dedicated loop ports and resolved by the graph layer.

use crate::core::error::{ConnectionId, GraphError, GraphResult, ProcessorId};
use crate::core::port::PortDefinition;
use crate::core::processor::Processor;
use crate::network::connection::{Connection, Endpoint};
use indexmap::IndexMap;

/// The set of processors and port connections handed to the graph layer.
///
/// Uses IndexMap to maintain insertion order for consistent iteration.
#[derive(Debug, Clone, Default)]
pub struct ProcessorNetwork {
    /// All processors, indexed by ID.
    processors: IndexMap<ProcessorId, Processor>,
    /// All connections.
    connections: Vec<Connection>,
    /// Optional name for this network.
    pub name: Option<String>,
}

impl ProcessorNetwork {
    /// Create a new empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    // ========================================================================
    // Processor Management
    // ========================================================================

    /// Add a processor to the network.
    pub fn add_processor(&mut self, processor: Processor) -> GraphResult<ProcessorId> {
        let id = processor.id;
        if self.processors.contains_key(&id) {
            return Err(GraphError::DuplicateProcessor(id));
        }
        self.processors.insert(id, processor);
        Ok(id)
    }

    /// Remove a processor from the network.
    ///
    /// Also removes all connections involving this processor.
    pub fn remove_processor(&mut self, id: ProcessorId) -> GraphResult<Processor> {
        self.connections
            .retain(|conn| conn.from.processor != id && conn.to.processor != id);

        self.processors
            .shift_remove(&id)
            .ok_or(GraphError::ProcessorNotFound(id))
    }

    /// Get a reference to a processor.
    pub fn processor(&self, id: ProcessorId) -> Option<&Processor> {
        self.processors.get(&id)
    }

    /// Get a reference to a processor, failing if absent.
    pub fn get_processor(&self, id: ProcessorId) -> GraphResult<&Processor> {
        self.processors.get(&id).ok_or(GraphError::ProcessorNotFound(id))
    }

    /// Check if a processor exists.
    pub fn has_processor(&self, id: ProcessorId) -> bool {
        self.processors.contains_key(&id)
    }

    /// Get all processors in insertion order.
    pub fn processors(&self) -> impl Iterator<Item = &Processor> {
        self.processors.values()
    }

    /// Get all processor IDs in insertion order.
    pub fn processor_ids(&self) -> impl Iterator<Item = ProcessorId> + '_ {
        self.processors.keys().copied()
    }

    /// Get the number of processors.
    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Resolve an endpoint to its port definition.
    pub fn port(&self, endpoint: &Endpoint) -> Option<&PortDefinition> {
        self.processors
            .get(&endpoint.processor)
            .and_then(|p| p.port(&endpoint.port))
    }

    /// Display name of a processor, falling back to its id.
    pub fn display_name(&self, id: ProcessorId) -> String {
        self.processors
            .get(&id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    // ========================================================================
    // Connection Management
    // ========================================================================

    /// Connect an output port to an input port.
    ///
    /// Cycles are accepted; loop handling is up to the graph layer.
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) -> GraphResult<ConnectionId> {
        let from_port = self.port(&from).ok_or_else(|| GraphError::PortNotFound {
            processor: from.processor,
            port: from.port.clone(),
        })?;
        let to_port = self.port(&to).ok_or_else(|| GraphError::PortNotFound {
            processor: to.processor,
            port: to.port.clone(),
        })?;

        if !from_port.is_output() {
            return Err(GraphError::InvalidConnection {
                reason: format!("port '{}' is not an output", from),
            });
        }
        if !to_port.is_input() {
            return Err(GraphError::InvalidConnection {
                reason: format!("port '{}' is not an input", to),
            });
        }

        if !from_port.kind.compatible_with(&to_port.kind) {
            return Err(GraphError::KindMismatch {
                from_kind: from_port.kind,
                to_kind: to_port.kind,
            });
        }

        if self.connections.iter().any(|c| c.from == from && c.to == to) {
            return Err(GraphError::DuplicateConnection {
                processor: from.processor,
                port: from.port,
            });
        }

        let connection = Connection::new(from, to);
        let id = connection.id;
        self.connections.push(connection);
        Ok(id)
    }

    /// Connect `from_port` of `from` to `to_port` of `to`.
    pub fn connect_ports(
        &mut self,
        from: ProcessorId,
        from_port: impl Into<String>,
        to: ProcessorId,
        to_port: impl Into<String>,
    ) -> GraphResult<ConnectionId> {
        self.connect(Endpoint::new(from, from_port), Endpoint::new(to, to_port))
    }

    /// Remove a connection by ID.
    pub fn disconnect(&mut self, id: ConnectionId) -> GraphResult<Connection> {
        let pos = self
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or(GraphError::ConnectionNotFound(id))?;

        Ok(self.connections.remove(pos))
    }

    /// Get all connections.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Get all connections leaving a processor.
    pub fn connections_from(&self, processor: ProcessorId) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| c.from.processor == processor)
    }

    /// Get all connections entering a processor.
    pub fn connections_to(&self, processor: ProcessorId) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| c.to.processor == processor)
    }

    /// Endpoints connected to `endpoint`, in connection order.
    ///
    /// Works for both directions: an output yields its targets, an input its
    /// sources.
    pub fn connected<'a>(&'a self, endpoint: &'a Endpoint) -> impl Iterator<Item = &'a Endpoint> {
        self.connections.iter().filter_map(move |c| c.other_end(endpoint))
    }

    /// Check whether a port has at least one connection.
    pub fn is_connected(&self, endpoint: &Endpoint) -> bool {
        self.connected(endpoint).next().is_some()
    }

    /// Get the number of connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Check if the network is empty.
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Clear all processors and connections.
    pub fn clear(&mut self) {
        self.processors.clear();
        self.connections.clear();
    }
}
