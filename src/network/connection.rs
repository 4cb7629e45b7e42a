//! Connection types for the processor network.

use crate::core::error::{ConnectionId, ProcessorId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An endpoint of a connection (processor + port).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// The owning processor.
    pub processor: ProcessorId,
    /// The port name on that processor.
    pub port: String,
}

impl Endpoint {
    /// Create a new endpoint.
    pub fn new(processor: ProcessorId, port: impl Into<String>) -> Self {
        Self {
            processor,
            port: port.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.processor, self.port)
    }
}

/// A connection from an output port to an input port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique identifier for this connection.
    pub id: ConnectionId,
    /// Source endpoint (output port).
    pub from: Endpoint,
    /// Target endpoint (input port).
    pub to: Endpoint,
}

impl Connection {
    /// Create a new connection.
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self {
            id: ConnectionId::new(),
            from,
            to,
        }
    }

    /// Create with a specific ID.
    pub fn with_id(mut self, id: ConnectionId) -> Self {
        self.id = id;
        self
    }

    /// Check whether `endpoint` is either end of this connection.
    pub fn touches(&self, endpoint: &Endpoint) -> bool {
        self.from == *endpoint || self.to == *endpoint
    }

    /// The end opposite to `endpoint`, if `endpoint` is one of the ends.
    pub fn other_end(&self, endpoint: &Endpoint) -> Option<&Endpoint> {
        if self.from == *endpoint {
            Some(&self.to)
        } else if self.to == *endpoint {
            Some(&self.from)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let processor = ProcessorId::new();
        let endpoint = Endpoint::new(processor, "volume.out");

        assert_eq!(endpoint.processor, processor);
        assert_eq!(endpoint.port, "volume.out");
    }

    #[test]
    fn test_other_end() {
        let a = Endpoint::new(ProcessorId::new(), "out");
        let b = Endpoint::new(ProcessorId::new(), "in");
        let conn = Connection::new(a.clone(), b.clone());

        assert!(conn.touches(&a));
        assert_eq!(conn.other_end(&a), Some(&b));
        assert_eq!(conn.other_end(&b), Some(&a));
        assert_eq!(conn.other_end(&Endpoint::new(ProcessorId::new(), "x")), None);
    }
}
