//! Network descriptions for saving and loading.
//!
//! Connections refer to processors by name so descriptions can be written
//! by hand; processor names must therefore be unique within a description.

use crate::core::error::{GraphError, ProcessorId, ProcgraphError, ProcgraphResult};
use crate::core::port::PortDefinition;
use crate::core::processor::Processor;
use crate::network::connection::Endpoint;
use crate::network::structure::ProcessorNetwork;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Serializable representation of a processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedProcessor {
    /// Processor ID; a fresh one is generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProcessorId>,
    /// Unique name within the description
    pub name: String,
    /// Port definitions
    #[serde(default)]
    pub ports: Vec<PortDefinition>,
}

/// Serializable representation of a connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedConnection {
    /// Source processor name
    pub from_processor: String,
    /// Source (output) port name
    pub from_port: String,
    /// Target processor name
    pub to_processor: String,
    /// Target (input) port name
    pub to_port: String,
}

/// Serializable representation of a complete network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedNetwork {
    /// Description format version
    pub version: String,
    /// Optional network name
    #[serde(default)]
    pub name: Option<String>,
    /// All processors
    pub processors: Vec<SerializedProcessor>,
    /// All connections
    #[serde(default)]
    pub connections: Vec<SerializedConnection>,
}

impl SerializedNetwork {
    /// Current format version.
    pub const VERSION: &'static str = "1.0.0";

    /// Create a new, empty description.
    pub fn new() -> Self {
        Self {
            version: Self::VERSION.to_string(),
            name: None,
            processors: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Describe an existing network.
    pub fn from_network(network: &ProcessorNetwork) -> Self {
        let processors = network
            .processors()
            .map(|p| SerializedProcessor {
                id: Some(p.id),
                name: p.name.clone(),
                ports: p.ports.clone(),
            })
            .collect();

        let connections = network
            .connections()
            .iter()
            .map(|c| SerializedConnection {
                from_processor: network.display_name(c.from.processor),
                from_port: c.from.port.clone(),
                to_processor: network.display_name(c.to.processor),
                to_port: c.to.port.clone(),
            })
            .collect();

        Self {
            version: Self::VERSION.to_string(),
            name: network.name.clone(),
            processors,
            connections,
        }
    }

    /// Build the network this description represents.
    pub fn into_network(self) -> ProcgraphResult<ProcessorNetwork> {
        if self.version != Self::VERSION {
            return Err(ProcgraphError::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION.to_string(),
            });
        }

        let mut network = ProcessorNetwork::new();
        network.name = self.name;

        let mut by_name: HashMap<String, ProcessorId> = HashMap::new();
        for sp in self.processors {
            if by_name.contains_key(&sp.name) {
                return Err(ProcgraphError::Other(format!(
                    "duplicate processor name '{}'",
                    sp.name
                )));
            }
            let mut processor = Processor::new(sp.name.clone());
            if let Some(id) = sp.id {
                processor = processor.with_id(id);
            }
            processor.ports = sp.ports;
            let id = network.add_processor(processor)?;
            by_name.insert(sp.name, id);
        }

        let lookup = |name: &str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| GraphError::InvalidConnection {
                    reason: format!("unknown processor '{}'", name),
                })
        };

        for sc in self.connections {
            let from = Endpoint::new(lookup(&sc.from_processor)?, sc.from_port);
            let to = Endpoint::new(lookup(&sc.to_processor)?, sc.to_port);
            network.connect(from, to)?;
        }

        Ok(network)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a description from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ProcgraphResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }
}

impl Default for SerializedNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::port::PortKind;
    use std::io::Write;

    const CHAIN: &str = r#"{
        "version": "1.0.0",
        "name": "chain",
        "processors": [
            {"name": "source", "ports": [
                {"name": "out", "kind": "volume", "direction": "output"}]},
            {"name": "raycaster", "ports": [
                {"name": "in", "kind": "volume", "direction": "input"},
                {"name": "image", "kind": "render", "direction": "output"}]},
            {"name": "canvas", "ports": [
                {"name": "image", "kind": "render", "direction": "input"}]}
        ],
        "connections": [
            {"from_processor": "source", "from_port": "out",
             "to_processor": "raycaster", "to_port": "in"},
            {"from_processor": "raycaster", "from_port": "image",
             "to_processor": "canvas", "to_port": "image"}
        ]
    }"#;

    #[test]
    fn test_load_description() {
        let network = SerializedNetwork::from_json(CHAIN)
            .unwrap()
            .into_network()
            .unwrap();

        assert_eq!(network.name.as_deref(), Some("chain"));
        assert_eq!(network.processor_count(), 3);
        assert_eq!(network.connection_count(), 2);
    }

    #[test]
    fn test_describe_network() {
        let mut network = ProcessorNetwork::new().with_name("pair");
        let a = network
            .add_processor(
                Processor::new("a").with_port(PortDefinition::output("out", PortKind::Text)),
            )
            .unwrap();
        let b = network
            .add_processor(
                Processor::new("b").with_port(PortDefinition::input("in", PortKind::Text)),
            )
            .unwrap();
        network.connect_ports(a, "out", b, "in").unwrap();

        let json = SerializedNetwork::from_network(&network).to_json().unwrap();
        assert!(json.contains("\"pair\""));

        let reloaded = SerializedNetwork::from_json(&json)
            .unwrap()
            .into_network()
            .unwrap();
        assert!(reloaded.has_processor(a));
        assert!(reloaded.has_processor(b));
        assert_eq!(reloaded.connection_count(), 1);
    }

    #[test]
    fn test_unknown_processor_name() {
        let mut description = SerializedNetwork::from_json(CHAIN).unwrap();
        description.connections[0].to_processor = "nowhere".to_string();

        let result = description.into_network();
        assert!(matches!(
            result,
            Err(ProcgraphError::Graph(GraphError::InvalidConnection { .. }))
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let mut description = SerializedNetwork::from_json(CHAIN).unwrap();
        description.version = "0.1.0".to_string();

        assert!(matches!(
            description.into_network(),
            Err(ProcgraphError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CHAIN.as_bytes()).unwrap();

        let description = SerializedNetwork::from_file(file.path()).unwrap();
        assert_eq!(description.processors.len(), 3);
    }
}
