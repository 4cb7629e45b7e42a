//! Error types for procgraph.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Be serializable so an evaluator can forward them
//! - Name the processor or port that caused them
//! - Support error chaining for context

use crate::core::port::PortKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Stable identity of a processor in a network.
///
/// The graph never looks inside a processor; two handles refer to the same
/// processor iff their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessorId(pub Uuid);

impl ProcessorId {
    /// Create a new random processor ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a processor ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ProcessorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Unique identifier for a connection in a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Top-level error type for procgraph.
#[derive(Error, Debug)]
pub enum ProcgraphError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unsupported network description version {found} (expected {expected})")]
    UnsupportedVersion { found: String, expected: String },

    #[error("{0}")]
    Other(String),
}

/// Errors related to network structure and graph operations.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphError {
    #[error("Processor {0} not found")]
    ProcessorNotFound(ProcessorId),

    #[error("Processor {0} is already part of the network")]
    DuplicateProcessor(ProcessorId),

    #[error("Connection {0} not found")]
    ConnectionNotFound(ConnectionId),

    #[error("Port '{port}' not found on processor {processor}")]
    PortNotFound { processor: ProcessorId, port: String },

    #[error("Invalid connection: {reason}")]
    InvalidConnection { reason: String },

    #[error("Cannot connect {from_kind} to {to_kind}")]
    KindMismatch { from_kind: PortKind, to_kind: PortKind },

    #[error("Port '{port}' on processor {processor} is already connected to that target")]
    DuplicateConnection { processor: ProcessorId, port: String },

    #[error("Cycle detected in graph involving processors: {processors:?}")]
    CycleDetected { processors: Vec<ProcessorId> },
}

impl GraphError {
    /// Get the processors this error refers to.
    pub fn affected_processors(&self) -> Vec<ProcessorId> {
        match self {
            GraphError::ProcessorNotFound(id) | GraphError::DuplicateProcessor(id) => vec![*id],
            GraphError::PortNotFound { processor, .. }
            | GraphError::DuplicateConnection { processor, .. } => vec![*processor],
            GraphError::CycleDetected { processors } => processors.clone(),
            _ => vec![],
        }
    }
}

/// Result type alias for procgraph operations.
pub type ProcgraphResult<T> = Result<T, ProcgraphError>;

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
