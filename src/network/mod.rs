//! Processor network model.
//!
//! A processor network is the topology snapshot a network graph is derived
//! from: processors, their ports and the connections between ports.

pub mod connection;
pub mod serialization;
pub mod structure;

// Re-export commonly used types
pub use connection::{Connection, Endpoint};
pub use serialization::{SerializedConnection, SerializedNetwork, SerializedProcessor};
pub use structure::ProcessorNetwork;
