//! Port definitions for processor inputs/outputs.
//!
//! Ports define the interface of a processor: which data it accepts and
//! produces, and whether a port closes a static loop.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a port (input or output).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

/// Kind of data a port carries.
///
/// Port-kind predicates match on this tag directly, so the set of kinds is
/// closed. `CoProcessor` ports link processors that call into each other
/// rather than exchanging data; the graph treats them as ordinary
/// connections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PortKind {
    Volume,
    Render,
    Geometry,
    Text,
    Plot,
    CoProcessor,
    /// Accepts any kind (for generic processors)
    Generic,
}

impl PortKind {
    /// Check whether an output of this kind may feed an input of `other`.
    pub fn compatible_with(&self, other: &PortKind) -> bool {
        self == other || *self == PortKind::Generic || *other == PortKind::Generic
    }
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PortKind::Volume => "Volume",
            PortKind::Render => "Render",
            PortKind::Geometry => "Geometry",
            PortKind::Text => "Text",
            PortKind::Plot => "Plot",
            PortKind::CoProcessor => "CoProcessor",
            PortKind::Generic => "Generic",
        };
        f.write_str(name)
    }
}

/// Definition of a processor port (input or output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDefinition {
    /// Unique name within the processor
    pub name: String,
    /// Kind of data this port carries
    pub kind: PortKind,
    /// Direction (input or output)
    pub direction: PortDirection,
    /// Whether this port closes or opens a static loop
    #[serde(default)]
    pub loop_port: bool,
    /// Configured number of loop iterations; only meaningful for loop ports
    #[serde(default = "default_loop_iterations")]
    pub loop_iterations: usize,
}

fn default_loop_iterations() -> usize {
    1
}

// ============================================================================
// PortDefinition Builder Pattern
// ============================================================================

impl PortDefinition {
    /// Create a new input port definition.
    pub fn input(name: impl Into<String>, kind: PortKind) -> Self {
        Self {
            name: name.into(),
            kind,
            direction: PortDirection::Input,
            loop_port: false,
            loop_iterations: 1,
        }
    }

    /// Create a new output port definition.
    pub fn output(name: impl Into<String>, kind: PortKind) -> Self {
        Self {
            name: name.into(),
            kind,
            direction: PortDirection::Output,
            loop_port: false,
            loop_iterations: 1,
        }
    }

    /// Mark this port as a loop port.
    pub fn as_loop(mut self) -> Self {
        self.loop_port = true;
        self
    }

    /// Set the number of loop iterations (implies a loop port).
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.loop_port = true;
        self.loop_iterations = iterations;
        self
    }

    /// Check if this is an input port.
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    /// Check if this is an output port.
    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }
}
