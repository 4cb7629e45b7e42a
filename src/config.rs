//! Graph construction options.

use crate::core::error::ProcgraphResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default upper bound on the node count of an unrolled graph.
pub const DEFAULT_MAX_NODES: usize = 1 << 20;

/// Options controlling how a network graph is built.
///
/// Can be loaded from TOML:
///
/// ```toml
/// keep_nodes = true
/// max_nodes = 4096
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Keep processors that have no port matching the port check.
    pub keep_nodes: bool,
    /// Loops whose unrolling would grow the graph beyond this many nodes are
    /// left rolled.
    pub max_nodes: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            keep_nodes: false,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl BuildOptions {
    /// Create the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep or drop processors without matching ports.
    pub fn with_keep_nodes(mut self, keep_nodes: bool) -> Self {
        self.keep_nodes = keep_nodes;
        self
    }

    /// Set the node limit for loop unrolling.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Parse options from a TOML string. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ProcgraphResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load options from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ProcgraphResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
