//! Port predicates selecting which connections form a graph view.

use crate::core::port::{PortDefinition, PortKind};
use crate::core::processor::Processor;

/// Predicate over ports, used to restrict a graph to some connections and to
/// mark the connections that close static loops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PortTypeCheck {
    /// Every port matches.
    Accept,
    /// No port matches. Used as the "no loop unrolling" loop check.
    #[default]
    Reject,
    /// Loop ports match; with `inverse`, all other ports do.
    LoopPort { inverse: bool },
    /// Ports of the given kind match; with `inverse`, all other ports do.
    Kind { kind: PortKind, inverse: bool },
}

impl PortTypeCheck {
    /// Match loop ports.
    pub fn loop_ports() -> Self {
        PortTypeCheck::LoopPort { inverse: false }
    }

    /// Match every port that is not a loop port.
    pub fn non_loop_ports() -> Self {
        PortTypeCheck::LoopPort { inverse: true }
    }

    /// Match ports of `kind`.
    pub fn kind(kind: PortKind) -> Self {
        PortTypeCheck::Kind { kind, inverse: false }
    }

    /// Match ports of any kind but `kind`.
    pub fn not_kind(kind: PortKind) -> Self {
        PortTypeCheck::Kind { kind, inverse: true }
    }

    /// Check whether `port` satisfies this predicate.
    pub fn is_a(&self, port: &PortDefinition) -> bool {
        match *self {
            PortTypeCheck::Accept => true,
            PortTypeCheck::Reject => false,
            PortTypeCheck::LoopPort { inverse } => port.loop_port != inverse,
            PortTypeCheck::Kind { kind, inverse } => (port.kind == kind) != inverse,
        }
    }

    /// Check whether any port of `processor` satisfies this predicate.
    pub fn has_a(&self, processor: &Processor) -> bool {
        processor.ports.iter().any(|p| self.is_a(p))
    }

    /// Number of times a loop closed through `port` is executed.
    ///
    /// `None` means the predicate never describes a loop.
    pub fn num_iterations(&self, port: &PortDefinition) -> Option<usize> {
        match self {
            PortTypeCheck::Reject => None,
            _ => Some(port.loop_iterations.max(1)),
        }
    }
}
