//! Static loop unrolling.
//!
//! A static loop is a connection from a loop output port (the loop end) back
//! to an input port of a processor upstream of it (the loop start). Unrolling
//! replaces the loop by a chain of copies of its body, so the graph becomes
//! acyclic and a topological sort yields one processor call per iteration.

use crate::config::BuildOptions;
use crate::core::error::ProcessorId;
use crate::graph::network_graph::NetworkGraph;
use crate::graph::node::NodeId;
use crate::graph::port_check::PortTypeCheck;
use crate::network::connection::Endpoint;
use log::{debug, error, warn};
use std::collections::HashMap;

/// A loop closed by one loop-port connection.
#[derive(Debug, Clone)]
struct StaticLoop {
    /// Input port at the loop start
    start_port: Endpoint,
    /// Output port at the loop end
    end_port: Endpoint,
    iterations: usize,
}

impl StaticLoop {
    fn start(&self) -> ProcessorId {
        self.start_port.processor
    }

    fn end(&self) -> ProcessorId {
        self.end_port.processor
    }
}

impl NetworkGraph<'_> {
    /// Unroll every well-formed loop whose end port satisfies `loop_check`.
    ///
    /// Ill-formed and overlapping loops are skipped with a warning. Nested
    /// loops are unrolled innermost first.
    pub(crate) fn unroll_loops(&mut self, loop_check: PortTypeCheck, options: &BuildOptions) {
        if loop_check == PortTypeCheck::Reject {
            return;
        }

        let mut pending = self.discard_overlapping(self.find_loops(loop_check));

        while !pending.is_empty() {
            let innermost = (0..pending.len()).find(|&i| {
                let candidate = &pending[i];
                !pending.iter().enumerate().any(|(j, other)| {
                    j != i && self.is_path_element(other.start(), candidate.start(), candidate.end())
                })
            });

            let Some(index) = innermost else {
                warn!(
                    "Could not order {} nested loop(s), leaving them rolled",
                    pending.len()
                );
                break;
            };
            let static_loop = pending.remove(index);
            self.unroll(&static_loop, options);
        }
    }

    /// Collect the well-formed loops of the graph.
    fn find_loops(&self, loop_check: PortTypeCheck) -> Vec<StaticLoop> {
        let network = self.network();
        let mut loops = Vec::new();

        for processor_id in self.processors(true) {
            let Some(processor) = network.processor(processor_id) else {
                continue;
            };

            for port in processor.outputs().filter(|p| loop_check.is_a(p)) {
                let end_port = Endpoint::new(processor_id, port.name.clone());
                let connected: Vec<&Endpoint> = network.connected(&end_port).collect();
                let Some(&start_port) = connected.first() else {
                    continue;
                };

                if connected.len() > 1 {
                    warn!(
                        "Loop port {} has multiple connections. Skipping loop.",
                        end_port
                    );
                    continue;
                }
                if network.connected(start_port).count() > 1 {
                    warn!(
                        "Loop port {} has multiple connections. Skipping loop.",
                        start_port
                    );
                    continue;
                }

                let own_ports = [start_port, &end_port];
                let foreign_loop_port = |p: ProcessorId| {
                    network.processor(p).is_some_and(|owner| {
                        owner.ports.iter().any(|port| {
                            loop_check.is_a(port)
                                && !own_ports.iter().any(|e| e.processor == p && e.port == port.name)
                        })
                    })
                };
                if foreign_loop_port(start_port.processor) || foreign_loop_port(processor_id) {
                    warn!(
                        "Loop {} -> {} shares a processor with another loop port. Skipping loop.",
                        end_port, start_port
                    );
                    continue;
                }

                if !self.is_successor(start_port.processor, processor_id) {
                    warn!(
                        "Loop end \"{}\" is not reachable from loop start \"{}\". Skipping loop.",
                        network.display_name(processor_id),
                        network.display_name(start_port.processor)
                    );
                    continue;
                }

                let Some(iterations) = loop_check.num_iterations(port) else {
                    continue;
                };
                loops.push(StaticLoop {
                    start_port: start_port.clone(),
                    end_port,
                    iterations,
                });
            }
        }

        loops
    }

    /// Drop every pair of loops that partially overlap.
    ///
    /// Two loops overlap when exactly one end of one lies on the other's body.
    fn discard_overlapping(&self, loops: Vec<StaticLoop>) -> Vec<StaticLoop> {
        let mut overlapping = vec![false; loops.len()];

        for (i, outer) in loops.iter().enumerate() {
            if overlapping[i] {
                continue;
            }
            for (j, other) in loops.iter().enumerate() {
                if i == j {
                    continue;
                }
                let start_inside = self.is_path_element(other.start(), outer.start(), outer.end());
                let end_inside = self.is_path_element(other.end(), outer.start(), outer.end());
                if start_inside != end_inside {
                    warn!(
                        "Loops {} -> {} and {} -> {} overlap. Skipping both.",
                        outer.end_port, outer.start_port, other.end_port, other.start_port
                    );
                    overlapping[i] = true;
                    overlapping[j] = true;
                }
            }
        }

        loops
            .into_iter()
            .zip(overlapping)
            .filter(|(_, skip)| !skip)
            .map(|(l, _)| l)
            .collect()
    }

    /// Replace one loop by `iterations` chained copies of its body.
    fn unroll(&mut self, static_loop: &StaticLoop, options: &BuildOptions) {
        let network = self.network();
        let (start_nodes, end_nodes) = (self.nodes_of(static_loop.start()), self.nodes_of(static_loop.end()));

        if start_nodes.len() != 1 || end_nodes.len() != 1 {
            error!(
                "Loop {} -> {}: expected exactly one start and one end node, found {} and {}. Skipping loop.",
                static_loop.end_port,
                static_loop.start_port,
                start_nodes.len(),
                end_nodes.len()
            );
            return;
        }
        let (start, end) = (start_nodes[0], end_nodes[0]);

        let body = self.path_nodes(&[start], &[end]);
        let added = body.len().saturating_mul(static_loop.iterations - 1);
        if self.node_count().saturating_add(added) > options.max_nodes {
            warn!(
                "Unrolling loop {} -> {} would exceed {} nodes. Leaving it rolled.",
                static_loop.end_port, static_loop.start_port, options.max_nodes
            );
            return;
        }

        debug!(
            "Unrolling loop \"{}\" -> \"{}\": {} node(s), {} iteration(s)",
            network.display_name(static_loop.end()),
            network.display_name(static_loop.start()),
            body.len(),
            static_loop.iterations
        );

        // Edges of the body as they were before the first copy; copies only
        // ever replicate these.
        let snapshot: Vec<(NodeId, Vec<NodeId>)> = body
            .iter()
            .filter_map(|&n| self.node(n).map(|node| (n, node.successors().to_vec())))
            .collect();

        let mut previous_end = end;
        for _ in 1..static_loop.iterations {
            let mut copies: HashMap<NodeId, NodeId> = HashMap::with_capacity(snapshot.len());
            for (original, _) in &snapshot {
                let processor = self.nodes()[original.index()].processor();
                copies.insert(*original, self.add_node(processor));
            }

            for (original, successors) in &snapshot {
                let from = copies[original];
                for successor in successors {
                    let to = copies.get(successor).copied().unwrap_or(*successor);
                    self.add_edge(from, to);
                }
            }

            self.add_edge(previous_end, copies[&start]);
            previous_end = copies[&end];
        }
    }
}
