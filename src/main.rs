//! Procgraph CLI - Processor Network Graphs
//!
//! This is a demonstration CLI for the procgraph library.

use anyhow::{bail, Context, Result};
use procgraph::prelude::*;
use std::path::PathBuf;

#[derive(Debug)]
struct Args {
    network: PathBuf,
    config: Option<PathBuf>,
    unroll: bool,
    dot: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("procgraph");

    if args.len() < 2 || matches!(args[1].as_str(), "help" | "--help" | "-h") {
        print_usage(program);
        return;
    }

    let result = parse_args(&args[1..]).and_then(|a| run(&a));
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("procgraph v{}", procgraph::VERSION);
    println!();
    println!("Usage: {} <network.json> [options]", program);
    println!();
    println!("Prints the execution order of the processors in a network description.");
    println!();
    println!("Options:");
    println!("  --config <file>   Load build options from a TOML file");
    println!("  --unroll          Ignore loop ports for edges and unroll static loops");
    println!("  --dot             Print the graph in Graphviz DOT format instead");
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args {
        network: PathBuf::from(&args[0]),
        config: None,
        unroll: false,
        dot: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let Some(path) = args.get(i + 1) else {
                    bail!("missing value for --config");
                };
                parsed.config = Some(PathBuf::from(path));
                i += 2;
            }
            "--unroll" => {
                parsed.unroll = true;
                i += 1;
            }
            "--dot" => {
                parsed.dot = true;
                i += 1;
            }
            other => bail!("unknown option: {}", other),
        }
    }

    Ok(parsed)
}

fn run(args: &Args) -> Result<()> {
    let options = match &args.config {
        Some(path) => BuildOptions::from_toml_file(path)
            .with_context(|| format!("failed to load options from {}", path.display()))?,
        None => BuildOptions::default().with_keep_nodes(true),
    };

    let network = SerializedNetwork::from_file(&args.network)
        .and_then(SerializedNetwork::into_network)
        .with_context(|| format!("failed to load network from {}", args.network.display()))?;
    log::info!(
        "Loaded {} processor(s) and {} connection(s)",
        network.processor_count(),
        network.connection_count()
    );

    let processors: Vec<ProcessorId> = network.processor_ids().collect();
    let graph = if args.unroll {
        NetworkGraph::with_checks(
            &network,
            &processors,
            PortTypeCheck::non_loop_ports(),
            PortTypeCheck::loop_ports(),
            &options,
        )
    } else {
        NetworkGraph::with_checks(
            &network,
            &processors,
            PortTypeCheck::Accept,
            PortTypeCheck::Reject,
            &options,
        )
    };

    if args.dot {
        println!("{}", graph.to_dot());
        return Ok(());
    }

    let order = match graph.try_sort_topologically(&[]) {
        Ok(order) => order,
        Err(e) => {
            log::warn!("{}; order of cyclic processors is arbitrary", e);
            graph.sort_topologically(&[])
        }
    };

    println!(
        "Execution order ({} node(s), {} edge(s)):",
        graph.node_count(),
        graph.edge_count()
    );
    for (step, processor) in order.iter().enumerate() {
        println!("  {:>3}. {}", step + 1, network.display_name(*processor));
    }

    Ok(())
}
