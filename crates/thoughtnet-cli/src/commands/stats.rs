//! Show network statistics.

use anyhow::Result;
use colored::Colorize;
use thoughtnet_runtime::prelude::*;

use super::open_network;

pub fn run() -> Result<()> {
    let (loaded, network) = open_network()?;
    let graph = network.graph();
    let snapshot = GraphSnapshot::capture(graph);

    let node_count = snapshot.nodes.len();
    let edge_count = snapshot.edges.len();
    let isolated = graph
        .nodes()
        .iter()
        .filter(|node| node.out_degree() == 0)
        .count();
    let max_out = graph
        .nodes()
        .iter()
        .map(|node| (node.out_degree(), node.name().to_string()))
        .max();

    println!("{}", "thoughtnet Statistics".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Store".blue().bold());
    println!("  Path:              {}", loaded.store_path().display());
    println!();

    println!("{}", "Graph Structure".blue().bold());
    println!("  Thoughts:          {}", node_count.to_string().cyan());
    println!("  Associations:      {}", edge_count.to_string().cyan());
    println!("  Without outgoing:  {}", isolated.to_string().cyan());
    println!("  Mean weight:       {:.4}", snapshot.mean_weight());
    println!("  Total energy:      {:.4}", snapshot.total_energy());
    if let Some((degree, name)) = max_out.filter(|(degree, _)| *degree > 0) {
        println!("  Most associative:  {} ({})", name.cyan(), degree);
    }
    println!(
        "  Cycles:            {}",
        if snapshot.has_cycles() { "yes".yellow() } else { "no".green() }
    );
    println!();

    // Density of a directed graph without self-loops
    if node_count > 1 {
        let max_edges = node_count * (node_count - 1);
        let density = edge_count as f64 / max_edges as f64;
        println!("{}", "Density".blue().bold());
        println!("  Graph density:     {:.6}", density);
        println!();
    }

    println!("{}", "Engine".blue().bold());
    println!(
        "  Propagation delay: {} ms",
        loaded.config.engine.propagation_delay_ms
    );
    println!(
        "  Energy cutoff:     {}",
        loaded.config.engine.min_propagated_energy
    );
    println!(
        "  Maintenance:       every {} ms, decay {}",
        loaded.config.maintenance.interval_ms, loaded.config.maintenance.edge_decay_rate
    );

    println!();
    println!("{}", "═".repeat(40).dimmed());

    Ok(())
}
