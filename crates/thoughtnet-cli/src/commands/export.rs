//! Export the thought network.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use petgraph::dot::{Config as DotConfig, Dot};
use thoughtnet_runtime::prelude::*;

use super::open_network;

pub fn run(output: &str, format: &str) -> Result<()> {
    let (_, network) = open_network()?;
    let snapshot = GraphSnapshot::capture(network.graph());

    let content = render(&snapshot, format)?;

    std::fs::write(output, content).with_context(|| format!("Failed to write {}", output))?;
    println!(
        "{} Exported {} thoughts and {} associations to {}",
        "✓".green(),
        snapshot.nodes.len(),
        snapshot.edges.len(),
        output.cyan()
    );
    Ok(())
}

fn render(snapshot: &GraphSnapshot, format: &str) -> Result<String> {
    Ok(match format {
        "json" => snapshot.to_json()?,
        "dot" => render_dot(snapshot),
        other => bail!("Unknown export format {}. Use json or dot.", other.yellow()),
    })
}

fn render_dot(snapshot: &GraphSnapshot) -> String {
    let digraph = snapshot.to_digraph();
    let body = Dot::with_config(&digraph, &[DotConfig::GraphContentOnly]);
    format!("digraph thoughtnet {{\n{}}}\n", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_output_reads_back_as_a_snapshot() {
        let graph = ThoughtGraph::new();
        graph.create("cat");
        graph.create("animal");
        graph.connect("cat", "animal");
        let snapshot = GraphSnapshot::capture(&graph);

        let json = render(&snapshot, "json").unwrap();
        assert_eq!(GraphSnapshot::from_json(&json).unwrap(), snapshot);
        assert!(render(&snapshot, "csv").is_err());
    }

    #[test]
    fn dot_output_is_a_complete_digraph() {
        let graph = ThoughtGraph::new();
        graph.create("cat");
        graph.create("animal");
        graph.connect("cat", "animal");

        let dot = render_dot(&GraphSnapshot::capture(&graph));
        assert!(dot.starts_with("digraph thoughtnet {"));
        assert!(dot.trim_end().ends_with('}'));
        assert!(dot.contains("\"cat\""));
        assert!(dot.contains("->"));
    }
}
