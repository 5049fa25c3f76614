//! Point-in-time export of the thought graph.
//!
//! A snapshot copies names, runtime state and weights out of the live graph
//! so they can be printed, serialized to JSON, or analysed with petgraph.
//! Values are read one cell at a time while waves and sweeps keep running,
//! so a snapshot is not a consistent cut.

use crate::registry::ThoughtGraph;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thoughtnet_core::error::Result;
use thoughtnet_core::types::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub energy: f64,
    pub threshold: f64,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// Nodes sorted by name; edges sorted by weight, strongest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    pub fn capture(graph: &ThoughtGraph) -> Self {
        let mut nodes: Vec<NodeSnapshot> = graph
            .nodes()
            .iter()
            .map(|node| NodeSnapshot {
                name: node.name().to_string(),
                energy: node.energy(),
                threshold: node.threshold(),
                position: node.position(),
            })
            .collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));

        let mut edges: Vec<EdgeSnapshot> = graph
            .edges()
            .iter()
            .map(|edge| EdgeSnapshot {
                source: edge.source().to_string(),
                target: edge.target().to_string(),
                weight: edge.weight(),
            })
            .collect();
        edges.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (&a.source, &a.target).cmp(&(&b.source, &b.target)))
        });

        Self { nodes, edges }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn total_energy(&self) -> f64 {
        self.nodes.iter().map(|n| n.energy).sum()
    }

    pub fn mean_weight(&self) -> f64 {
        if self.edges.is_empty() {
            return 0.0;
        }
        self.edges.iter().map(|e| e.weight).sum::<f64>() / self.edges.len() as f64
    }

    /// Directed petgraph view, node weights are names and edge weights are
    /// association weights. Edges with an unknown endpoint are left out.
    pub fn to_digraph(&self) -> DiGraph<String, f64> {
        let mut digraph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let index: HashMap<&str, NodeIndex> = self
            .nodes
            .iter()
            .map(|node| (node.name.as_str(), digraph.add_node(node.name.clone())))
            .collect();

        for edge in &self.edges {
            if let (Some(&a), Some(&b)) = (
                index.get(edge.source.as_str()),
                index.get(edge.target.as_str()),
            ) {
                digraph.add_edge(a, b, edge.weight);
            }
        }
        digraph
    }

    /// Whether some activation could travel back to where it started.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.to_digraph())
    }
}
