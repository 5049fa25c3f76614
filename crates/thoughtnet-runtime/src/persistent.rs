//! Graph plus durable mirror.
//!
//! `PersistentGraph` applies every structural change to the in-memory graph
//! first and then writes it through to a [`ThoughtStore`]. The in-memory
//! graph is authoritative: when the store fails the change stands and the
//! caller gets a `DataAccess` error describing what was not persisted.
//!
//! Only names, positions and edge existence are mirrored. A restored graph
//! starts with default energies, thresholds and weights.

use crate::registry::ThoughtGraph;
use std::sync::Arc;
use thoughtnet_core::error::{Result, ThoughtError};
use thoughtnet_core::store::ThoughtStore;
use thoughtnet_core::types::Position;
use tracing::{info, warn};

/// Counts from a restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreReport {
    pub nodes: usize,
    pub edges: usize,
    /// Edge records whose endpoints were not among the stored nodes.
    pub skipped_edges: usize,
}

/// A [`ThoughtGraph`] whose structure is mirrored into a store.
pub struct PersistentGraph {
    graph: Arc<ThoughtGraph>,
    store: Arc<dyn ThoughtStore>,
}

impl PersistentGraph {
    pub fn new(graph: Arc<ThoughtGraph>, store: Arc<dyn ThoughtStore>) -> Self {
        Self { graph, store }
    }

    pub fn graph(&self) -> &Arc<ThoughtGraph> {
        &self.graph
    }

    pub fn store(&self) -> &Arc<dyn ThoughtStore> {
        &self.store
    }

    /// Load every stored node, then every stored edge, into the graph.
    ///
    /// Nodes already present keep their state; only missing ones are created.
    pub fn restore(&self) -> Result<RestoreReport> {
        let nodes = self.store.load_all_nodes()?;
        let edges = self.store.load_all_edges()?;

        let mut report = RestoreReport::default();
        for node in &nodes {
            if self.graph.create_at(&node.name, node.position) {
                report.nodes += 1;
            }
        }
        for edge in &edges {
            if !self.graph.exists(&edge.source) || !self.graph.exists(&edge.target) {
                warn!(edge = %edge.key(), "stored association has a missing endpoint");
                report.skipped_edges += 1;
                continue;
            }
            if self.graph.connect(&edge.source, &edge.target) {
                report.edges += 1;
            }
        }

        info!(
            nodes = report.nodes,
            edges = report.edges,
            skipped = report.skipped_edges,
            "restored thought graph"
        );
        Ok(report)
    }

    /// Create a thought and record its position. Returns whether it was new.
    pub fn create_at(&self, name: &str, position: Position) -> Result<bool> {
        if !self.graph.create_at(name, position) {
            return Ok(false);
        }
        self.store.save_node_position(name, position)?;
        Ok(true)
    }

    pub fn set_position(&self, name: &str, position: Position) -> Result<bool> {
        if !self.graph.set_position(name, position) {
            return Ok(false);
        }
        self.store.save_node_position(name, position)?;
        Ok(true)
    }

    pub fn connect(&self, source: &str, target: &str) -> Result<bool> {
        if !self.graph.connect(source, target) {
            return Ok(false);
        }
        self.store.save_edge(source, target)?;
        Ok(true)
    }

    pub fn disconnect(&self, source: &str, target: &str) -> Result<bool> {
        if !self.graph.disconnect(source, target) {
            return Ok(false);
        }
        self.store.delete_edge(source, target)?;
        Ok(true)
    }

    /// Remove a thought, its associations, and their records.
    ///
    /// Every record delete is attempted; the first failure is returned.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let Some(detached) = self.graph.remove_detached(name) else {
            return Ok(false);
        };
        let mut first_error = None;
        for edge in &detached {
            keep_first(
                &mut first_error,
                self.store.delete_edge(edge.source(), edge.target()),
            );
        }
        keep_first(&mut first_error, self.store.delete_node(name));
        match first_error {
            Some(e) => Err(e),
            None => Ok(true),
        }
    }

    /// Write every thought's current position, e.g. before shutdown.
    pub fn save_positions(&self) -> Result<usize> {
        let nodes = self.graph.nodes();
        for node in &nodes {
            self.store.save_node_position(node.name(), node.position())?;
        }
        Ok(nodes.len())
    }

    /// Clear the graph, then both store tables.
    pub fn trash(&self) -> Result<()> {
        self.graph.trash();
        let mut first_error = None;
        keep_first(&mut first_error, self.store.delete_all_edges());
        keep_first(&mut first_error, self.store.delete_all_nodes());
        if let Some(e) = first_error {
            return Err(e);
        }
        info!("trashed thought graph and store");
        Ok(())
    }
}

fn keep_first(first: &mut Option<ThoughtError>, result: Result<()>) {
    if let Err(e) = result {
        warn!(error = %e, "store write failed");
        first.get_or_insert(e);
    }
}
