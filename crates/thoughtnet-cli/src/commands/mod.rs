//! CLI command implementations.

pub mod init;
pub mod graph;
pub mod ask;
pub mod run;
pub mod stats;
pub mod export;

use anyhow::{Context, Result};
use std::sync::Arc;
use thoughtnet_runtime::prelude::*;

use crate::config::{Config, Loaded};

/// Open the configured SQLite mirror and restore it into a fresh graph.
pub fn open_network() -> Result<(Loaded, PersistentGraph)> {
    let loaded = Config::load()?;
    let path = loaded.store_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let store = SqliteThoughtStore::open(&path)
        .with_context(|| format!("Failed to open store: {}", path.display()))?;
    let graph = Arc::new(ThoughtGraph::with_edge_params(loaded.config.edges));
    let network = PersistentGraph::new(graph, Arc::new(store));
    network.restore().context("Failed to restore thought graph")?;
    Ok((loaded, network))
}
