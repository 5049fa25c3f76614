//! In-process `ThoughtStore`, for tests and ephemeral sessions.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock};
use thoughtnet_core::error::Result;
use thoughtnet_core::store::ThoughtStore;
use thoughtnet_core::types::{Position, StoredEdge, StoredNode};

/// Store that keeps records in memory. Loads return records sorted by name.
#[derive(Debug, Default)]
pub struct MemoryThoughtStore {
    nodes: RwLock<BTreeMap<String, Position>>,
    edges: RwLock<BTreeSet<(String, String)>>,
}

impl MemoryThoughtStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl ThoughtStore for MemoryThoughtStore {
    fn save_node_position(&self, name: &str, position: Position) -> Result<()> {
        self.nodes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), position);
        Ok(())
    }

    fn load_all_nodes(&self) -> Result<Vec<StoredNode>> {
        Ok(self
            .nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, position)| StoredNode::new(name.clone(), *position))
            .collect())
    }

    fn save_edge(&self, source: &str, target: &str) -> Result<()> {
        self.edges
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((source.to_string(), target.to_string()));
        Ok(())
    }

    fn load_all_edges(&self) -> Result<Vec<StoredEdge>> {
        Ok(self
            .edges
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(source, target)| StoredEdge::new(source.clone(), target.clone()))
            .collect())
    }

    fn delete_node(&self, name: &str) -> Result<()> {
        self.nodes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        Ok(())
    }

    fn delete_edge(&self, source: &str, target: &str) -> Result<()> {
        self.edges
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(source.to_string(), target.to_string()));
        Ok(())
    }

    fn delete_all_nodes(&self) -> Result<()> {
        self.nodes.write().unwrap_or_else(PoisonError::into_inner).clear();
        Ok(())
    }

    fn delete_all_edges(&self) -> Result<()> {
        self.edges.write().unwrap_or_else(PoisonError::into_inner).clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_upserts() {
        let store = MemoryThoughtStore::new();
        store.save_node_position("cat", Position::new(1.0, 2.0)).unwrap();
        store.save_node_position("cat", Position::new(5.0, 6.0)).unwrap();
        let nodes = store.load_all_nodes().unwrap();
        assert_eq!(nodes, vec![StoredNode::new("cat", Position::new(5.0, 6.0))]);
    }

    #[test]
    fn edges_are_a_set() {
        let store = MemoryThoughtStore::new();
        store.save_edge("cat", "animal").unwrap();
        store.save_edge("cat", "animal").unwrap();
        store.save_edge("animal", "cat").unwrap();
        assert_eq!(store.edge_count(), 2);

        store.delete_edge("cat", "animal").unwrap();
        assert_eq!(
            store.load_all_edges().unwrap(),
            vec![StoredEdge::new("animal", "cat")]
        );

        store.delete_all_edges().unwrap();
        store.delete_all_nodes().unwrap();
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.node_count(), 0);
    }
}
