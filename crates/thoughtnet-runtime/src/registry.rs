//! The thought registry: name lookup plus the global edge list.
//!
//! `ThoughtGraph` is constructed explicitly and shared as `Arc<ThoughtGraph>`
//! by every component that needs it. Nodes live in a concurrent map keyed by
//! name; every live edge is also kept in one flat list so the maintenance
//! sweep can decay them without walking the graph.
//!
//! Structural operations touch the name map and the edge list as two
//! sequential steps. They are individually safe under concurrent callers but
//! not transactional as a whole.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rayon::prelude::*;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thoughtnet_core::edge::{AssociationEdge, EdgeParams};
use thoughtnet_core::node::ThoughtNode;
use thoughtnet_core::types::Position;
use tracing::debug;

/// Registry of thought nodes and association edges.
#[derive(Debug, Default)]
pub struct ThoughtGraph {
    nodes: DashMap<String, Arc<ThoughtNode>>,
    edges: RwLock<Vec<Arc<AssociationEdge>>>,
    edge_params: EdgeParams,
}

impl ThoughtGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose new edges use `params` instead of the defaults.
    pub fn with_edge_params(params: EdgeParams) -> Self {
        Self {
            nodes: DashMap::new(),
            edges: RwLock::new(Vec::new()),
            edge_params: params,
        }
    }

    pub fn edge_params(&self) -> &EdgeParams {
        &self.edge_params
    }

    pub fn exists(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<ThoughtNode>> {
        self.nodes.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Create a node at the origin. Returns `false` if the name was taken.
    pub fn create(&self, name: &str) -> bool {
        self.create_at(name, Position::origin())
    }

    /// Create a node at `position`. An existing node is left untouched.
    pub fn create_at(&self, name: &str, position: Position) -> bool {
        match self.nodes.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let node = ThoughtNode::new(name).with_position(position);
                debug!(thought = name, id = %node.id(), "created thought");
                slot.insert(Arc::new(node));
                true
            }
        }
    }

    pub fn set_position(&self, name: &str, position: Position) -> bool {
        match self.lookup(name) {
            Some(node) => {
                node.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Remove a node and every edge touching it.
    pub fn remove(&self, name: &str) -> bool {
        self.remove_detached(name).is_some()
    }

    /// Remove a node, returning the outgoing and incoming edges that were
    /// detached along with it. `None` if the name was unknown.
    pub fn remove_detached(&self, name: &str) -> Option<Vec<Arc<AssociationEdge>>> {
        let (_, node) = self.nodes.remove(name)?;
        let id = node.id();

        let mut detached = node.clear_connections();
        let outgoing = detached.len();

        let remaining = self.nodes();
        let inbound: Vec<Arc<AssociationEdge>> = remaining
            .par_iter()
            .filter_map(|other| other.disconnect_from(&id))
            .collect();
        detached.extend(inbound);

        self.forget_edges(&detached);
        debug!(
            thought = name,
            outgoing,
            inbound = detached.len() - outgoing,
            "removed thought"
        );
        Some(detached)
    }

    /// Draw an association from `source` to `target`.
    ///
    /// No-op (returns `false`) if either name is unknown, the names are
    /// equal, or the association already exists.
    pub fn connect(&self, source: &str, target: &str) -> bool {
        let (Some(from), Some(to)) = (self.lookup(source), self.lookup(target)) else {
            return false;
        };
        let edge = Arc::new(AssociationEdge::with_params(source, target, self.edge_params));
        if !from.connect_to(&to, Arc::clone(&edge)) {
            return false;
        }
        self.edges_write().push(Arc::clone(&edge));

        // A concurrent remove of either endpoint may have finished its scan
        // between lookup and push.
        if !self.is_live(&from) || !self.is_live(&to) {
            from.disconnect_from(&to.id());
            self.forget_edges(&[edge]);
            return false;
        }

        debug!(source, target, "connected thoughts");
        true
    }

    /// Whether `node` is the instance currently registered under its name.
    fn is_live(&self, node: &ThoughtNode) -> bool {
        self.nodes
            .get(node.name())
            .is_some_and(|entry| entry.value().id() == node.id())
    }

    /// Remove the association from `source` to `target`, if present.
    pub fn disconnect(&self, source: &str, target: &str) -> bool {
        self.disconnect_detached(source, target).is_some()
    }

    fn disconnect_detached(&self, source: &str, target: &str) -> Option<Arc<AssociationEdge>> {
        let from = self.lookup(source)?;
        let to = self.lookup(target)?;
        let edge = from.disconnect_from(&to.id())?;
        self.forget_edges(std::slice::from_ref(&edge));
        debug!(source, target, "disconnected thoughts");
        Some(edge)
    }

    /// The edge from `source` to `target`.
    pub fn edge(&self, source: &str, target: &str) -> Option<Arc<AssociationEdge>> {
        let from = self.lookup(source)?;
        let to = self.lookup(target)?;
        from.edge_to(&to.id())
    }

    /// Names of the nodes `name` points at, sorted.
    pub fn neighbors(&self, name: &str) -> Vec<String> {
        let Some(node) = self.lookup(name) else {
            return Vec::new();
        };
        let mut names: Vec<String> = node
            .associations()
            .into_iter()
            .map(|assoc| assoc.target.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Snapshot of every node.
    pub fn nodes(&self) -> Vec<Arc<ThoughtNode>> {
        self.nodes
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Snapshot of the global edge list.
    pub fn edges(&self) -> Vec<Arc<AssociationEdge>> {
        self.edges_read().clone()
    }

    /// Every node name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges_read().len()
    }

    /// Empty both the node map and the edge list.
    pub fn trash(&self) {
        let nodes = self.nodes();
        self.nodes.clear();
        // Break Arc cycles between nodes that point at each other.
        for node in &nodes {
            node.clear_connections();
        }
        self.edges_write().clear();
        debug!(nodes = nodes.len(), "trashed thought graph");
    }

    fn forget_edges(&self, detached: &[Arc<AssociationEdge>]) {
        if detached.is_empty() {
            return;
        }
        self.edges_write()
            .retain(|edge| !detached.iter().any(|gone| Arc::ptr_eq(edge, gone)));
    }

    fn edges_read(&self) -> RwLockReadGuard<'_, Vec<Arc<AssociationEdge>>> {
        self.edges.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn edges_write(&self) -> RwLockWriteGuard<'_, Vec<Arc<AssociationEdge>>> {
        self.edges.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ThoughtGraph {
    fn drop(&mut self) {
        // Nodes hold strong references to their neighbors.
        for entry in self.nodes.iter() {
            entry.value().clear_connections();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(names: &[&str]) -> ThoughtGraph {
        let graph = ThoughtGraph::new();
        for name in names {
            graph.create(name);
        }
        graph
    }

    #[test]
    fn create_and_lookup() {
        let graph = graph_with(&["cat"]);
        assert!(graph.exists("cat"));
        assert!(!graph.exists("dog"));
        assert_eq!(graph.lookup("cat").unwrap().name(), "cat");
        assert!(graph.lookup("dog").is_none());
    }

    #[test]
    fn create_is_idempotent() {
        let graph = ThoughtGraph::new();
        assert!(graph.create_at("x", Position::new(3.0, 4.0)));
        let original = graph.lookup("x").unwrap();
        original.add_energy(0.7);

        assert!(!graph.create("x"));
        let again = graph.lookup("x").unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(again.id(), original.id());
        assert!((again.energy() - 0.7).abs() < 1e-12);
        assert_eq!(again.position(), Position::new(3.0, 4.0));
    }

    #[test]
    fn connect_is_idempotent() {
        let graph = graph_with(&["a", "b"]);
        assert!(graph.connect("a", "b"));
        assert!(!graph.connect("a", "b"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors("a"), vec!["b".to_string()]);
        assert!(graph.neighbors("b").is_empty());
    }

    #[test]
    fn connect_ignores_unknown_and_self() {
        let graph = graph_with(&["a"]);
        assert!(!graph.connect("a", "ghost"));
        assert!(!graph.connect("ghost", "a"));
        assert!(!graph.connect("a", "a"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn node_and_global_edges_share_state() {
        let graph = graph_with(&["a", "b"]);
        graph.connect("a", "b");
        let via_node = graph.edge("a", "b").unwrap();
        let via_list = graph.edges().pop().unwrap();
        assert!(Arc::ptr_eq(&via_node, &via_list));

        via_list.reinforce(1.0, 1.0);
        assert_eq!(via_node.weight(), via_list.weight());
    }

    #[test]
    fn disconnect_removes_from_both_places() {
        let graph = graph_with(&["a", "b"]);
        graph.connect("a", "b");
        graph.connect("b", "a");
        assert!(graph.disconnect("a", "b"));
        assert!(!graph.disconnect("a", "b"));
        assert!(graph.edge("a", "b").is_none());
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edge("b", "a").is_some());
    }

    #[test]
    fn remove_detaches_outgoing_and_inbound() {
        let graph = graph_with(&["cat", "animal", "pet"]);
        graph.connect("cat", "animal");
        graph.connect("pet", "cat");
        graph.connect("pet", "animal");

        assert!(graph.remove("cat"));
        assert!(!graph.exists("cat"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors("pet"), vec!["animal".to_string()]);
        assert!(!graph.remove("cat"));
    }

    #[test]
    fn name_reuse_yields_fresh_node() {
        let graph = graph_with(&["cat", "animal"]);
        graph.connect("cat", "animal");
        let old = graph.lookup("cat").unwrap();
        old.add_energy(2.0);

        graph.remove("cat");
        graph.create("cat");
        let fresh = graph.lookup("cat").unwrap();
        assert_ne!(fresh.id(), old.id());
        assert_eq!(fresh.energy(), 0.0);
        assert!(graph.neighbors("cat").is_empty());
    }

    #[test]
    fn stale_handles_are_not_live() {
        let graph = graph_with(&["cat"]);
        let old = graph.lookup("cat").unwrap();
        assert!(graph.is_live(&old));

        graph.remove("cat");
        assert!(!graph.is_live(&old));
        graph.create("cat");
        assert!(!graph.is_live(&old));
        assert!(graph.is_live(&graph.lookup("cat").unwrap()));
    }

    #[test]
    fn connect_racing_remove_leaves_no_dangling_edges() {
        let graph = graph_with(&["hub"]);
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..500 {
                    let name = format!("leaf{}", i);
                    graph.create(&name);
                    graph.remove(&name);
                }
            });
            scope.spawn(|| {
                for i in 0..500 {
                    let name = format!("leaf{}", i);
                    graph.connect("hub", &name);
                    graph.connect(&name, "hub");
                }
            });
        });

        let live: std::collections::HashSet<_> =
            graph.nodes().iter().map(|node| node.id()).collect();
        for node in graph.nodes() {
            for assoc in node.associations() {
                assert!(live.contains(&assoc.target.id()));
            }
        }
        for edge in graph.edges() {
            assert!(graph.exists(edge.source()) && graph.exists(edge.target()));
        }
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn trash_clears_everything() {
        let graph = graph_with(&["a", "b", "c"]);
        graph.connect("a", "b");
        graph.connect("b", "c");
        graph.connect("c", "a");
        graph.trash();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.names().is_empty());
    }

    #[test]
    fn custom_edge_params_apply_to_new_edges() {
        let params = EdgeParams {
            initial_weight: 0.8,
            ..EdgeParams::default()
        };
        let graph = ThoughtGraph::with_edge_params(params);
        graph.create("a");
        graph.create("b");
        graph.connect("a", "b");
        assert!((graph.edge("a", "b").unwrap().weight() - 0.8).abs() < 1e-12);
    }
}
