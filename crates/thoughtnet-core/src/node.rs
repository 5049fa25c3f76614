//! Thought nodes: named concepts holding activation energy.
//!
//! Energy and threshold are atomic cells: `add_energy` and `update` are each a
//! single read-modify-write, which is all the activation engine and the
//! maintenance sweep ever need. Outgoing associations sit behind their own
//! lock and are keyed by the target's [`NodeId`].

use crate::edge::AssociationEdge;
use crate::types::{NodeId, Position};
use atomic_float::AtomicF64;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::Ordering;
use std::sync::{Arc, PoisonError, RwLock};

/// Threshold a freshly created node must reach to fire.
pub const DEFAULT_THRESHOLD: f64 = 0.5;
/// Floor the threshold recovers toward.
pub const DEFAULT_BASE_THRESHOLD: f64 = 0.3;
/// Multiplier applied to idle energy on each maintenance tick.
pub const ENERGY_DECAY: f64 = 0.9;
/// Energy at or below this is snapped to zero.
pub const ENERGY_FLOOR: f64 = 0.01;
/// Multiplier pulling the threshold back toward its base.
pub const THRESHOLD_RECOVERY: f64 = 0.95;

/// One outgoing link: the neighbor and the edge leading to it.
#[derive(Clone)]
pub struct Association {
    pub target: Arc<ThoughtNode>,
    pub edge: Arc<AssociationEdge>,
}

// Printing the target by name keeps Debug finite on cyclic graphs.
impl std::fmt::Debug for Association {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Association")
            .field("target", &self.target.name)
            .field("edge", &self.edge)
            .finish()
    }
}

/// A named concept in the network.
#[derive(Debug)]
pub struct ThoughtNode {
    id: NodeId,
    name: String,
    energy: AtomicF64,
    threshold: AtomicF64,
    base_threshold: f64,
    position: RwLock<Position>,
    connections: RwLock<HashMap<NodeId, Association>>,
}

impl ThoughtNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_threshold(name, DEFAULT_THRESHOLD)
    }

    /// Create a node with a custom starting threshold.
    ///
    /// The threshold is never allowed below the base threshold.
    pub fn with_threshold(name: impl Into<String>, threshold: f64) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            energy: AtomicF64::new(0.0),
            threshold: AtomicF64::new(threshold.max(DEFAULT_BASE_THRESHOLD)),
            base_threshold: DEFAULT_BASE_THRESHOLD,
            position: RwLock::new(Position::origin()),
            connections: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_position(self, position: Position) -> Self {
        self.set_position(position);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn energy(&self) -> f64 {
        self.energy.load(Ordering::Acquire)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.load(Ordering::Acquire)
    }

    pub fn base_threshold(&self) -> f64 {
        self.base_threshold
    }

    pub fn position(&self) -> Position {
        *self.position.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_position(&self, position: Position) {
        *self.position.write().unwrap_or_else(PoisonError::into_inner) = position;
    }

    /// Accumulate energy. Returns the energy after the addition.
    pub fn add_energy(&self, input_energy: f64) -> f64 {
        self.energy.fetch_add(input_energy, Ordering::AcqRel) + input_energy
    }

    /// Whether the accumulated energy has reached the firing threshold.
    pub fn can_fire(&self) -> bool {
        self.energy() >= self.threshold()
    }

    /// Passive decay of energy and recovery of the threshold.
    ///
    /// Returns `(energy, threshold)` after the update.
    pub fn update(&self) -> (f64, f64) {
        let decay = |e: f64| if e > ENERGY_FLOOR { e * ENERGY_DECAY } else { 0.0 };
        let energy = match self
            .energy
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |e| Some(decay(e)))
        {
            Ok(prev) | Err(prev) => decay(prev),
        };

        let base = self.base_threshold;
        let recover = |t: f64| (t * THRESHOLD_RECOVERY).max(base);
        let threshold = match self
            .threshold
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| Some(recover(t)))
        {
            Ok(prev) | Err(prev) => recover(prev),
        };

        (energy, threshold)
    }

    /// Add an outgoing association to `target`.
    ///
    /// Returns `false` (and drops `edge`) if one already exists or `target`
    /// is this node.
    pub fn connect_to(&self, target: &Arc<ThoughtNode>, edge: Arc<AssociationEdge>) -> bool {
        if target.id == self.id {
            return false;
        }
        let mut connections = self.connections.write().unwrap_or_else(PoisonError::into_inner);
        if connections.contains_key(&target.id) {
            return false;
        }
        connections.insert(
            target.id,
            Association {
                target: Arc::clone(target),
                edge,
            },
        );
        true
    }

    /// Detach the outgoing association to `target`, returning its edge.
    pub fn disconnect_from(&self, target: &NodeId) -> Option<Arc<AssociationEdge>> {
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(target)
            .map(|assoc| assoc.edge)
    }

    /// Drop every outgoing association, returning the detached edges.
    pub fn clear_connections(&self) -> Vec<Arc<AssociationEdge>> {
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, assoc)| assoc.edge)
            .collect()
    }

    pub fn is_connected_to(&self, target: &NodeId) -> bool {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(target)
    }

    pub fn edge_to(&self, target: &NodeId) -> Option<Arc<AssociationEdge>> {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(target)
            .map(|assoc| Arc::clone(&assoc.edge))
    }

    /// Snapshot of the outgoing associations.
    pub fn associations(&self) -> Vec<Association> {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Ids of every node this one points at.
    pub fn neighbor_ids(&self) -> HashSet<NodeId> {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    pub fn out_degree(&self) -> usize {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
