//! Shared value types used across thoughtnet crates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one thought node instance.
///
/// Names are the registry key, but a name can be reused after removal.
/// The id tells the two apart: a re-created node gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Placement of a node on the drawing surface.
///
/// The network itself ignores it; it is carried so the persistence mirror
/// can restore a layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }
}

/// A persisted node record: name plus position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredNode {
    pub name: String,
    pub position: Position,
}

impl StoredNode {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// A persisted edge record: only existence and direction survive a reload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredEdge {
    pub source: String,
    pub target: String,
}

impl StoredEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Stable key `source->target`, used as the primary key in stores.
    pub fn key(&self) -> String {
        format!("{}->{}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_are_unique() {
        assert_ne!(NodeId::new(), NodeId::new());
    }

    #[test]
    fn stored_edge_key_is_directional() {
        let ab = StoredEdge::new("a", "b");
        let ba = StoredEdge::new("b", "a");
        assert_eq!(ab.key(), "a->b");
        assert_ne!(ab.key(), ba.key());
    }
}
