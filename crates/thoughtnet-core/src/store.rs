//! The durable mirror contract.
//!
//! A store only remembers which thoughts exist, where they were drawn, and
//! which associations connect them. Energy, thresholds and weights are
//! runtime state and start from defaults after a reload.
//!
//! Every method reports failures as [`ThoughtError::DataAccess`]; callers
//! decide whether to surface or log them. Nothing here retries.
//!
//! [`ThoughtError::DataAccess`]: crate::error::ThoughtError::DataAccess

use crate::error::Result;
use crate::types::{Position, StoredEdge, StoredNode};

/// Persistence backend for node positions and edge existence.
pub trait ThoughtStore: Send + Sync {
    /// Insert or update the position of a node.
    fn save_node_position(&self, name: &str, position: Position) -> Result<()>;

    /// All persisted nodes.
    fn load_all_nodes(&self) -> Result<Vec<StoredNode>>;

    /// Record a directed edge. Saving an existing edge is not an error.
    fn save_edge(&self, source: &str, target: &str) -> Result<()>;

    /// All persisted edges.
    fn load_all_edges(&self) -> Result<Vec<StoredEdge>>;

    /// Forget one node record.
    fn delete_node(&self, name: &str) -> Result<()>;

    /// Forget one directed edge record.
    fn delete_edge(&self, source: &str, target: &str) -> Result<()>;

    fn delete_all_nodes(&self) -> Result<()>;

    fn delete_all_edges(&self) -> Result<()>;
}
