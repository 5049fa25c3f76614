//! thoughtnet Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use thoughtnet_core::prelude::*;
//! ```

pub use crate::types::{NodeId, Position, StoredEdge, StoredNode};

pub use crate::edge::{AssociationEdge, EdgeParams};

pub use crate::node::{Association, ThoughtNode};

pub use crate::store::ThoughtStore;

pub use crate::error::{Result, ThoughtError};
