//! Thoughtnet Runtime Prelude: convenient imports for common usage.
//!
//! ```rust
//! use thoughtnet_runtime::prelude::*;
//! ```

pub use thoughtnet_core::prelude::*;

pub use crate::registry::ThoughtGraph;

pub use crate::engine::{ActivationEngine, ActivationEvent, EngineConfig};

pub use crate::maintenance::{MaintenanceConfig, MaintenanceScheduler, SweepReport};

pub use crate::query::{QueryMode, QueryOutcome, QueryProcessor};

pub use crate::persistent::{PersistentGraph, RestoreReport};

pub use crate::memory_store::MemoryThoughtStore;

pub use crate::snapshot::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};

// Re-export SQLite backend when feature is enabled
#[cfg(feature = "sqlite")]
pub use crate::sqlite_store::SqliteThoughtStore;
