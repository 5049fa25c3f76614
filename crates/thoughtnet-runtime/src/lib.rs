//! # Thoughtnet Runtime
//!
//! The living part of the thought network: the registry that owns nodes and
//! associations, the engine that spreads activation, the maintenance loop
//! that lets everything cool down, and the sentence interface on top.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use thoughtnet_runtime::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let graph = Arc::new(ThoughtGraph::new());
//!     graph.create("cat");
//!     graph.create("animal");
//!     graph.connect("cat", "animal");
//!
//!     let engine = ActivationEngine::new(Arc::clone(&graph), EngineConfig::default())?;
//!     engine.activate("cat", 1.0);
//!     engine.wait_idle().await;
//!     Ok(())
//! }
//! ```

pub mod registry;
pub mod engine;
pub mod maintenance;
pub mod query;
pub mod persistent;
pub mod memory_store;
pub mod snapshot;

#[cfg(feature = "sqlite")]
pub mod sqlite_store;

pub mod prelude;
