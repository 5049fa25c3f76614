//! # thoughtnet Core
//!
//! Core types for an associative thought network.
//!
//! A network is made of named **thought nodes** linked by directed, weighted
//! **association edges**. Activating a node injects energy; once the energy
//! reaches the node's threshold it fires, pushing a share of that energy to
//! each neighbor and strengthening the edge it travelled along (Hebbian
//! reinforcement). Unused edges and idle nodes decay back toward rest.
//!
//! This crate holds the leaf types shared by every other crate:
//!
//! - [`edge::AssociationEdge`]: weight plus decay/reinforcement parameters
//! - [`node::ThoughtNode`]: energy, dynamic threshold, outgoing associations
//! - [`store::ThoughtStore`]: the durable mirror contract (names, positions, edges)
//! - [`error::ThoughtError`]: the error taxonomy
//!
//! ## Quick Start
//!
//! ```rust
//! use thoughtnet_core::prelude::*;
//!
//! let edge = AssociationEdge::new("cat", "animal");
//! edge.reinforce(1.0, 0.45);
//! assert!(edge.weight() > 0.5);
//!
//! let node = ThoughtNode::new("cat");
//! node.add_energy(1.0);
//! assert!(node.can_fire());
//! ```

pub mod types;
pub mod edge;
pub mod node;
pub mod store;
pub mod error;
pub mod prelude;
