//! Association edges: the learned, directed links between thoughts.
//!
//! An edge carries a weight in `[min_weight, max_weight]`. Co-activation of
//! its endpoints reinforces it; the maintenance sweep decays it. The weight
//! lives in an atomic cell so a reinforcement from a propagation wave and a
//! decay from the sweep can interleave without a lock.

use crate::error::{Result, ThoughtError};
use atomic_float::AtomicF64;
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;

/// Tunable parameters of an association edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    /// Weight assigned when the edge is created.
    pub initial_weight: f64,
    /// Fraction of energy that survives crossing the edge.
    pub decay_base: f64,
    /// Floor for the weight.
    pub min_weight: f64,
    /// Ceiling for the weight.
    pub max_weight: f64,
    /// Scale of Hebbian reinforcement.
    pub learning_rate: f64,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            initial_weight: 0.5,
            decay_base: 0.9,
            min_weight: 0.05,
            max_weight: 1.0,
            learning_rate: 0.05,
        }
    }
}

impl EdgeParams {
    /// Reject parameter sets that would break the weight bounds.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_weight.is_finite() && self.max_weight.is_finite()) {
            return Err(ThoughtError::invalid_config("edge.min_weight", "bounds must be finite"));
        }
        if self.min_weight > self.max_weight {
            return Err(ThoughtError::invalid_config(
                "edge.min_weight",
                format!("{} exceeds max_weight {}", self.min_weight, self.max_weight),
            ));
        }
        if !(self.min_weight..=self.max_weight).contains(&self.initial_weight) {
            return Err(ThoughtError::invalid_config(
                "edge.initial_weight",
                format!(
                    "{} outside [{}, {}]",
                    self.initial_weight, self.min_weight, self.max_weight
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.decay_base) {
            return Err(ThoughtError::invalid_config("edge.decay_base", "must be within [0, 1]"));
        }
        if self.learning_rate < 0.0 || !self.learning_rate.is_finite() {
            return Err(ThoughtError::invalid_config("edge.learning_rate", "must be finite and non-negative"));
        }
        Ok(())
    }

    fn clamp(&self, weight: f64) -> f64 {
        weight.max(self.min_weight).min(self.max_weight)
    }
}

/// A directed, weighted association from `source` to `target`.
#[derive(Debug)]
pub struct AssociationEdge {
    source: String,
    target: String,
    weight: AtomicF64,
    params: EdgeParams,
}

impl AssociationEdge {
    /// Create an edge with default parameters (weight 0.5).
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::with_params(source, target, EdgeParams::default())
    }

    pub fn with_params(
        source: impl Into<String>,
        target: impl Into<String>,
        params: EdgeParams,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: AtomicF64::new(params.clamp(params.initial_weight)),
            params,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn params(&self) -> &EdgeParams {
        &self.params
    }

    pub fn weight(&self) -> f64 {
        self.weight.load(Ordering::Acquire)
    }

    pub fn decay_base(&self) -> f64 {
        self.params.decay_base
    }

    /// Hebbian update: `weight += learning_rate * pre * post`, clamped.
    ///
    /// Returns the new weight.
    pub fn reinforce(&self, pre_energy: f64, post_energy: f64) -> f64 {
        let delta = self.params.learning_rate * pre_energy * post_energy;
        self.update_weight(|w| self.params.clamp(w + delta))
    }

    /// Multiplicative decay, never below `min_weight`. Returns the new weight.
    pub fn decay(&self, decay_rate: f64) -> f64 {
        let min = self.params.min_weight;
        self.update_weight(|w| (w * decay_rate).max(min))
    }

    fn update_weight(&self, f: impl Fn(f64) -> f64) -> f64 {
        // The closure always returns Some, so both arms carry the previous weight.
        let previous = match self
            .weight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |w| Some(f(w)))
        {
            Ok(w) | Err(w) => w,
        };
        f(previous)
    }
}
