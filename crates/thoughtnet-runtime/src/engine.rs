//! Activation engine: energy injection, firing and delayed propagation.
//!
//! Activating a thought adds energy immediately and schedules a propagation
//! task for after a short processing pause. When the task comes due and the
//! thought's energy has reached its threshold, it fires: every outgoing
//! association passes on `input * weight * decay_base` and is reinforced.
//! Each neighbor that receives energy gets its own task on the same queue,
//! so a wave spreads breadth-first through a [`DelayQueue`] owned by one
//! worker task rather than through nested callbacks.
//!
//! Callers never wait for a wave. Waves from different activations overlap
//! freely and are not ordered relative to the maintenance sweep; only each
//! single energy or weight update is atomic.
//!
//! # Cycles
//!
//! A cycle of strong associations would keep re-firing forever. Propagated
//! energy below [`EngineConfig::min_propagated_energy`] is dropped, which
//! bounds every wave because each hop multiplies by at most `decay_base`.
//! Setting the cutoff to `0.0` disables the bound.

use crate::registry::ThoughtGraph;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thoughtnet_core::error::{Result, ThoughtError};
use thoughtnet_core::node::{Association, ThoughtNode};
use tokio::sync::{broadcast, mpsc, Notify};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::time::DelayQueue;
use tracing::{debug, trace, warn};

/// Activation engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pause between receiving energy and deciding whether to fire.
    pub propagation_delay_ms: u64,
    /// Propagated energy below this is not passed on. `0.0` = unbounded.
    pub min_propagated_energy: f64,
    /// Buffer size of the event broadcast channel.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            propagation_delay_ms: 600,
            min_propagated_energy: 0.001,
            event_capacity: 1024,
        }
    }
}

impl EngineConfig {
    pub fn propagation_delay(&self) -> Duration {
        Duration::from_millis(self.propagation_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_propagated_energy.is_finite() || self.min_propagated_energy < 0.0 {
            return Err(ThoughtError::invalid_config(
                "engine.min_propagated_energy",
                "must be finite and non-negative",
            ));
        }
        if self.event_capacity == 0 {
            return Err(ThoughtError::invalid_config(
                "engine.event_capacity",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Something observable that happened during activation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivationEvent {
    /// Energy was added to a thought.
    Activated {
        thought: String,
        input_energy: f64,
        energy: f64,
    },
    /// A thought reached its threshold and is propagating.
    Fired {
        thought: String,
        energy: f64,
        threshold: f64,
    },
    /// Energy crossed an association, which was then reinforced.
    Propagated {
        source: String,
        target: String,
        energy: f64,
        weight: f64,
    },
}

/// A thought waiting for its firing check.
struct Propagation {
    node: Arc<ThoughtNode>,
    input_energy: f64,
}

/// Counts scheduled-or-running propagation tasks.
#[derive(Debug, Default)]
struct WaveTracker {
    in_flight: AtomicUsize,
    idle: Notify,
}

impl WaveTracker {
    fn begin(&self) {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
    }

    fn finish(&self) {
        if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }

    fn pending(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Handle to the activation engine.
///
/// Dropping the handle stops intake; tasks already scheduled still run.
pub struct ActivationEngine {
    graph: Arc<ThoughtGraph>,
    config: EngineConfig,
    inbox: mpsc::UnboundedSender<(Propagation, Instant)>,
    tracker: Arc<WaveTracker>,
    events: broadcast::Sender<ActivationEvent>,
    worker: JoinHandle<()>,
}

impl ActivationEngine {
    /// Start an engine over `graph`.
    ///
    /// # Panics
    /// Must be called from within a tokio runtime; the propagation worker is
    /// spawned onto it.
    pub fn new(graph: Arc<ThoughtGraph>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let (inbox, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(config.event_capacity);
        let tracker = Arc::new(WaveTracker::default());

        let propagator = Propagator {
            delay: config.propagation_delay(),
            min_energy: config.min_propagated_energy,
            tracker: Arc::clone(&tracker),
            events: events.clone(),
        };
        let worker = tokio::spawn(propagator.run(rx));

        Ok(Self {
            graph,
            config,
            inbox,
            tracker,
            events,
            worker,
        })
    }

    pub fn graph(&self) -> &Arc<ThoughtGraph> {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Inject energy into the thought called `name`.
    ///
    /// Returns `false` without side effects if no such thought exists.
    pub fn activate(&self, name: &str, input_energy: f64) -> bool {
        match self.graph.lookup(name) {
            Some(node) => {
                self.activate_node(&node, input_energy);
                true
            }
            None => {
                debug!(thought = name, "activation ignored: unknown thought");
                false
            }
        }
    }

    /// Inject energy into a node handle, whether or not it is still registered.
    pub fn activate_node(&self, node: &Arc<ThoughtNode>, input_energy: f64) {
        let energy = node.add_energy(input_energy);
        debug!(thought = node.name(), input_energy, energy, "thought activated");
        let _ = self.events.send(ActivationEvent::Activated {
            thought: node.name().to_string(),
            input_energy,
            energy,
        });

        self.tracker.begin();
        let due = Instant::now() + self.config.propagation_delay();
        let task = Propagation {
            node: Arc::clone(node),
            input_energy,
        };
        if self.inbox.send((task, due)).is_err() {
            self.tracker.finish();
            warn!(thought = node.name(), "propagation worker is gone; activation will not spread");
        }
    }

    /// Number of propagation tasks scheduled or running.
    pub fn pending(&self) -> usize {
        self.tracker.pending()
    }

    /// Resolve once every scheduled propagation has run.
    ///
    /// Activations issued while waiting extend the wait.
    pub async fn wait_idle(&self) {
        self.tracker.wait_idle().await;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ActivationEvent> {
        self.events.subscribe()
    }

    /// Stop intake and wait for every scheduled task to run.
    pub async fn shutdown(self) {
        let Self { inbox, worker, .. } = self;
        drop(inbox);
        if let Err(e) = worker.await {
            warn!("propagation worker ended abnormally: {}", e);
        }
    }
}

/// Owns the delay queue; runs on the worker task.
struct Propagator {
    delay: Duration,
    min_energy: f64,
    tracker: Arc<WaveTracker>,
    events: broadcast::Sender<ActivationEvent>,
}

impl Propagator {
    async fn run(self, mut inbox: mpsc::UnboundedReceiver<(Propagation, Instant)>) {
        let mut queue: DelayQueue<Propagation> = DelayQueue::new();
        let mut open = true;

        loop {
            tokio::select! {
                incoming = inbox.recv(), if open => match incoming {
                    Some((task, due)) => {
                        queue.insert_at(task, due);
                    }
                    None => open = false,
                },
                Some(expired) = queue.next(), if !queue.is_empty() => {
                    self.fire(expired.into_inner(), &mut queue);
                }
                else => break,
            }
        }
        debug!("propagation worker stopped");
    }

    fn fire(&self, task: Propagation, queue: &mut DelayQueue<Propagation>) {
        let Propagation { node, input_energy } = task;

        if node.can_fire() {
            let energy = node.energy();
            debug!(thought = node.name(), energy, threshold = node.threshold(), "thought fired");
            let _ = self.events.send(ActivationEvent::Fired {
                thought: node.name().to_string(),
                energy,
                threshold: node.threshold(),
            });

            for Association { target, edge } in node.associations() {
                let propagated = input_energy * edge.weight() * edge.decay_base();
                if propagated < self.min_energy {
                    trace!(
                        source = node.name(),
                        target = target.name(),
                        propagated,
                        "propagation below cutoff"
                    );
                    continue;
                }

                let target_energy = target.add_energy(propagated);
                self.tracker.begin();
                queue.insert(
                    Propagation {
                        node: Arc::clone(&target),
                        input_energy: propagated,
                    },
                    self.delay,
                );

                let weight = edge.reinforce(input_energy, propagated);
                trace!(
                    source = node.name(),
                    target = target.name(),
                    propagated,
                    weight,
                    "propagated"
                );
                let _ = self.events.send(ActivationEvent::Propagated {
                    source: node.name().to_string(),
                    target: target.name().to_string(),
                    energy: propagated,
                    weight,
                });
                let _ = self.events.send(ActivationEvent::Activated {
                    thought: target.name().to_string(),
                    input_energy: propagated,
                    energy: target_energy,
                });
            }
        }

        self.tracker.finish();
    }
}
