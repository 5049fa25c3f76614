//! Periodic maintenance sweep.
//!
//! Every tick cools all thoughts (`ThoughtNode::update`) and weakens every
//! association by a fixed decay rate. The sweep runs on its own tokio task
//! and is not serialized with activation waves.

use crate::registry::ThoughtGraph;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thoughtnet_core::error::{Result, ThoughtError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Maintenance scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub interval_ms: u64,
    /// Multiplier applied to every edge weight per sweep.
    pub edge_decay_rate: f64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            edge_decay_rate: 0.995,
        }
    }
}

impl MaintenanceConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(ThoughtError::invalid_config(
                "maintenance.interval_ms",
                "must be at least 1",
            ));
        }
        if !(self.edge_decay_rate > 0.0 && self.edge_decay_rate <= 1.0) {
            return Err(ThoughtError::invalid_config(
                "maintenance.edge_decay_rate",
                "must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// What one sweep touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub nodes_updated: usize,
    pub edges_decayed: usize,
}

/// Drives the maintenance sweep on a fixed interval.
pub struct MaintenanceScheduler {
    graph: Arc<ThoughtGraph>,
    config: MaintenanceConfig,
    task: Mutex<Option<JoinHandle<()>>>,
    sweeps: Arc<AtomicU64>,
}

impl MaintenanceScheduler {
    pub fn new(graph: Arc<ThoughtGraph>, config: MaintenanceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            config,
            task: Mutex::new(None),
            sweeps: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn config(&self) -> &MaintenanceConfig {
        &self.config
    }

    /// Start sweeping every `interval`, first sweep immediately.
    ///
    /// A running schedule is replaced. Must be called from within a tokio
    /// runtime.
    pub fn start(&self, interval: Duration) {
        let interval = interval.max(Duration::from_millis(1));
        let graph = Arc::clone(&self.graph);
        let sweeps = Arc::clone(&self.sweeps);
        let decay_rate = self.config.edge_decay_rate;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let report = sweep_graph(&graph, decay_rate);
                let n = sweeps.fetch_add(1, Ordering::AcqRel) + 1;
                debug!(
                    sweep = n,
                    nodes = report.nodes_updated,
                    edges = report.edges_decayed,
                    "maintenance sweep"
                );
            }
        });

        if let Some(previous) = self.task_slot().replace(handle) {
            previous.abort();
            debug!("replaced running maintenance schedule");
        }
        info!(interval_ms = interval.as_millis() as u64, "maintenance started");
    }

    /// Start with the configured interval.
    pub fn start_default(&self) {
        self.start(self.config.interval());
    }

    /// Stop sweeping. Safe to call when not running.
    pub fn stop(&self) {
        if let Some(handle) = self.task_slot().take() {
            handle.abort();
            info!(sweeps = self.sweeps(), "maintenance stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task_slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Sweeps completed by the scheduled task.
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Acquire)
    }

    /// Run one sweep now, outside the schedule.
    pub fn sweep(&self) -> SweepReport {
        sweep_graph(&self.graph, self.config.edge_decay_rate)
    }

    fn task_slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for MaintenanceScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sweep_graph(graph: &ThoughtGraph, decay_rate: f64) -> SweepReport {
    let nodes = graph.nodes();
    nodes.par_iter().for_each(|node| {
        node.update();
    });

    let edges = graph.edges();
    edges.par_iter().for_each(|edge| {
        edge.decay(decay_rate);
    });

    SweepReport {
        nodes_updated: nodes.len(),
        edges_decayed: edges.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_ab() -> Arc<ThoughtGraph> {
        let graph = Arc::new(ThoughtGraph::new());
        graph.create("a");
        graph.create("b");
        graph.connect("a", "b");
        graph
    }

    #[test]
    fn config_validation() {
        assert!(MaintenanceConfig::default().validate().is_ok());
        let zero = MaintenanceConfig {
            interval_ms: 0,
            ..MaintenanceConfig::default()
        };
        assert!(zero.validate().is_err());
        let growth = MaintenanceConfig {
            edge_decay_rate: 1.5,
            ..MaintenanceConfig::default()
        };
        assert!(growth.validate().is_err());
    }

    #[test]
    fn manual_sweep_cools_and_decays() {
        let graph = graph_ab();
        let node = graph.lookup("a").unwrap();
        node.add_energy(1.0);
        let scheduler = MaintenanceScheduler::new(Arc::clone(&graph), MaintenanceConfig::default())
            .unwrap();

        let report = scheduler.sweep();
        assert_eq!(
            report,
            SweepReport {
                nodes_updated: 2,
                edges_decayed: 1
            }
        );
        assert!((node.energy() - 0.9).abs() < 1e-12);
        assert!((graph.edge("a", "b").unwrap().weight() - 0.4975).abs() < 1e-12);
        assert_eq!(scheduler.sweeps(), 0);
    }

    #[test]
    fn stop_without_start_is_harmless() {
        let scheduler = MaintenanceScheduler::new(graph_ab(), MaintenanceConfig::default()).unwrap();
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_sweeps_follow_the_interval() {
        let scheduler = MaintenanceScheduler::new(graph_ab(), MaintenanceConfig::default()).unwrap();
        scheduler.start(Duration::from_secs(10));
        assert!(scheduler.is_running());

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(scheduler.sweeps(), 3);

        scheduler.stop();
        assert!(!scheduler.is_running());
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(scheduler.sweeps(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_keeps_a_single_schedule() {
        let scheduler = MaintenanceScheduler::new(graph_ab(), MaintenanceConfig::default()).unwrap();
        scheduler.start(Duration::from_secs(10));
        scheduler.start(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(scheduler.sweeps(), 3);
        scheduler.stop();
    }
}
