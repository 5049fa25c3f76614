//! Activation and timed runs.

use anyhow::{bail, Result};
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use thoughtnet_runtime::prelude::*;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use super::open_network;

pub fn activate(name: &str, energy: f64) -> Result<()> {
    let (loaded, network) = open_network()?;
    if !network.graph().exists(name) {
        bail!("Unknown thought {}", name.yellow());
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let engine = ActivationEngine::new(Arc::clone(network.graph()), loaded.config.engine.clone())?;
        let mut events = engine.subscribe();

        println!("{} Activating {} with {:.2}", "→".blue(), name.cyan(), energy);
        engine.activate(name, energy);
        engine.wait_idle().await;

        loop {
            match events.try_recv() {
                Ok(event) => print_event(&event),
                Err(TryRecvError::Lagged(skipped)) => {
                    println!("  {} {} events skipped", "…".dimmed(), skipped)
                }
                Err(_) => break,
            }
        }
        engine.shutdown().await;
        Ok::<_, anyhow::Error>(())
    })?;

    println!();
    print_energies(&GraphSnapshot::capture(network.graph()));
    Ok(())
}

pub fn run(seconds: u64, activate: &[String], energy: f64) -> Result<()> {
    let (loaded, network) = open_network()?;
    for name in activate {
        if !network.graph().exists(name) {
            bail!("Unknown thought {}", name.yellow());
        }
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let graph = Arc::clone(network.graph());
        let engine = ActivationEngine::new(Arc::clone(&graph), loaded.config.engine.clone())?;
        let scheduler = MaintenanceScheduler::new(Arc::clone(&graph), loaded.config.maintenance.clone())?;

        let mut events = engine.subscribe();
        let printer = tokio::spawn(async move {
            let mut fired = 0u64;
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if matches!(event, ActivationEvent::Fired { .. }) {
                            fired += 1;
                        }
                        tracing::debug!(?event, "activation event");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event printer fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            fired
        });

        scheduler.start_default();
        for name in activate {
            engine.activate(name, energy);
        }

        println!(
            "{} Running for {}s (Ctrl-C to stop early)...",
            "→".blue(),
            seconds
        );
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
            _ = tokio::signal::ctrl_c() => println!("{} Interrupted", "•".yellow()),
        }

        scheduler.stop();
        let pending = engine.pending();
        // Dropping the engine closes the event channel once the worker drains.
        drop(engine);
        let fired = printer.await.unwrap_or(0);

        println!(
            "{} {} sweeps, {} firings, {} waves still pending at stop",
            "✓".green(),
            scheduler.sweeps(),
            fired,
            pending
        );
        Ok::<_, anyhow::Error>(())
    })?;

    let saved = network.save_positions()?;
    tracing::info!(saved, "saved thought positions");
    println!();
    print_energies(&GraphSnapshot::capture(network.graph()));
    Ok(())
}

fn print_event(event: &ActivationEvent) {
    match event {
        ActivationEvent::Activated {
            thought,
            input_energy,
            energy,
        } => println!(
            "  {} {} +{:.4} = {:.4}",
            "•".blue(),
            thought.cyan(),
            input_energy,
            energy
        ),
        ActivationEvent::Fired {
            thought,
            energy,
            threshold,
        } => println!(
            "  {} {} fired ({:.4} ≥ {:.4})",
            "⚡".yellow(),
            thought.cyan().bold(),
            energy,
            threshold
        ),
        ActivationEvent::Propagated {
            source,
            target,
            energy,
            weight,
        } => println!(
            "    {} → {} {:.4} (weight now {:.4})",
            source,
            target,
            energy,
            weight
        ),
    }
}

fn print_energies(snapshot: &GraphSnapshot) {
    println!("{}", "Energy".blue().bold());
    let mut nodes: Vec<&NodeSnapshot> = snapshot.nodes.iter().filter(|n| n.energy > 0.0).collect();
    nodes.sort_by(|a, b| {
        b.energy
            .partial_cmp(&a.energy)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if nodes.is_empty() {
        println!("  {}", "(all thoughts at rest)".dimmed());
    }
    for node in nodes {
        println!(
            "  {} {:>8.4}  threshold {:.4}",
            format!("{:<20}", node.name).cyan(),
            node.energy,
            node.threshold
        );
    }
}
