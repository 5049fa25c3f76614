//! Structural edits: add, link, unlink, forget, trash.

use anyhow::{bail, Result};
use colored::Colorize;
use thoughtnet_core::types::Position;

use super::open_network;

pub fn add(name: &str, x: f64, y: f64) -> Result<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        bail!(
            "Thought names may only contain letters and digits, got {}",
            name.yellow()
        );
    }

    let (_, network) = open_network()?;
    if network.create_at(name, Position::new(x, y))? {
        println!("{} Added {} at ({}, {})", "✓".green(), name.cyan(), x, y);
    } else {
        println!("{} {} already exists", "•".yellow(), name.cyan());
    }
    Ok(())
}

pub fn link(source: &str, target: &str, both: bool) -> Result<()> {
    let (_, network) = open_network()?;
    for name in [source, target] {
        if !network.graph().exists(name) {
            bail!("Unknown thought {}. Add it with {}", name.yellow(), "thoughtnet add".cyan());
        }
    }

    let mut pairs = vec![(source, target)];
    if both {
        pairs.push((target, source));
    }
    for (a, b) in pairs {
        if network.connect(a, b)? {
            println!("{} {} → {}", "✓".green(), a.cyan(), b.cyan());
        } else {
            println!("{} {} → {} not drawn (self or duplicate)", "•".yellow(), a, b);
        }
    }
    Ok(())
}

pub fn unlink(source: &str, target: &str) -> Result<()> {
    let (_, network) = open_network()?;
    if network.disconnect(source, target)? {
        println!("{} Removed {} → {}", "✓".green(), source.cyan(), target.cyan());
    } else {
        println!("{} No association {} → {}", "•".yellow(), source, target);
    }
    Ok(())
}

pub fn forget(name: &str) -> Result<()> {
    let (_, network) = open_network()?;
    let degree = network.graph().lookup(name).map(|n| n.out_degree());
    if network.remove(name)? {
        println!(
            "{} Forgot {} ({} outgoing associations)",
            "✓".green(),
            name.cyan(),
            degree.unwrap_or(0)
        );
    } else {
        println!("{} No thought named {}", "•".yellow(), name);
    }
    Ok(())
}

pub fn trash(yes: bool) -> Result<()> {
    if !yes {
        bail!("This deletes every thought and association. Re-run with {}", "--yes".cyan());
    }
    let (_, network) = open_network()?;
    let count = network.graph().node_count();
    network.trash()?;
    println!("{} Trashed {} thoughts", "✓".green(), count);
    Ok(())
}
