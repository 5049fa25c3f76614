//! Ask a question or teach a statement.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use thoughtnet_runtime::prelude::*;

use super::open_network;

pub fn run(sentence: &str) -> Result<()> {
    let (_, network) = open_network()?;
    let processor =
        QueryProcessor::new(Arc::clone(network.graph())).with_store(Arc::clone(network.store()));

    match processor.process(sentence)? {
        QueryOutcome::Related(names) => {
            println!("{}", "Related thoughts".white().bold());
            for name in names {
                println!("  {} {}", "•".blue(), name.cyan());
            }
        }
        QueryOutcome::NotFound => println!("{} Nothing related found", "•".yellow()),
        QueryOutcome::NotAClique => println!(
            "{} Those thoughts are not all associated with each other",
            "✗".red()
        ),
        QueryOutcome::Remembered(created) if created.is_empty() => {
            println!("{} Already known", "•".yellow())
        }
        QueryOutcome::Remembered(created) => {
            println!("{} Remembered {} associations", "✓".green(), created.len());
            for (a, b) in created {
                println!("  {} → {}", a.cyan(), b.cyan());
            }
        }
        QueryOutcome::Ignored => println!(
            "{} End the sentence with {} to ask or {} to remember",
            "•".yellow(),
            "?".bold(),
            ".".bold()
        ),
    }
    Ok(())
}
