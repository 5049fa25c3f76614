//! thoughtnet CLI - drive an associative thought network from the shell.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "thoughtnet")]
#[command(author, version, about = "thoughtnet - associative memory with spreading activation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new thoughtnet project
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Add a thought
    Add {
        name: String,

        #[arg(long, default_value = "0")]
        x: f64,

        #[arg(long, default_value = "0")]
        y: f64,
    },

    /// Draw an association from one thought to another
    Link {
        source: String,
        target: String,

        /// Also draw the reverse association
        #[arg(short, long)]
        both: bool,
    },

    /// Remove an association
    Unlink { source: String, target: String },

    /// Remove a thought and all of its associations
    Forget { name: String },

    /// Ask a question ("cat animal?") or teach a statement ("cat animal.")
    Ask { sentence: String },

    /// Activate a thought and watch the wave spread
    Activate {
        name: String,

        #[arg(short, long, default_value = "1.0")]
        energy: f64,
    },

    /// Run the network with maintenance for a while
    Run {
        /// How long to run
        #[arg(short, long, default_value = "30")]
        seconds: u64,

        /// Thoughts to activate at start (repeatable)
        #[arg(short, long)]
        activate: Vec<String>,

        #[arg(short, long, default_value = "1.0")]
        energy: f64,
    },

    /// Show network statistics
    Stats,

    /// Export the network
    Export {
        /// Output file path
        output: String,

        /// Export format: json or dot
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Delete every thought and association
    Trash {
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Add { name, x, y } => commands::graph::add(&name, x, y),
        Commands::Link { source, target, both } => commands::graph::link(&source, &target, both),
        Commands::Unlink { source, target } => commands::graph::unlink(&source, &target),
        Commands::Forget { name } => commands::graph::forget(&name),
        Commands::Ask { sentence } => commands::ask::run(&sentence),
        Commands::Activate { name, energy } => commands::run::activate(&name, energy),
        Commands::Run {
            seconds,
            activate,
            energy,
        } => commands::run::run(seconds, &activate, energy),
        Commands::Stats => commands::stats::run(),
        Commands::Export { output, format } => commands::export::run(&output, &format),
        Commands::Trash { yes } => commands::graph::trash(yes),
    }
}
