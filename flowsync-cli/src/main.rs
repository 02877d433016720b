//! Flowsync — merge function-template files into a flow document.
//!
//! # Usage
//!
//! ```text
//! flowsync collect [--flows-file <path>] [--server-at <url>] [--dry-run]
//! flowsync diff [--flows-file <path>]
//! ```

mod commands;
mod reload;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{collect::CollectArgs, diff::DiffArgs};

#[derive(Parser, Debug)]
#[command(
    name = "flowsync",
    version,
    about = "Collect function templates back into a flow document",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge template files into the flow document and notify the runtime.
    Collect(CollectArgs),

    /// Show unified diffs of what collect would change.
    Diff(DiffArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Collect(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}
