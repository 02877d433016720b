//! `flowsync collect` — merge templates and notify the runtime.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use flowsync_collect::{pipeline, MergeOutcome, MergeSummary};

use crate::reload;

/// Default admin endpoint of a locally running runtime.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:1880";

/// Arguments for `flowsync collect`.
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Path to the flow document (defaults to ~/.node-red/flows.json).
    #[arg(long, value_name = "PATH")]
    pub flows_file: Option<PathBuf>,

    /// Base URL of the runtime to notify after a successful write.
    #[arg(long, value_name = "URL", default_value = DEFAULT_SERVER)]
    pub server_at: String,

    /// Report what would change without writing or notifying.
    #[arg(long)]
    pub dry_run: bool,
}

impl CollectArgs {
    pub fn run(self) -> Result<()> {
        let flows_file = super::resolve_flows_file(self.flows_file)?;
        let result = pipeline::run(&flows_file, self.dry_run)
            .with_context(|| format!("collect failed for {}", flows_file.display()))?;

        print_summary(&result.summary, self.dry_run);

        if result.written {
            println!("{} wrote {}", "✓".green(), result.flows_file.display());
            match reload::notify_reload(&self.server_at) {
                Ok(()) => println!("{} runtime reloaded", "✓".green()),
                // The document is already on disk; a missed reload is
                // an inconvenience, not a failure of the pass.
                Err(err) => eprintln!("{} reload notification failed: {err:#}", "!".yellow()),
            }
        }
        Ok(())
    }
}

fn print_summary(summary: &MergeSummary, dry_run: bool) {
    for outcome in &summary.outcomes {
        match outcome {
            MergeOutcome::Updated { id, field, relative } => {
                println!("  ✎  {} → {id}.{field}", relative.display());
            }
            MergeOutcome::Unchanged { relative, .. } => {
                println!("  ·  {}", relative.display());
            }
            MergeOutcome::UnknownTemplate { relative, base_name } => {
                eprintln!(
                    "  {}  {} — '{base_name}' not in manifest",
                    "✗".red(),
                    relative.display()
                );
            }
            MergeOutcome::RecordMissing { id, relative } => {
                eprintln!(
                    "  {}  {} — no record '{id}' accepts it",
                    "?".yellow(),
                    relative.display()
                );
            }
            MergeOutcome::Skipped { relative } => {
                println!("  -  {}", relative.display());
            }
        }
    }

    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!(
        "{prefix}{} template(s) processed, {} update(s)",
        summary.outcomes.len(),
        summary.updated
    );
}
