//! `flowsync diff` — show what collect would change.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use flowsync_collect::diff::diff_flows;

/// Arguments for `flowsync diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Path to the flow document (defaults to ~/.node-red/flows.json).
    #[arg(long, value_name = "PATH")]
    pub flows_file: Option<PathBuf>,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let flows_file = super::resolve_flows_file(self.flows_file)?;
        let diffs = diff_flows(&flows_file)
            .with_context(|| format!("diff failed for {}", flows_file.display()))?;

        if diffs.is_empty() {
            println!("{} nothing to collect", "✓".green());
            return Ok(());
        }

        for diff in &diffs {
            println!("{}", diff.unified_diff);
        }
        println!("{} record field(s) would change", diffs.len());
        Ok(())
    }
}
