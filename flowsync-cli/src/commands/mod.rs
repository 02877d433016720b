pub mod collect;
pub mod diff;

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolve the flow-document path from an optional CLI override.
///
/// Defaults to `~/.node-red/flows.json`.
pub fn resolve_flows_file(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".node-red").join("flows.json"))
}
