//! Shared collection pipeline entrypoint used by the CLI.
//!
//! One pass: load the flow document and manifest, gather templates, merge,
//! and persist the document once — only when something actually changed.
//! Notifying the runtime is the caller's concern; [`CollectResult::written`]
//! says whether a notification is due.

use std::path::{Path, PathBuf};

use flowsync_core::document;

use crate::error::CollectError;
use crate::gather;
use crate::merge::{self, MergeSummary};

/// Result of one collection pass.
#[derive(Debug)]
pub struct CollectResult {
    pub flows_file: PathBuf,
    pub summary: MergeSummary,
    /// True when the document was persisted (never in dry-run mode).
    pub written: bool,
}

/// Run a full collection pass against `flows_file`.
///
/// Fatal errors (missing/empty/unparseable documents, unreadable source
/// root) abort before any mutation; per-file resolution failures are
/// recorded in the summary and skipped.
pub fn run(flows_file: &Path, dry_run: bool) -> Result<CollectResult, CollectError> {
    let mut doc = document::load_flows(flows_file)?;
    let source_root = document::source_root_for(flows_file);
    let manifest = document::load_manifest(&document::manifest_path_for(&source_root))?;
    let index = manifest.name_index();
    let globals = document::load_global_decls(&source_root)?;
    let templates = gather::gather_templates(&source_root)?;

    let summary = merge::merge_templates(&mut doc, &index, &globals, &templates);

    let written = summary.is_dirty() && !dry_run;
    if written {
        document::save_flows(flows_file, &doc)?;
        tracing::info!(
            "wrote {} ({} update(s))",
            flows_file.display(),
            summary.updated
        );
    } else if summary.is_dirty() {
        tracing::info!("[dry-run] would write {}", flows_file.display());
    }

    Ok(CollectResult {
        flows_file: flows_file.to_path_buf(),
        summary,
        written,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
