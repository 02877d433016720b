//! Dry-run unified diff support for `flowsync diff`.

use std::path::Path;

use similar::TextDiff;

use flowsync_core::{document, FlowDocument, FlowId, FlowNode};

use crate::error::CollectError;
use crate::gather::{self, TemplateFile};
use crate::merge::{self, MergeOutcome, RecordField};

/// A single would-be field change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiff {
    pub id: FlowId,
    pub field: RecordField,
    pub unified_diff: String,
}

/// Compute what a collection pass would change, without writing anything.
///
/// The merge runs against a cloned document; every update becomes a unified
/// diff of the affected record field.
pub fn diff_templates(
    document: &FlowDocument,
    index: &flowsync_core::NameIndex,
    globals: &str,
    templates: &[TemplateFile],
) -> Vec<FieldDiff> {
    let mut preview = document.clone();
    let summary = merge::merge_templates(&mut preview, index, globals, templates);

    let mut diffs = Vec::new();
    for outcome in &summary.outcomes {
        let MergeOutcome::Updated { id, field, .. } = outcome else {
            continue;
        };
        let old = field_text(document.find(id), *field);
        let new = field_text(preview.find(id), *field);

        let old_header = format!("a/{id}#{field}");
        let new_header = format!("b/{id}#{field}");
        let unified = TextDiff::from_lines(old, new)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FieldDiff {
            id: id.clone(),
            field: *field,
            unified_diff: unified,
        });
    }
    diffs
}

/// Load everything a collection pass would load and diff it. No writes.
pub fn diff_flows(flows_file: &Path) -> Result<Vec<FieldDiff>, CollectError> {
    let doc = document::load_flows(flows_file)?;
    let source_root = document::source_root_for(flows_file);
    let manifest = document::load_manifest(&document::manifest_path_for(&source_root))?;
    let index = manifest.name_index();
    let globals = document::load_global_decls(&source_root)?;
    let templates = gather::gather_templates(&source_root)?;
    Ok(diff_templates(&doc, &index, &globals, &templates))
}

fn field_text(node: Option<&FlowNode>, field: RecordField) -> &str {
    let Some(node) = node else {
        return "";
    };
    let value = match field {
        RecordField::Func => node.func.as_deref(),
        RecordField::Format => node.format.as_deref(),
        RecordField::Initialize => node.initialize.as_deref(),
        RecordField::Finalize => node.finalize.as_deref(),
        RecordField::Info => node.info.as_deref(),
    };
    value.unwrap_or("")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
