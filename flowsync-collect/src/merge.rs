//! Merge orchestration — one pass over gathered templates.
//!
//! Each template is resolved through the manifest index, dispatched on its
//! classification, compared whitespace-insensitively against the record
//! field it feeds, and written into the in-memory document only on a real
//! difference. Resolution failures skip the file and never abort the pass.

use std::fmt;
use std::path::PathBuf;

use flowsync_core::{FlowDocument, FlowId, NameIndex};

use crate::classify::{self, TemplateFormat, TemplateRole};
use crate::compose::compose_sections;
use crate::detect::contents_match;
use crate::extract::{split_typed_source, strip_function_wrapper, unindent, INDENT_WIDTH};
use crate::gather::TemplateFile;

/// Declared record type that carries marker-composed typed content.
pub const TYPED_RECORD_KIND: &str = "typescript";

/// The record field a merge wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Func,
    Format,
    Initialize,
    Finalize,
    Info,
}

impl RecordField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Func => "func",
            RecordField::Format => "format",
            RecordField::Initialize => "initialize",
            RecordField::Finalize => "finalize",
            RecordField::Info => "info",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of merging a single template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A record field was overwritten.
    Updated {
        id: FlowId,
        field: RecordField,
        relative: PathBuf,
    },
    /// The record already holds equivalent content.
    Unchanged { id: FlowId, relative: PathBuf },
    /// The normalized base name has no manifest entry; file skipped.
    UnknownTemplate {
        relative: PathBuf,
        base_name: String,
    },
    /// The manifest resolved, but no record accepts this template.
    RecordMissing { id: FlowId, relative: PathBuf },
    /// The combination of role and format has no merge target.
    Skipped { relative: PathBuf },
}

/// Result of one full merge pass.
#[derive(Debug, Default)]
pub struct MergeSummary {
    /// Per-file outcomes, in processing order.
    pub outcomes: Vec<MergeOutcome>,
    /// Number of record fields overwritten.
    pub updated: usize,
}

impl MergeSummary {
    /// True when the document must be persisted.
    pub fn is_dirty(&self) -> bool {
        self.updated > 0
    }
}

/// Merge every gathered template into the document.
///
/// The shared declaration block is a plain parameter: composition never
/// reaches outside its arguments.
pub fn merge_templates(
    document: &mut FlowDocument,
    index: &NameIndex,
    globals: &str,
    templates: &[TemplateFile],
) -> MergeSummary {
    let mut summary = MergeSummary::default();
    for template in templates {
        let outcome = merge_one(document, index, globals, template);
        if let MergeOutcome::Updated { id, field, relative } = &outcome {
            tracing::info!("updated {} ({}) from {}", id, field, relative.display());
            summary.updated += 1;
        }
        summary.outcomes.push(outcome);
    }
    summary
}

fn merge_one(
    document: &mut FlowDocument,
    index: &NameIndex,
    globals: &str,
    template: &TemplateFile,
) -> MergeOutcome {
    let base = classify::base_name(&template.relative);
    let Some(id) = index.resolve(&base) else {
        tracing::error!(
            "{}: '{}' has no manifest entry; does the record exist?",
            template.relative.display(),
            base
        );
        return MergeOutcome::UnknownTemplate {
            relative: template.relative.clone(),
            base_name: base,
        };
    };
    let id = id.clone();

    match (template.classification.role, template.classification.format) {
        (TemplateRole::Info, _) => merge_info(document, id, template),
        (TemplateRole::Code, TemplateFormat::Display) => merge_display(document, id, template),
        (TemplateRole::Code, TemplateFormat::Script) => merge_script(document, id, template),
        (TemplateRole::Code, TemplateFormat::TypedScript) => {
            merge_typed(document, id, globals, template)
        }
        (
            TemplateRole::Initialize | TemplateRole::Finalize,
            TemplateFormat::Script | TemplateFormat::TypedScript,
        ) => merge_hook(document, id, template),
        _ => {
            tracing::debug!(
                "{}: no merge target for this role/format combination",
                template.relative.display()
            );
            MergeOutcome::Skipped {
                relative: template.relative.clone(),
            }
        }
    }
}

fn merge_info(document: &mut FlowDocument, id: FlowId, template: &TemplateFile) -> MergeOutcome {
    let Some(record) = document.find_mut(&id) else {
        return record_missing(id, template);
    };
    if contents_match(record.info.as_deref(), &template.content) {
        return unchanged(id, template);
    }
    record.info = Some(template.content.clone());
    updated(id, RecordField::Info, template)
}

fn merge_display(
    document: &mut FlowDocument,
    id: FlowId,
    template: &TemplateFile,
) -> MergeOutcome {
    let Some(record) = document.find_format_mut(&id) else {
        return record_missing(id, template);
    };
    if contents_match(record.format.as_deref(), &template.content) {
        return unchanged(id, template);
    }
    // The runtime executes `func`; `format` is what the editor shows. Both
    // carry the display source.
    record.format = Some(template.content.clone());
    record.func = Some(template.content.clone());
    updated(id, RecordField::Format, template)
}

fn merge_script(
    document: &mut FlowDocument,
    id: FlowId,
    template: &TemplateFile,
) -> MergeOutcome {
    let Some(record) = document.find_func_mut(&id) else {
        return record_missing(id, template);
    };
    let candidate = strip_function_wrapper(&template.content).trim().to_owned();
    if contents_match(record.func.as_deref(), &candidate) {
        return unchanged(id, template);
    }
    record.func = Some(candidate);
    updated(id, RecordField::Func, template)
}

fn merge_typed(
    document: &mut FlowDocument,
    id: FlowId,
    globals: &str,
    template: &TemplateFile,
) -> MergeOutcome {
    let Some(record) = document.find_func_mut(&id) else {
        return record_missing(id, template);
    };
    if record.kind != TYPED_RECORD_KIND {
        tracing::warn!(
            "{} is a typed template but record {} has type '{}'",
            template.relative.display(),
            id,
            record.kind
        );
    }

    let split = split_typed_source(&template.content);
    let body = unindent(&split.body, INDENT_WIDTH);
    // Comparing the composed candidate (markers included) against the stored
    // field is what keeps a second pass at zero updates.
    let candidate = compose_sections(globals, &split.local, body.trim());
    if contents_match(record.func.as_deref(), &candidate) {
        return unchanged(id, template);
    }
    record.func = Some(candidate);
    updated(id, RecordField::Func, template)
}

fn merge_hook(document: &mut FlowDocument, id: FlowId, template: &TemplateFile) -> MergeOutcome {
    let Some(record) = document.find_func_mut(&id) else {
        return record_missing(id, template);
    };
    let candidate = strip_function_wrapper(&template.content).trim().to_owned();

    let (stored, field) = match template.classification.role {
        TemplateRole::Initialize => (record.initialize.as_deref(), RecordField::Initialize),
        _ => (record.finalize.as_deref(), RecordField::Finalize),
    };
    if contents_match(stored, &candidate) {
        return unchanged(id, template);
    }
    match field {
        RecordField::Initialize => record.initialize = Some(candidate),
        _ => record.finalize = Some(candidate),
    }
    updated(id, field, template)
}

fn updated(id: FlowId, field: RecordField, template: &TemplateFile) -> MergeOutcome {
    MergeOutcome::Updated {
        id,
        field,
        relative: template.relative.clone(),
    }
}

fn unchanged(id: FlowId, template: &TemplateFile) -> MergeOutcome {
    MergeOutcome::Unchanged {
        id,
        relative: template.relative.clone(),
    }
}

fn record_missing(id: FlowId, template: &TemplateFile) -> MergeOutcome {
    tracing::warn!(
        "{}: manifest points at record {}, but no such record accepts it",
        template.relative.display(),
        id
    );
    MergeOutcome::RecordMissing {
        id,
        relative: template.relative.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{GLOBAL_END, GLOBAL_START, LOCAL_END, LOCAL_START};
    use flowsync_core::Manifest;
    use std::path::Path;

    fn document(json: &str) -> FlowDocument {
        serde_json::from_str(json).expect("document fixture")
    }

    fn index(pairs: &[(&str, &str)]) -> NameIndex {
        let entries = pairs
            .iter()
            .map(|(id, file_name)| {
                (
                    id.to_string(),
                    serde_json::from_value(serde_json::json!({ "fileName": file_name }))
                        .expect("entry"),
                )
            })
            .collect();
        Manifest(entries).name_index()
    }

    fn template(relative: &str, content: &str) -> TemplateFile {
        let relative = Path::new(relative).to_path_buf();
        let classification =
            classify::classify(&relative).expect("recognized template extension");
        TemplateFile {
            relative,
            classification,
            content: content.to_string(),
        }
    }

    fn wrapped(body: &str) -> String {
        format!("export default function handler(msg) {{\n    {body}\n}}\n")
    }

    #[test]
    fn manifest_miss_skips_and_leaves_document_alone() {
        let mut doc = document(r#"[{"id": "n1", "type": "function", "func": "old"}]"#);
        let before = doc.clone();
        let idx = index(&[("n1", "known")]);

        let summary =
            merge_templates(&mut doc, &idx, "", &[template("unknown.js", "x();")]);

        assert_eq!(summary.updated, 0);
        assert!(matches!(
            summary.outcomes[0],
            MergeOutcome::UnknownTemplate { ref base_name, .. } if base_name == "unknown"
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn script_update_strips_wrapper_and_writes_func() {
        let mut doc = document(r#"[{"id": "n1", "type": "function", "func": "old"}]"#);
        let idx = index(&[("n1", "step")]);

        let summary = merge_templates(
            &mut doc,
            &idx,
            "",
            &[template("step.js", &wrapped("return msg;"))],
        );

        assert_eq!(summary.updated, 1);
        let node = doc.find(&FlowId::from("n1")).expect("record");
        assert_eq!(node.func.as_deref(), Some("return msg;"));
    }

    #[test]
    fn merge_is_idempotent_for_scripts() {
        let mut doc = document(r#"[{"id": "n1", "type": "function", "func": ""}]"#);
        let idx = index(&[("n1", "step")]);
        let templates = [template("step.js", &wrapped("return msg;"))];

        let first = merge_templates(&mut doc, &idx, "", &templates);
        assert_eq!(first.updated, 1);

        let second = merge_templates(&mut doc, &idx, "", &templates);
        assert_eq!(second.updated, 0);
        assert!(matches!(second.outcomes[0], MergeOutcome::Unchanged { .. }));
    }

    #[test]
    fn whitespace_only_edits_do_not_update() {
        let mut doc =
            document(r#"[{"id": "n1", "type": "function", "func": "if (x) { y(); }"}]"#);
        let idx = index(&[("n1", "step")]);

        let summary = merge_templates(
            &mut doc,
            &idx,
            "",
            &[template("step.js", &wrapped("if (x) {\n        y();\n    }"))],
        );

        assert_eq!(summary.updated, 0);
    }

    #[test]
    fn first_population_of_absent_field_counts_as_update() {
        let mut doc = document(r#"[{"id": "n1", "type": "function", "func": "body"}]"#);
        let idx = index(&[("n1", "step")]);

        let summary = merge_templates(
            &mut doc,
            &idx,
            "",
            &[template("step.initialize.js", &wrapped("setup();"))],
        );

        assert_eq!(summary.updated, 1);
        let node = doc.find(&FlowId::from("n1")).expect("record");
        assert_eq!(node.initialize.as_deref(), Some("setup();"));
    }

    #[test]
    fn hooks_route_to_their_own_fields() {
        let mut doc = document(
            r#"[{"id": "n1", "type": "function", "func": "body", "initialize": "a", "finalize": "b"}]"#,
        );
        let idx = index(&[("n1", "step")]);

        let summary = merge_templates(
            &mut doc,
            &idx,
            "",
            &[
                template("step.initialize.js", &wrapped("setup();")),
                template("step.finalize.js", &wrapped("teardown();")),
            ],
        );

        assert_eq!(summary.updated, 2);
        let node = doc.find(&FlowId::from("n1")).expect("record");
        assert_eq!(node.initialize.as_deref(), Some("setup();"));
        assert_eq!(node.finalize.as_deref(), Some("teardown();"));
        assert_eq!(node.func.as_deref(), Some("body"), "primary body untouched");
    }

    #[test]
    fn typed_template_composes_globals_local_and_body() {
        let mut doc = document(r#"[{"id": "n1", "type": "typescript", "func": ""}]"#);
        let idx = index(&[("n1", "step")]);
        let content = "interface P { id: string }\n\nexport default function f(msg: P) {\n    return msg;\n}\n";

        let summary = merge_templates(
            &mut doc,
            &idx,
            "interface G {}",
            &[template("step.ts", content)],
        );

        assert_eq!(summary.updated, 1);
        let node = doc.find(&FlowId::from("n1")).expect("record");
        let expected = format!(
            "{GLOBAL_START}\ninterface G {{}}\n{GLOBAL_END}\n\n{LOCAL_START}\ninterface P {{ id: string }}\n{LOCAL_END}\n\nreturn msg;"
        );
        assert_eq!(node.func.as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn typed_merge_is_idempotent() {
        let mut doc = document(r#"[{"id": "n1", "type": "typescript", "func": ""}]"#);
        let idx = index(&[("n1", "step")]);
        let content = "interface P {}\n\nexport default function f(msg: P) {\n    return msg;\n}\n";
        let templates = [template("step.ts", content)];

        let first = merge_templates(&mut doc, &idx, "interface G {}", &templates);
        assert_eq!(first.updated, 1);

        let second = merge_templates(&mut doc, &idx, "interface G {}", &templates);
        assert_eq!(second.updated, 0);
    }

    #[test]
    fn typed_template_without_globals_omits_global_block() {
        let mut doc = document(r#"[{"id": "n1", "type": "typescript", "func": ""}]"#);
        let idx = index(&[("n1", "step")]);
        let content = "export default function f(msg: object) {\n    return msg;\n}\n";

        merge_templates(&mut doc, &idx, "", &[template("step.ts", content)]);

        let node = doc.find(&FlowId::from("n1")).expect("record");
        assert_eq!(node.func.as_deref(), Some("return msg;"));
    }

    #[test]
    fn typed_template_on_untyped_record_warns_but_updates() {
        let mut doc = document(r#"[{"id": "n1", "type": "function", "func": "old"}]"#);
        let idx = index(&[("n1", "step")]);
        let content = "export default function f(msg: object) {\n    return msg;\n}\n";

        let summary = merge_templates(&mut doc, &idx, "", &[template("step.ts", content)]);

        assert_eq!(summary.updated, 1, "type mismatch is a warning, not a stop");
        let node = doc.find(&FlowId::from("n1")).expect("record");
        assert_eq!(node.func.as_deref(), Some("return msg;"));
    }

    #[test]
    fn display_update_writes_format_and_mirrors_func() {
        let mut doc =
            document(r#"[{"id": "n1", "type": "ui_template", "format": "<p>old</p>"}]"#);
        let idx = index(&[("n1", "panel")]);

        let summary = merge_templates(
            &mut doc,
            &idx,
            "",
            &[template("panel.vue", "<p>new</p>")],
        );

        assert_eq!(summary.updated, 1);
        let node = doc.find(&FlowId::from("n1")).expect("record");
        assert_eq!(node.format.as_deref(), Some("<p>new</p>"));
        assert_eq!(node.func.as_deref(), Some("<p>new</p>"));
    }

    #[test]
    fn display_hook_templates_are_skipped() {
        let mut doc =
            document(r#"[{"id": "n1", "type": "ui_template", "format": "<p>x</p>"}]"#);
        let before = doc.clone();
        let idx = index(&[("n1", "panel")]);

        let summary = merge_templates(
            &mut doc,
            &idx,
            "",
            &[template("panel.initialize.vue", "<p>y</p>")],
        );

        assert_eq!(summary.updated, 0);
        assert!(matches!(summary.outcomes[0], MergeOutcome::Skipped { .. }));
        assert_eq!(doc, before);
    }

    #[test]
    fn info_templates_store_raw_content() {
        let mut doc = document(r#"[{"id": "n1", "type": "function", "func": "x"}]"#);
        let idx = index(&[("n1", "step")]);
        let content = "# Step\n\nDoes the thing.\n";

        let summary =
            merge_templates(&mut doc, &idx, "", &[template("step.info.md", content)]);

        assert_eq!(summary.updated, 1);
        let node = doc.find(&FlowId::from("n1")).expect("record");
        assert_eq!(node.info.as_deref(), Some(content));
    }

    #[test]
    fn record_without_func_field_is_reported_missing() {
        let mut doc = document(r#"[{"id": "n1", "type": "inject"}]"#);
        let idx = index(&[("n1", "step")]);

        let summary =
            merge_templates(&mut doc, &idx, "", &[template("step.js", "x();")]);

        assert_eq!(summary.updated, 0);
        assert!(matches!(
            summary.outcomes[0],
            MergeOutcome::RecordMissing { .. }
        ));
    }

    #[test]
    fn two_files_one_changed_counts_one_update() {
        let mut doc = document(
            r#"[
                {"id": "n1", "type": "function", "func": "same();"},
                {"id": "n2", "type": "function", "func": "old();"}
            ]"#,
        );
        let idx = index(&[("n1", "left"), ("n2", "right")]);

        let summary = merge_templates(
            &mut doc,
            &idx,
            "",
            &[
                template("left.js", &wrapped("same();")),
                template("right.js", &wrapped("new_version();")),
            ],
        );

        assert_eq!(summary.updated, 1);
        assert!(summary.is_dirty());
        assert_eq!(
            doc.find(&FlowId::from("n2")).expect("record").func.as_deref(),
            Some("new_version();")
        );
    }
}
