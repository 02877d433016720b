//! Template file classification.
//!
//! Classification happens once, when a file is gathered; every later stage
//! consumes the resulting [`Classification`] instead of re-inspecting the
//! file name.

use std::path::Path;

/// Marker naming a startup-hook template (`name.initialize.js`).
pub const INITIALIZE_MARKER: &str = ".initialize.";

/// Marker naming a teardown-hook template (`name.finalize.js`).
pub const FINALIZE_MARKER: &str = ".finalize.";

/// Marker naming a documentation template (`name.info.md`).
pub const INFO_MARKER: &str = ".info.";

/// Which record field a template feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRole {
    /// The primary body.
    Code,
    /// The startup hook.
    Initialize,
    /// The teardown hook.
    Finalize,
    /// The documentation field.
    Info,
}

/// The syntactic shape of a template file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    /// `.vue` — display source stored verbatim.
    Display,
    /// `.js` — plain script with an exported-function wrapper.
    Script,
    /// `.ts` — script plus file-local declarations ahead of the wrapper.
    TypedScript,
    /// `.md` — documentation, stored verbatim.
    Document,
}

/// A file's role and format, decided once per gathered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub role: TemplateRole,
    pub format: TemplateFormat,
}

/// Classify a template by its (source-root-relative) path.
///
/// Returns `None` for unrecognized extensions; those files are never read.
/// A `.md` file is documentation no matter how it is named; for the rest,
/// hook markers decide the role and combine freely with the format — a file
/// can be a typed script and a startup hook at once.
pub fn classify(relative: &Path) -> Option<Classification> {
    let format = match relative.extension()?.to_str()? {
        "vue" => TemplateFormat::Display,
        "js" => TemplateFormat::Script,
        "ts" => TemplateFormat::TypedScript,
        "md" => TemplateFormat::Document,
        _ => return None,
    };

    let name = relative.file_name()?.to_str()?;
    let role = if format == TemplateFormat::Document {
        TemplateRole::Info
    } else if name.contains(INITIALIZE_MARKER) {
        TemplateRole::Initialize
    } else if name.contains(FINALIZE_MARKER) {
        TemplateRole::Finalize
    } else {
        TemplateRole::Code
    };

    Some(Classification { role, format })
}

/// Normalize a template path to the base name the manifest indexes.
///
/// Takes the last path segment, collapses the first occurrence of each role
/// marker to a single dot, strips the recognized extension, and trims.
pub fn base_name(relative: &Path) -> String {
    let name = relative
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = name.replacen(INITIALIZE_MARKER, ".", 1);
    name = name.replacen(FINALIZE_MARKER, ".", 1);
    name = name.replacen(INFO_MARKER, ".", 1);

    for suffix in [".vue", ".js", ".ts", ".md"] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.to_owned();
            break;
        }
    }

    name.trim().to_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
