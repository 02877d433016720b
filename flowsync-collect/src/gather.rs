//! Recursive template collection under a source root.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use flowsync_core::document::GLOBAL_DIR;

use crate::classify::{self, Classification};
use crate::error::{io_err, CollectError};

/// One gathered template: relative path, classification, raw content.
///
/// Immutable snapshot — read once when gathered, never re-read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the source root.
    pub relative: PathBuf,
    pub classification: Classification,
    pub content: String,
}

/// Walk the source root and read every recognized template file.
///
/// The walk is sorted for a stable processing order, skips the shared
/// `__global__` subtree, and ignores files whose extension the classifier
/// does not recognize. A missing or unreadable root is fatal; a root with
/// no templates is an empty (valid) result.
pub fn gather_templates(source_root: &Path) -> Result<Vec<TemplateFile>, CollectError> {
    if !source_root.is_dir() {
        return Err(CollectError::SourceRootMissing {
            path: source_root.to_path_buf(),
        });
    }

    let mut templates = Vec::new();
    let walker = WalkDir::new(source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != GLOBAL_DIR);

    for entry in walker {
        let entry = entry.map_err(|source| CollectError::Walk {
            path: source_root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source_root)
            .unwrap_or(entry.path())
            .to_path_buf();
        let Some(classification) = classify::classify(&relative) else {
            continue;
        };

        let content =
            std::fs::read_to_string(entry.path()).map_err(|e| io_err(entry.path(), e))?;
        templates.push(TemplateFile {
            relative,
            classification,
            content,
        });
    }

    Ok(templates)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
