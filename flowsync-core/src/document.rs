//! Flow-document and manifest persistence.
//!
//! # Storage layout
//!
//! ```text
//! <flows dir>/
//!   flows.json              (the flow document)
//!   src/
//!     manifest.json         (record id → fileName mapping)
//!     __global__/types.ts   (optional shared declarations)
//!     **/*.{vue,js,ts,md}   (template files)
//! ```
//!
//! Every path-derivation helper is pure; loads fail loudly on missing,
//! malformed, or empty documents, and saves go through a `.tmp` sibling plus
//! rename so a crashed run never leaves a half-written document behind.

use std::path::{Path, PathBuf};

use crate::error::{io_err, DocumentError};
use crate::types::{FlowDocument, Manifest};

/// Directory under the flow document's directory that holds template files.
pub const SOURCE_DIR: &str = "src";

/// Manifest file name inside the source root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Directory inside the source root holding shared declarations.
pub const GLOBAL_DIR: &str = "__global__";

/// Shared declarations file inside [`GLOBAL_DIR`].
pub const GLOBAL_DECLS_FILE: &str = "types.ts";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<flows dir>/src` — pure, no I/O.
pub fn source_root_for(flows_file: &Path) -> PathBuf {
    flows_file
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(SOURCE_DIR)
}

/// `<source root>/manifest.json` — pure, no I/O.
pub fn manifest_path_for(source_root: &Path) -> PathBuf {
    source_root.join(MANIFEST_FILE)
}

/// `<source root>/__global__/types.ts` — pure, no I/O.
pub fn global_decls_path(source_root: &Path) -> PathBuf {
    source_root.join(GLOBAL_DIR).join(GLOBAL_DECLS_FILE)
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load the flow document.
///
/// Returns `DocumentError::NotFound` if absent, `DocumentError::Parse` (with
/// path context) if malformed, and `DocumentError::Empty` if it parses to a
/// record-less document — an empty flow file is never a valid merge target.
pub fn load_flows(path: &Path) -> Result<FlowDocument, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let document: FlowDocument = serde_json::from_str(&contents).map_err(|e| {
        DocumentError::Parse {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    if document.is_empty() {
        return Err(DocumentError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(document)
}

/// Load the manifest. Same failure contract as [`load_flows`].
pub fn load_manifest(path: &Path) -> Result<Manifest, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let manifest: Manifest = serde_json::from_str(&contents).map_err(|e| {
        DocumentError::Parse {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    if manifest.is_empty() {
        return Err(DocumentError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(manifest)
}

/// Load the shared declarations block.
///
/// Absence is not an error: records composed without a global block simply
/// omit it.
pub fn load_global_decls(source_root: &Path) -> Result<String, DocumentError> {
    let path = global_decls_path(source_root);
    if !path.exists() {
        return Ok(String::new());
    }
    std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))
}

// ---------------------------------------------------------------------------
// Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save the flow document with stable pretty-printed indentation.
///
/// Write flow: serialize → `.json.tmp` sibling → `rename`. The `.tmp` lives
/// in the target directory so the rename stays on one filesystem.
pub fn save_flows(path: &Path, document: &FlowDocument) -> Result<(), DocumentError> {
    let json = serde_json::to_string_pretty(document)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
