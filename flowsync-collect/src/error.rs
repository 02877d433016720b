//! Error types for flowsync-collect.

use std::path::PathBuf;

use thiserror::Error;

use flowsync_core::DocumentError;

/// All errors that can arise from a collection pass.
#[derive(Debug, Error)]
pub enum CollectError {
    /// An error from flow-document or manifest persistence.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template source root could not be enumerated.
    #[error("cannot enumerate templates under {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The template source root does not exist.
    #[error("template source root not found at {path}")]
    SourceRootMissing { path: PathBuf },
}

/// Convenience constructor for [`CollectError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CollectError {
    CollectError::Io {
        path: path.into(),
        source,
    }
}
