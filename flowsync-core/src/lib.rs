//! Flowsync core library — domain types, document persistence, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and document structs
//! - [`error`] — [`DocumentError`]
//! - [`document`] — load / save / well-known paths

pub mod document;
pub mod error;
pub mod types;

pub use error::DocumentError;
pub use types::{FlowDocument, FlowId, FlowNode, Manifest, ManifestEntry, NameIndex};
