//! Service definition draft handling
//!
//! A service definition draft (`.sddraft`) is an XML document produced by the
//! portal tooling. Only three kinds of text node in it are ever rewritten:
//! `SVCManifest/Type`, `SVCManifest/State` and every `TypeName`. The
//! [`ServiceDraft`] view locates exactly those nodes and keeps the rest of
//! the document as untouched source text.

pub mod document;
pub mod rewrite;

pub use document::{DraftField, ServiceDraft};
pub use rewrite::{RewriteSummary, to_feature_service};
