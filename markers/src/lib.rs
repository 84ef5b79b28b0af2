//! Binds Earthworm suggestions to document elements and serves gutter markers.
//!
//! The host supplies a [`DocumentModel`]; a [`SuggestionBinder`] anchors each
//! suggestion to the first element on its line and hands back
//! [`MarkerDescriptor`]s until the document changes.

mod binder;
mod document;
mod marker;
mod session;
mod shared;
mod text;

pub use binder::{
    BindSummary, BinderState, Collected, SuggestionBinder, UnresolvedAnchor, resolve_anchor,
};
pub use document::DocumentModel;
pub use marker::{MarkerDescriptor, QueryOutcome};
pub use session::AnnotationSession;
pub use shared::SharedBinder;
pub use text::{DocumentStamp, EditError, TextDocument, TokenId};
