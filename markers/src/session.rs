use earthworm_types::{MarkerStyle, Suggestion};

use crate::binder::{BindSummary, SuggestionBinder};
use crate::document::DocumentModel;
use crate::marker::QueryOutcome;

/// One open document and its binder.
///
/// Hosts create one session per document; nothing is shared between
/// sessions.
#[derive(Debug)]
pub struct AnnotationSession<D: DocumentModel> {
    document: D,
    binder: SuggestionBinder<D::Element, D::Stamp>,
}

impl<D: DocumentModel> AnnotationSession<D> {
    pub fn new(document: D) -> Self {
        Self {
            document,
            binder: SuggestionBinder::new(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: MarkerStyle) -> Self {
        self.binder = self.binder.with_style(style);
        self
    }

    /// Bind a fresh analyzer result against the current document.
    pub fn apply(&mut self, suggestions: impl IntoIterator<Item = Suggestion>) -> BindSummary {
        self.binder.bind(suggestions, &self.document)
    }

    pub fn markers(&mut self) -> QueryOutcome<D::Element> {
        self.binder.query(&self.document)
    }

    /// The user navigated to `suggestion`'s marker.
    pub fn dismiss(&mut self, suggestion: &Suggestion) -> bool {
        self.binder.dismiss(suggestion)
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access for edits. Edits that change the stamp invalidate the
    /// bound suggestions on the next [`markers`](Self::markers) call.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    #[must_use]
    pub fn binder(&self) -> &SuggestionBinder<D::Element, D::Stamp> {
        &self.binder
    }
}
