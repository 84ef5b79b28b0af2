//! Thread-shareable binder handle.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use earthworm_types::{MarkerStyle, Suggestion};

use crate::binder::{BindSummary, BinderState, SuggestionBinder};
use crate::document::DocumentModel;
use crate::marker::QueryOutcome;

/// A [`SuggestionBinder`] behind a mutex, for hosts that bind and query from
/// different threads.
///
/// Each operation takes the lock once, so a query never observes a
/// half-replaced binding set. Clones share the same binder.
#[derive(Debug)]
pub struct SharedBinder<E, S> {
    inner: Arc<Mutex<SuggestionBinder<E, S>>>,
}

impl<E, S> Clone for SharedBinder<E, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E, S> Default for SharedBinder<E, S> {
    fn default() -> Self {
        Self::from_binder(SuggestionBinder::default())
    }
}

impl<E, S> SharedBinder<E, S> {
    #[must_use]
    pub fn from_binder(binder: SuggestionBinder<E, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(binder)),
        }
    }

    // Every binder mutation is a single assignment or map operation, so a
    // poisoned binder is still consistent.
    fn lock(&self) -> MutexGuard<'_, SuggestionBinder<E, S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E, S> SharedBinder<E, S>
where
    E: Clone + PartialEq + Debug,
    S: Copy + PartialEq + Debug,
{
    #[must_use]
    pub fn new(style: MarkerStyle) -> Self {
        Self::from_binder(SuggestionBinder::new().with_style(style))
    }

    pub fn bind<D>(&self, suggestions: impl IntoIterator<Item = Suggestion>, document: &D) -> BindSummary
    where
        D: DocumentModel<Element = E, Stamp = S>,
    {
        self.lock().bind(suggestions, document)
    }

    pub fn query<D>(&self, document: &D) -> QueryOutcome<E>
    where
        D: DocumentModel<Element = E, Stamp = S>,
    {
        self.lock().query(document)
    }

    pub fn dismiss(&self, suggestion: &Suggestion) -> bool {
        self.lock().dismiss(suggestion)
    }

    #[must_use]
    pub fn state(&self) -> BinderState {
        self.lock().state()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
