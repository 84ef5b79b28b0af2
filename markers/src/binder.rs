//! Suggestion binder — the per-document cache of anchored suggestions.
//!
//! A binder holds at most one binding set. `bind` replaces it wholesale;
//! `query` serves marker descriptors from it as long as the document still
//! carries the stamp it was bound against, and drops it the first time the
//! stamp differs. The empty binder is the `Empty` state; a held set is
//! `Bound`. Invalidation is not a resting state: it is reported once through
//! [`QueryOutcome::Invalidated`] and leaves the binder `Empty`.

use std::collections::BTreeMap;
use std::fmt::Debug;

use earthworm_types::{MarkerStyle, Suggestion};

use crate::document::DocumentModel;
use crate::marker::{MarkerDescriptor, QueryOutcome};

/// Why a suggestion could not be anchored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnresolvedAnchor {
    #[error("line {line} is outside the document ({line_count} lines)")]
    LineOutOfRange { line: u32, line_count: usize },
    #[error("no element at offset {offset}")]
    NoElement { offset: usize },
    #[error("element covering line {line} starts earlier and has no next sibling")]
    NoSibling { line: u32 },
}

/// Find the element a suggestion on `line` should be anchored to.
///
/// Takes the smallest element at the start of the line. If that element
/// begins on an earlier line (leading whitespace that spans the line break),
/// its next sibling is used instead.
pub fn resolve_anchor<D: DocumentModel>(
    document: &D,
    line: u32,
) -> Result<D::Element, UnresolvedAnchor> {
    let index = line as usize;
    let offset = document
        .line_start_offset(index)
        .ok_or(UnresolvedAnchor::LineOutOfRange {
            line,
            line_count: document.line_count(),
        })?;

    let element = document
        .element_at(offset)
        .ok_or(UnresolvedAnchor::NoElement { offset })?;

    let starts_on_line = document
        .element_start(&element)
        .and_then(|start| document.line_number(start))
        == Some(index);
    if starts_on_line {
        return Ok(element);
    }

    document
        .next_sibling(&element)
        .ok_or(UnresolvedAnchor::NoSibling { line })
}

/// Result of a [`SuggestionBinder::bind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindSummary {
    /// Distinct suggestions now in the binding set.
    pub bound: usize,
    /// Suggestions dropped because no anchor could be resolved.
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinderState {
    Empty,
    Bound,
}

/// Result of [`SuggestionBinder::collect_markers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collected {
    /// Number of descriptors appended to the collection.
    Added(usize),
    /// The document changed since the last bind; the set was cleared.
    Invalidated,
}

#[derive(Debug, Clone)]
struct BindingSet<E, S> {
    stamp: S,
    anchors: BTreeMap<Suggestion, E>,
}

/// Per-document cache of suggestion → anchor bindings.
///
/// `E` and `S` are the element and stamp types of the [`DocumentModel`] the
/// binder is used with.
#[derive(Debug, Clone)]
pub struct SuggestionBinder<E, S> {
    /// `None` is the `Empty` state.
    active: Option<BindingSet<E, S>>,
    style: MarkerStyle,
}

impl<E, S> Default for SuggestionBinder<E, S> {
    fn default() -> Self {
        Self {
            active: None,
            style: MarkerStyle::default(),
        }
    }
}

impl<E, S> SuggestionBinder<E, S>
where
    E: Clone + PartialEq + Debug,
    S: Copy + PartialEq + Debug,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_style(mut self, style: MarkerStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn state(&self) -> BinderState {
        match self.active {
            Some(_) => BinderState::Bound,
            None => BinderState::Empty,
        }
    }

    /// Number of bound suggestions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.as_ref().map_or(0, |set| set.anchors.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bound suggestions, ordered by line then text.
    pub fn suggestions(&self) -> impl Iterator<Item = &Suggestion> {
        self.active
            .iter()
            .flat_map(|set| set.anchors.keys())
    }

    #[must_use]
    pub fn anchor_of(&self, suggestion: &Suggestion) -> Option<&E> {
        self.active.as_ref()?.anchors.get(suggestion)
    }

    /// Replace the binding set with `suggestions` anchored in `document`.
    ///
    /// Suggestions whose anchor cannot be resolved are dropped individually.
    /// Equal suggestions collapse into one binding.
    pub fn bind<D>(
        &mut self,
        suggestions: impl IntoIterator<Item = Suggestion>,
        document: &D,
    ) -> BindSummary
    where
        D: DocumentModel<Element = E, Stamp = S>,
    {
        let mut anchors = BTreeMap::new();
        let mut dropped = 0;

        for suggestion in suggestions {
            match resolve_anchor(document, suggestion.line()) {
                Ok(anchor) => {
                    anchors.insert(suggestion, anchor);
                }
                Err(reason) => {
                    dropped += 1;
                    tracing::debug!(
                        line = suggestion.line(),
                        %reason,
                        "Dropping suggestion without anchor"
                    );
                }
            }
        }

        let summary = BindSummary {
            bound: anchors.len(),
            dropped,
        };
        self.active = Some(BindingSet {
            stamp: document.modification_stamp(),
            anchors,
        });
        tracing::debug!(bound = summary.bound, dropped = summary.dropped, "Suggestions bound");
        summary
    }

    /// Markers for the current document.
    ///
    /// See [`collect_markers`](Self::collect_markers) for invalidation and
    /// deduplication.
    pub fn query<D>(&mut self, document: &D) -> QueryOutcome<E>
    where
        D: DocumentModel<Element = E, Stamp = S>,
    {
        let mut markers = Vec::new();
        match self.collect_markers(document, &mut markers) {
            Collected::Added(_) => QueryOutcome::Markers(markers),
            Collected::Invalidated => QueryOutcome::Invalidated,
        }
    }

    /// Append markers for the current document to `out`.
    ///
    /// If the document's stamp differs from the one recorded at bind time the
    /// binding set is cleared and nothing is appended; the caller should ask
    /// the host to refresh. Otherwise one descriptor is appended per binding
    /// whose anchor still resolves, skipping any that duplicate a descriptor
    /// already in `out`.
    pub fn collect_markers<D>(
        &mut self,
        document: &D,
        out: &mut Vec<MarkerDescriptor<E>>,
    ) -> Collected
    where
        D: DocumentModel<Element = E, Stamp = S>,
    {
        let Some(active) = &self.active else {
            return Collected::Added(0);
        };

        let current = document.modification_stamp();
        if active.stamp != current {
            tracing::debug!(
                bound_at = ?active.stamp,
                current = ?current,
                "Document changed since bind; clearing suggestions"
            );
            self.active = None;
            return Collected::Invalidated;
        }

        let mut added = 0;
        for (suggestion, anchor) in &active.anchors {
            let Some(range) = document.element_range(anchor) else {
                tracing::trace!(line = suggestion.line(), ?anchor, "Skipping stale anchor");
                continue;
            };
            let candidate =
                MarkerDescriptor::new(anchor.clone(), range, suggestion.clone(), self.style);
            if out.iter().any(|emitted| emitted.is_duplicate_of(&candidate)) {
                continue;
            }
            out.push(candidate);
            added += 1;
        }

        Collected::Added(added)
    }

    /// Remove exactly `suggestion`'s binding.
    ///
    /// Returns whether it was bound.
    pub fn dismiss(&mut self, suggestion: &Suggestion) -> bool {
        self.active
            .as_mut()
            .is_some_and(|set| set.anchors.remove(suggestion).is_some())
    }

    /// Drop the binding set.
    pub fn clear(&mut self) {
        self.active = None;
    }
}
