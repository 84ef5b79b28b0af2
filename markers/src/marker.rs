//! Marker descriptors handed to the host for rendering.

use std::ops::Range;

use serde::Serialize;

use earthworm_types::{MarkerIcon, MarkerStyle, RefreshClass, Suggestion};

/// One gutter marker: an anchor element, its range, and the suggestion it shows.
///
/// The tooltip is the suggestion's full text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDescriptor<E> {
    anchor: E,
    range: Range<usize>,
    icon: MarkerIcon,
    refresh: RefreshClass,
    suggestion: Suggestion,
}

impl<E: PartialEq> MarkerDescriptor<E> {
    pub(crate) fn new(anchor: E, range: Range<usize>, suggestion: Suggestion, style: MarkerStyle) -> Self {
        Self {
            anchor,
            range,
            icon: style.icon,
            refresh: style.refresh,
            suggestion,
        }
    }

    #[must_use]
    pub fn anchor(&self) -> &E {
        &self.anchor
    }

    #[must_use]
    pub fn range(&self) -> &Range<usize> {
        &self.range
    }

    #[must_use]
    pub fn tooltip(&self) -> &str {
        self.suggestion.text()
    }

    #[must_use]
    pub fn icon(&self) -> MarkerIcon {
        self.icon
    }

    #[must_use]
    pub fn refresh(&self) -> RefreshClass {
        self.refresh
    }

    /// The suggestion this marker shows; pass it back to `dismiss` on navigation.
    #[must_use]
    pub fn suggestion(&self) -> &Suggestion {
        &self.suggestion
    }

    /// Whether `other` would render as the same marker.
    ///
    /// Same anchor, mergeable icons, same refresh class, and equal tooltip
    /// text. The originating line is not compared.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        self.anchor == other.anchor
            && self.icon.can_merge_with(other.icon)
            && self.refresh == other.refresh
            && self.tooltip() == other.tooltip()
    }
}

/// Outcome of a binder query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<E> {
    /// Markers for the current document (possibly none).
    Markers(Vec<MarkerDescriptor<E>>),
    /// The document changed since the last bind. The binding set was
    /// discarded and the host should re-run the analyzer.
    Invalidated,
}

impl<E> QueryOutcome<E> {
    #[must_use]
    pub fn markers(&self) -> &[MarkerDescriptor<E>] {
        match self {
            Self::Markers(markers) => markers,
            Self::Invalidated => &[],
        }
    }

    #[must_use]
    pub fn into_markers(self) -> Vec<MarkerDescriptor<E>> {
        match self {
            Self::Markers(markers) => markers,
            Self::Invalidated => Vec::new(),
        }
    }

    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        matches!(self, Self::Invalidated)
    }
}
