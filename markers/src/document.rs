//! Document boundary — what the binder needs from the host editor.

use std::fmt::Debug;
use std::ops::Range;

/// Read access to a document and its structural model.
///
/// Offsets are byte offsets into the document text; lines are 0-indexed.
/// `Element` is an opaque handle into the structural model (a syntax node, a
/// token) and only needs to be comparable. `Stamp` changes whenever the
/// document content changes.
pub trait DocumentModel {
    type Element: Clone + PartialEq + Debug;
    type Stamp: Copy + PartialEq + Debug;

    fn line_count(&self) -> usize;

    /// Offset of the first character of `line`, or `None` past the last line.
    fn line_start_offset(&self, line: usize) -> Option<usize>;

    /// Line containing `offset`, or `None` past the end of the document.
    fn line_number(&self, offset: usize) -> Option<usize>;

    fn modification_stamp(&self) -> Self::Stamp;

    /// Smallest structural element covering `offset`.
    fn element_at(&self, offset: usize) -> Option<Self::Element>;

    fn next_sibling(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Current text range of `element`, or `None` if it no longer exists.
    fn element_range(&self, element: &Self::Element) -> Option<Range<usize>>;

    /// Offset where `element`'s own text starts.
    fn element_start(&self, element: &Self::Element) -> Option<usize> {
        self.element_range(element).map(|range| range.start)
    }
}
