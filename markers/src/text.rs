//! Plain-text document model.
//!
//! [`TextDocument`] gives the binder a document without a host editor: a
//! line-start index and a flat token sequence standing in for the syntax tree.
//! Tokens are maximal runs of whitespace, maximal runs of word characters,
//! or single punctuation characters; a token's next sibling is the token
//! after it. Whitespace runs may span line breaks, which is exactly the case
//! the binder's sibling step corrects for.

use std::ops::Range;

use serde::Serialize;

use crate::document::DocumentModel;

/// Handle to a token of a [`TextDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TokenId(usize);

impl TokenId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Version stamp of a [`TextDocument`]; bumped by every edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DocumentStamp(u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("edit range {start}..{end} is outside the document (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("edit range {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Whitespace,
    Word,
    Punct,
}

fn token_kind(c: char) -> TokenKind {
    if c.is_whitespace() {
        TokenKind::Whitespace
    } else if c.is_alphanumeric() || c == '_' {
        TokenKind::Word
    } else {
        TokenKind::Punct
    }
}

fn tokenize(text: &str) -> Vec<Range<usize>> {
    let mut tokens = Vec::new();
    let mut current: Option<(TokenKind, usize)> = None;

    for (offset, c) in text.char_indices() {
        let kind = token_kind(c);
        match current {
            Some((run, _)) if run == kind && kind != TokenKind::Punct => {}
            Some((_, start)) => {
                tokens.push(start..offset);
                current = Some((kind, offset));
            }
            None => current = Some((kind, offset)),
        }
    }
    if let Some((_, start)) = current {
        tokens.push(start..text.len());
    }

    tokens
}

fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

#[derive(Debug, Clone)]
pub struct TextDocument {
    text: String,
    line_starts: Vec<usize>,
    tokens: Vec<Range<usize>>,
    stamp: DocumentStamp,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            line_starts: line_starts(&text),
            tokens: tokenize(&text),
            text,
            stamp: DocumentStamp::default(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn token_text(&self, token: TokenId) -> Option<&str> {
        self.tokens.get(token.0).map(|range| &self.text[range.clone()])
    }

    /// Replace the whole text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.reindex();
    }

    /// Replace `range` with `replacement`.
    pub fn replace_range(&mut self, range: Range<usize>, replacement: &str) -> Result<(), EditError> {
        let Range { start, end } = range;
        if start > end || end > self.text.len() {
            return Err(EditError::OutOfBounds {
                start,
                end,
                len: self.text.len(),
            });
        }
        if !self.text.is_char_boundary(start) || !self.text.is_char_boundary(end) {
            return Err(EditError::NotCharBoundary { start, end });
        }

        self.text.replace_range(start..end, replacement);
        self.reindex();
        Ok(())
    }

    fn reindex(&mut self) {
        self.line_starts = line_starts(&self.text);
        self.tokens = tokenize(&self.text);
        self.stamp = DocumentStamp(self.stamp.0 + 1);
    }
}

impl DocumentModel for TextDocument {
    type Element = TokenId;
    type Stamp = DocumentStamp;

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_start_offset(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    fn line_number(&self, offset: usize) -> Option<usize> {
        if offset > self.text.len() {
            return None;
        }
        // line_starts[0] == 0, so at least one start is <= offset.
        Some(self.line_starts.partition_point(|&start| start <= offset) - 1)
    }

    fn modification_stamp(&self) -> DocumentStamp {
        self.stamp
    }

    fn element_at(&self, offset: usize) -> Option<TokenId> {
        let index = self.tokens.partition_point(|range| range.end <= offset);
        self.tokens
            .get(index)
            .filter(|range| range.start <= offset)
            .map(|_| TokenId(index))
    }

    fn next_sibling(&self, element: &TokenId) -> Option<TokenId> {
        let next = element.0 + 1;
        (next < self.tokens.len()).then_some(TokenId(next))
    }

    fn element_range(&self, element: &TokenId) -> Option<Range<usize>> {
        self.tokens.get(element.0).cloned()
    }
}
