//! Core domain types for Earthworm annotations.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! The analyzer crate produces [`Suggestion`]s, the markers crate binds them to
//! document elements and stamps them with a [`MarkerStyle`].

use serde::{Deserialize, Serialize};

// ============================================================================
// Suggestion
// ============================================================================

/// A single finding reported by the analyzer.
///
/// Fields are private; a suggestion is immutable once parsed. Equality,
/// hashing and ordering are by value over `(line, text)`, so two findings with
/// the same anchor line and message are the same suggestion no matter where
/// they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Suggestion {
    /// 0-indexed line number.
    line: u32,
    text: String,
}

impl Suggestion {
    #[must_use]
    pub fn new(line: u32, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }

    /// 0-indexed line the suggestion anchors to.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Message shown to the user. Multi-line for range findings.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// First line of the message, for single-line displays.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.text.lines().next().unwrap_or("").trim()
    }
}

// ============================================================================
// Marker Styling
// ============================================================================

/// Icon class a marker is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerIcon {
    #[default]
    Earthworm,
    Warning,
    Info,
}

impl MarkerIcon {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Earthworm => "earthworm",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Whether two markers with these icons may collapse into one gutter entry.
    #[must_use]
    pub fn can_merge_with(self, other: Self) -> bool {
        self == other
    }
}

/// Refresh pass a marker belongs to.
///
/// Hosts re-collect markers per pass; descriptors from different passes never
/// collapse into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshClass {
    #[default]
    UpdateAll,
    LineMarkers,
    ExternalTools,
}

impl RefreshClass {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdateAll => "update_all",
            Self::LineMarkers => "line_markers",
            Self::ExternalTools => "external_tools",
        }
    }
}

/// Icon and refresh class stamped onto every marker a binder emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarkerStyle {
    #[serde(default)]
    pub icon: MarkerIcon,
    #[serde(default)]
    pub refresh: RefreshClass,
}

impl MarkerStyle {
    #[must_use]
    pub const fn new(icon: MarkerIcon, refresh: RefreshClass) -> Self {
        Self { icon, refresh }
    }
}
