//! Header location types

use serde::Serialize;

/// Where an existing header sits in a file image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderBounds {
    /// No header markers at all.
    None,
    /// Markers are present but do not form a well-delimited header.
    Malformed { reason: String },
    /// Header occupies lines `start..end` (end exclusive).
    Span { start: usize, end: usize },
}

impl HeaderBounds {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    pub fn span(&self) -> Option<(usize, usize)> {
        match self {
            Self::Span { start, end } => Some((*start, *end)),
            _ => None,
        }
    }
}

/// Where a new header is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum InsertAnchor {
    /// Before the line with this index.
    Line(usize),
    /// At this character offset into the concatenated image.
    Offset(usize),
}
