//! Advisory hints
//!
//! Hints never change a status or stop the pipeline. They tell the
//! user why a file ended where it did and what would change that.

use serde::Serialize;

use crate::status::Axis;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hint {
    /// Axis the hint explains.
    pub axis: Axis,
    /// Stable machine-readable code, e.g. `empty_file_skipped`.
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct HintLog {
    entries: Vec<Hint>,
}

impl HintLog {
    /// Record a hint. A repeated `(axis, code)` pair is ignored.
    pub fn push(&mut self, axis: Axis, code: &'static str, message: impl Into<String>) {
        if self.contains(axis, code) {
            return;
        }
        self.entries.push(Hint {
            axis,
            code,
            message: message.into(),
        });
    }

    pub fn contains(&self, axis: Axis, code: &str) -> bool {
        self.entries.iter().any(|h| h.axis == axis && h.code == code)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
