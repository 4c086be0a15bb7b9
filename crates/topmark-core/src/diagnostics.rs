//! Per-file diagnostic log

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// One message recorded while processing a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    /// Name of the step that recorded it.
    pub step: &'static str,
    pub message: String,
}

/// Ordered diagnostics of one file.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn push(&mut self, level: DiagnosticLevel, step: &'static str, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            level,
            step,
            message: message.into(),
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries at exactly `level`.
    pub fn count(&self, level: DiagnosticLevel) -> usize {
        self.entries.iter().filter(|d| d.level == level).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(DiagnosticLevel::Error) > 0
    }

    /// Highest level present, if any.
    pub fn max_level(&self) -> Option<DiagnosticLevel> {
        self.entries.iter().map(|d| d.level).max()
    }
}
