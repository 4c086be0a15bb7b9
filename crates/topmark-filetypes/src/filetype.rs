//! File-type descriptors

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use topmark_fs::NewlineStyle;

use crate::error::{Error, Result};

/// Content predicate run against a file on disk.
pub type ContentMatcher = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Advisory predicate deciding whether a header may be inserted.
pub type PreInsertChecker = Arc<dyn Fn(&PreInsertInput<'_>) -> InsertCapability + Send + Sync>;

/// When a file type's content probe is allowed to run, given the name
/// signals already observed for a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentGate {
    /// Never probe content.
    #[default]
    Never,
    /// Probe only when an extension matched.
    IfExtension,
    /// Probe only when a filename or path tail matched.
    IfFilename,
    /// Probe only when a regex pattern matched.
    IfPattern,
    /// Probe when any name rule matched.
    IfAnyNameRule,
    /// Probe only when no name rule matched (fallback detection).
    IfNone,
    /// Always probe.
    Always,
}

impl ContentGate {
    /// Whether the probe may run given the observed name signals.
    pub fn permits(&self, extension: bool, filename: bool, pattern: bool) -> bool {
        let any = extension || filename || pattern;
        match self {
            Self::Never => false,
            Self::IfExtension => extension,
            Self::IfFilename => filename,
            Self::IfPattern => pattern,
            Self::IfAnyNameRule => any,
            Self::IfNone => !any,
            Self::Always => true,
        }
    }

    /// Whether a positive probe is required to confirm a name match.
    ///
    /// Gates that probe on top of a name rule describe overlay types
    /// sharing a name rule with a base type; for those, only an exact
    /// filename or a confirming probe counts. `IfNone` is a fallback and
    /// accepts plain name matches.
    pub fn requires_confirmation(&self) -> bool {
        !matches!(self, Self::Never | Self::IfNone)
    }
}

/// Header placement rules for a file type.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    /// A leading `#!` line is a shebang that must stay on line one.
    pub supports_shebang: bool,
    /// Matches an encoding declaration that must stay above the header
    /// (e.g. PEP 263 `# -*- coding: utf-8 -*-`).
    pub encoding_line: Option<Regex>,
    /// Separate an inserted header from following content with one blank line.
    pub blank_line_after_header: bool,
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self {
            supports_shebang: false,
            encoding_line: None,
            blank_line_after_header: true,
        }
    }
}

/// Result of a pre-insert capability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertCapability {
    Ok,
    /// Inserting would produce a file the next run could not reproduce.
    SkipIdempotenceRisk { reason: String },
    /// Inserting is refused for another type-specific reason.
    SkipOther { reason: String },
}

impl InsertCapability {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ok => None,
            Self::SkipIdempotenceRisk { reason } | Self::SkipOther { reason } => Some(reason),
        }
    }
}

/// Inputs available to a pre-insert check.
#[derive(Debug, Clone, Copy)]
pub struct PreInsertInput<'a> {
    /// BOM-stripped file image, terminators included.
    pub lines: &'a [String],
    pub newline: NewlineStyle,
    /// Whether the resolved policy allows splitting existing lines.
    pub allow_reflow: bool,
}

/// A registered file type.
#[derive(Clone)]
pub struct FileType {
    pub name: String,
    pub description: String,
    /// Basename suffixes including the leading dot (`.py`, `.d.ts`).
    pub extensions: Vec<String>,
    /// Exact basenames, or POSIX path tails when containing `/`.
    pub filenames: Vec<String>,
    patterns: Vec<(String, Regex)>,
    pub content_matcher: Option<ContentMatcher>,
    pub content_gate: ContentGate,
    /// Recognized, but headers are never managed for this type.
    pub skip_processing: bool,
    pub header_policy: HeaderPolicy,
    pub pre_insert_checker: Option<PreInsertChecker>,
}

impl FileType {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            extensions: Vec::new(),
            filenames: Vec::new(),
            patterns: Vec::new(),
            content_matcher: None,
            content_gate: ContentGate::Never,
            skip_processing: false,
            header_policy: HeaderPolicy::default(),
            pre_insert_checker: None,
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.extend(extensions.into_iter().map(Into::into));
        self
    }

    pub fn with_filenames<I, S>(mut self, filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filenames.extend(filenames.into_iter().map(Into::into));
        self
    }

    /// Add basename patterns. Each pattern must match the whole basename.
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            let pattern = pattern.into();
            let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                Error::InvalidPattern {
                    file_type: self.name.clone(),
                    pattern: pattern.clone(),
                    source,
                }
            })?;
            self.patterns.push((pattern, regex));
        }
        Ok(self)
    }

    pub fn with_content_matcher(mut self, gate: ContentGate, matcher: ContentMatcher) -> Self {
        self.content_gate = gate;
        self.content_matcher = Some(matcher);
        self
    }

    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }

    pub fn with_pre_insert_checker(mut self, checker: PreInsertChecker) -> Self {
        self.pre_insert_checker = Some(checker);
        self
    }

    pub fn skipping_processing(mut self) -> Self {
        self.skip_processing = true;
        self
    }

    /// Source text of the registered patterns.
    pub fn pattern_sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(source, _)| source.as_str())
    }

    /// Whether any pattern matches the whole basename.
    pub fn matches_pattern(&self, basename: &str) -> bool {
        self.patterns.iter().any(|(_, regex)| regex.is_match(basename))
    }

    /// Run the pre-insert check, defaulting to [`InsertCapability::Ok`].
    pub fn check_insert(&self, input: &PreInsertInput<'_>) -> InsertCapability {
        match &self.pre_insert_checker {
            Some(checker) => checker(input),
            None => InsertCapability::Ok,
        }
    }
}

impl fmt::Debug for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileType")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .field("filenames", &self.filenames)
            .field("patterns", &self.pattern_sources().collect::<Vec<_>>())
            .field("content_gate", &self.content_gate)
            .field("has_content_matcher", &self.content_matcher.is_some())
            .field("skip_processing", &self.skip_processing)
            .field("header_policy", &self.header_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_are_anchored() {
        let ft = FileType::new("req", "requirements")
            .with_patterns([r"requirements.*\.txt"])
            .unwrap();
        assert!(ft.matches_pattern("requirements-dev.txt"));
        assert!(!ft.matches_pattern("old-requirements.txt.bak"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let result = FileType::new("broken", "broken").with_patterns(["("]);
        assert!(matches!(result, Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn test_gate_permits() {
        assert!(ContentGate::IfExtension.permits(true, false, false));
        assert!(!ContentGate::IfExtension.permits(false, true, false));
        assert!(ContentGate::IfNone.permits(false, false, false));
        assert!(!ContentGate::IfNone.permits(false, false, true));
        assert!(!ContentGate::Never.permits(true, true, true));
        assert!(ContentGate::Always.permits(false, false, false));
    }

    #[test]
    fn test_missing_checker_allows_insert() {
        let ft = FileType::new("plain", "plain");
        let input = PreInsertInput {
            lines: &[],
            newline: NewlineStyle::Lf,
            allow_reflow: false,
        };
        assert!(ft.check_insert(&input).is_ok());
    }
}
