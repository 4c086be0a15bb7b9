//! File-type scoring
//!
//! Every candidate is scored independently against a path; the highest
//! score wins and ties go to the lexicographically smaller name, so the
//! result never depends on registration order.
//!
//! Precedence, highest first: exact filename or path tail (longer tails
//! score higher), content-confirmed match, pattern match, extension match
//! (longer extensions score higher). A processable type gets a +1 bonus
//! over a `skip_processing` type with an otherwise equal score.

use std::sync::Arc;

use topmark_fs::NormalizedPath;

use crate::filetype::FileType;

const FILENAME_SCORE: u32 = 10_000;
const CONTENT_SCORE: u32 = 5_000;
const PATTERN_SCORE: u32 = 2_000;
const EXTENSION_SCORE: u32 = 1_000;
const LENGTH_WEIGHT: u32 = 10;
const PROCESSABLE_BONUS: u32 = 1;

/// Name and content signals observed for one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSignals {
    /// Length of the longest matching extension.
    pub extension: Option<usize>,
    /// Length of the longest matching filename or tail.
    pub filename: Option<usize>,
    pub pattern: bool,
    /// `None` when the probe was not allowed to run.
    pub content: Option<bool>,
}

impl MatchSignals {
    pub fn any_name(&self) -> bool {
        self.extension.is_some() || self.filename.is_some() || self.pattern
    }
}

/// A scored candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
    pub name: String,
    pub score: u32,
    pub signals: MatchSignals,
}

/// Score one file type against `path`.
///
/// `allow_probe` is the policy switch for content probing; the type's
/// own [`crate::ContentGate`] decides whether the probe runs given the
/// name signals. Returns `None` when the type does not match.
pub fn score_file_type(
    file_type: &FileType,
    path: &NormalizedPath,
    allow_probe: bool,
) -> Option<MatchScore> {
    let basename = path.file_name()?;

    let extension = file_type
        .extensions
        .iter()
        .filter(|ext| basename.len() > ext.len() && basename.ends_with(ext.as_str()))
        .map(|ext| ext.len())
        .max();

    let filename = file_type
        .filenames
        .iter()
        .filter(|name| {
            if name.contains('/') {
                path.ends_with_tail(name)
            } else {
                basename == name.as_str()
            }
        })
        .map(|name| name.len())
        .max();

    let pattern = file_type.matches_pattern(basename);

    let gate = file_type.content_gate;
    let content = match &file_type.content_matcher {
        Some(matcher)
            if allow_probe && gate.permits(extension.is_some(), filename.is_some(), pattern) =>
        {
            Some(matcher(&path.to_native()))
        }
        _ => None,
    };

    let signals = MatchSignals {
        extension,
        filename,
        pattern,
        content,
    };

    let confirmed = content == Some(true);
    let included = if file_type.content_matcher.is_some() && gate.requires_confirmation() {
        filename.is_some() || confirmed
    } else {
        signals.any_name() || confirmed
    };
    if !included {
        return None;
    }

    let mut score = 0;
    if let Some(len) = filename {
        score = score.max(FILENAME_SCORE + LENGTH_WEIGHT * len as u32);
    }
    if confirmed {
        score = score.max(CONTENT_SCORE);
    }
    if pattern {
        score = score.max(PATTERN_SCORE);
    }
    if let Some(len) = extension {
        score = score.max(EXTENSION_SCORE + LENGTH_WEIGHT * len as u32);
    }
    if !file_type.skip_processing {
        score += PROCESSABLE_BONUS;
    }

    Some(MatchScore {
        name: file_type.name.clone(),
        score,
        signals,
    })
}

/// Pick the best-scoring candidate for `path`.
///
/// `allow_probe` is consulted per candidate so per-type policies can
/// disable content probing individually.
pub fn best_match<I, F>(
    candidates: I,
    path: &NormalizedPath,
    allow_probe: F,
) -> Option<(Arc<FileType>, MatchScore)>
where
    I: IntoIterator<Item = Arc<FileType>>,
    F: Fn(&FileType) -> bool,
{
    let mut best: Option<(Arc<FileType>, MatchScore)> = None;
    for candidate in candidates {
        let Some(scored) = score_file_type(&candidate, path, allow_probe(&candidate)) else {
            continue;
        };
        tracing::trace!(
            path = %path,
            file_type = %scored.name,
            score = scored.score,
            "Scored file type candidate"
        );
        let better = match &best {
            None => true,
            Some((_, current)) => {
                scored.score > current.score
                    || (scored.score == current.score && scored.name < current.name)
            }
        };
        if better {
            best = Some((candidate, scored));
        }
    }
    best
}
