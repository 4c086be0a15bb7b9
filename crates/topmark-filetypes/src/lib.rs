//! File-type descriptors, matching and registries for topmark.
//!
//! A [`FileType`] describes how a path is recognized (extensions, literal
//! filenames or path tails, regex patterns, and an optional gated content
//! probe) and which header placement rules apply to it. Types are
//! registered once into a [`FileTypeRegistry`]; runtime additions and
//! removals go through a lock-guarded overlay that never mutates the base
//! set.

pub mod builtins;
pub mod error;
pub mod filetype;
pub mod matcher;
pub mod overlay;
pub mod probes;
pub mod registry;

pub use error::{Error, Result};
pub use filetype::{
    ContentGate, ContentMatcher, FileType, HeaderPolicy, InsertCapability, PreInsertChecker,
    PreInsertInput,
};
pub use matcher::{MatchScore, MatchSignals, best_match, score_file_type};
pub use overlay::{OverlayGuard, OverlayRegistry};
pub use registry::FileTypeRegistry;
