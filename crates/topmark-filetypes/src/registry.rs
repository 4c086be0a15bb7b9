//! Registry of file types
//!
//! Wraps an [`OverlayRegistry`] seeded with the built-in catalogue and
//! adds path resolution on top.

use std::collections::BTreeMap;
use std::sync::Arc;

use topmark_fs::NormalizedPath;

use crate::builtins::builtin_file_types;
use crate::error::Result;
use crate::filetype::FileType;
use crate::matcher::{MatchScore, best_match, score_file_type};
use crate::overlay::{OverlayGuard, OverlayRegistry};

/// Name-keyed set of [`FileType`]s.
pub struct FileTypeRegistry {
    inner: OverlayRegistry<FileType>,
}

impl FileTypeRegistry {
    /// Build a registry whose base set is `types`.
    ///
    /// Later entries with a duplicate name replace earlier ones.
    pub fn new(types: impl IntoIterator<Item = FileType>) -> Self {
        let base: BTreeMap<String, Arc<FileType>> = types
            .into_iter()
            .map(|ft| (ft.name.clone(), Arc::new(ft)))
            .collect();
        Self {
            inner: OverlayRegistry::new("file type", base),
        }
    }

    /// Registry seeded with the built-in catalogue.
    pub fn with_builtins() -> Self {
        Self::new(builtin_file_types())
    }

    pub fn get(&self, name: &str) -> Option<Arc<FileType>> {
        self.inner.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    /// Visible file types, sorted by name.
    pub fn entries(&self) -> Vec<Arc<FileType>> {
        self.inner.entries().into_iter().map(|(_, ft)| ft).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.inner.names()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Register a file type in the overlay. Dropping the guard removes it.
    pub fn register(&self, file_type: FileType) -> Result<OverlayGuard<'_, FileType>> {
        let name = file_type.name.clone();
        self.inner.register(name, Arc::new(file_type))
    }

    /// Hide a file type. Dropping the guard restores it.
    pub fn unregister(&self, name: &str) -> Result<OverlayGuard<'_, FileType>> {
        self.inner.unregister(name)
    }

    /// Resolve the best file type for `path`.
    pub fn resolve<F>(&self, path: &NormalizedPath, allow_probe: F) -> Option<(Arc<FileType>, MatchScore)>
    where
        F: Fn(&FileType) -> bool,
    {
        best_match(self.entries(), path, allow_probe)
    }

    /// Every matching candidate for `path`, best first.
    pub fn candidates<F>(&self, path: &NormalizedPath, allow_probe: F) -> Vec<MatchScore>
    where
        F: Fn(&FileType) -> bool,
    {
        let mut scored: Vec<MatchScore> = self
            .entries()
            .iter()
            .filter_map(|ft| score_file_type(ft, path, allow_probe(ft)))
            .collect();
        scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        scored
    }
}

impl Default for FileTypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for FileTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTypeRegistry")
            .field("file_types", &self.names())
            .finish()
    }
}
