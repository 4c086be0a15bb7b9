//! Name-keyed registry with a runtime overlay
//!
//! The base set is fixed at construction. Runtime registrations and
//! removals live in a separate overlay behind an `RwLock`, so lookups
//! are concurrent and writes are serialized. Every overlay mutation
//! returns an [`OverlayGuard`] that undoes it on drop.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};

struct Overlay<T: ?Sized> {
    added: BTreeMap<String, Arc<T>>,
    hidden: BTreeSet<String>,
}

impl<T: ?Sized> Default for Overlay<T> {
    fn default() -> Self {
        Self {
            added: BTreeMap::new(),
            hidden: BTreeSet::new(),
        }
    }
}

/// A read-mostly registry of named entries.
pub struct OverlayRegistry<T: ?Sized> {
    kind: &'static str,
    base: BTreeMap<String, Arc<T>>,
    overlay: RwLock<Overlay<T>>,
}

impl<T: ?Sized> OverlayRegistry<T> {
    /// Create a registry over a fixed base set. `kind` names the entries
    /// in error messages ("file type", "processor").
    pub fn new(kind: &'static str, base: BTreeMap<String, Arc<T>>) -> Self {
        Self {
            kind,
            base,
            overlay: RwLock::new(Overlay::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Overlay<T>> {
        self.overlay.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Overlay<T>> {
        self.overlay.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up an entry, overlay first.
    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        let overlay = self.read();
        if let Some(entry) = overlay.added.get(name) {
            return Some(Arc::clone(entry));
        }
        if overlay.hidden.contains(name) {
            return None;
        }
        self.base.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All visible entries, sorted by name.
    pub fn entries(&self) -> Vec<(String, Arc<T>)> {
        let overlay = self.read();
        let mut merged: BTreeMap<String, Arc<T>> = self
            .base
            .iter()
            .filter(|(name, _)| !overlay.hidden.contains(*name))
            .map(|(name, entry)| (name.clone(), Arc::clone(entry)))
            .collect();
        for (name, entry) in &overlay.added {
            merged.insert(name.clone(), Arc::clone(entry));
        }
        merged.into_iter().collect()
    }

    /// Visible entry names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.entries().into_iter().map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add an entry to the overlay.
    ///
    /// Fails if an entry with the same name is currently visible.
    pub fn register(&self, name: impl Into<String>, entry: Arc<T>) -> Result<OverlayGuard<'_, T>> {
        let name = name.into();
        let mut overlay = self.write();
        let visible = overlay.added.contains_key(&name)
            || (self.base.contains_key(&name) && !overlay.hidden.contains(&name));
        if visible {
            return Err(Error::AlreadyRegistered {
                kind: self.kind,
                name,
            });
        }
        overlay.added.insert(name.clone(), entry);
        tracing::debug!(kind = self.kind, name = %name, "Registered overlay entry");
        Ok(OverlayGuard {
            registry: self,
            name,
            undo: Undo::RemoveAdded,
        })
    }

    /// Hide an entry: overlay additions are removed, base entries masked.
    pub fn unregister(&self, name: &str) -> Result<OverlayGuard<'_, T>> {
        let mut overlay = self.write();
        let undo = if let Some(previous) = overlay.added.remove(name) {
            Undo::RestoreAdded(previous)
        } else if self.base.contains_key(name) && overlay.hidden.insert(name.to_string()) {
            Undo::Unhide
        } else {
            return Err(Error::NotRegistered {
                kind: self.kind,
                name: name.to_string(),
            });
        };
        tracing::debug!(kind = self.kind, name, "Unregistered entry");
        Ok(OverlayGuard {
            registry: self,
            name: name.to_string(),
            undo,
        })
    }
}

enum Undo<T: ?Sized> {
    RemoveAdded,
    RestoreAdded(Arc<T>),
    Unhide,
    Keep,
}

/// Handle for an overlay mutation; dropping it reverts the mutation.
#[must_use = "dropping the guard immediately reverts the registration"]
pub struct OverlayGuard<'a, T: ?Sized> {
    registry: &'a OverlayRegistry<T>,
    name: String,
    undo: Undo<T>,
}

impl<T: ?Sized> OverlayGuard<'_, T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keep the mutation for the registry's lifetime.
    pub fn persist(mut self) {
        self.undo = Undo::Keep;
    }
}

impl<T: ?Sized> Drop for OverlayGuard<'_, T> {
    fn drop(&mut self) {
        let undo = std::mem::replace(&mut self.undo, Undo::Keep);
        let mut overlay = self.registry.write();
        match undo {
            Undo::RemoveAdded => {
                overlay.added.remove(&self.name);
            }
            Undo::RestoreAdded(entry) => {
                overlay.added.insert(self.name.clone(), entry);
            }
            Undo::Unhide => {
                overlay.hidden.remove(&self.name);
            }
            Undo::Keep => {}
        }
    }
}
