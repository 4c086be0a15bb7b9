//! File-type name to processor bindings

use std::collections::BTreeMap;
use std::sync::Arc;

use topmark_filetypes::builtins::{
    CBLOCK_TYPES, DASH_TYPES, MARKDOWN_TYPES, PERCENT_TYPES, POUND_TYPES, SEMICOLON_TYPES,
    SLASH_TYPES, XML_TYPES,
};
use topmark_filetypes::{OverlayGuard, OverlayRegistry, Result};

use crate::handlers::{BlockCommentProcessor, LineCommentProcessor, MarkdownProcessor, XmlProcessor};
use crate::processor::HeaderProcessor;

/// Maps file-type names to their [`HeaderProcessor`].
///
/// One processor instance is shared by every file type in its family.
pub struct ProcessorRegistry {
    inner: OverlayRegistry<dyn HeaderProcessor>,
}

impl ProcessorRegistry {
    pub fn new(bindings: BTreeMap<String, Arc<dyn HeaderProcessor>>) -> Self {
        Self {
            inner: OverlayRegistry::new("processor", bindings),
        }
    }

    /// Registry with every built-in file type bound to its family processor.
    pub fn with_builtins() -> Self {
        let families: [(&[&str], Arc<dyn HeaderProcessor>); 8] = [
            (POUND_TYPES, Arc::new(LineCommentProcessor::pound())),
            (SLASH_TYPES, Arc::new(LineCommentProcessor::slash())),
            (DASH_TYPES, Arc::new(LineCommentProcessor::dash())),
            (SEMICOLON_TYPES, Arc::new(LineCommentProcessor::semicolon())),
            (PERCENT_TYPES, Arc::new(LineCommentProcessor::percent())),
            (CBLOCK_TYPES, Arc::new(BlockCommentProcessor::new())),
            (XML_TYPES, Arc::new(XmlProcessor::new())),
            (MARKDOWN_TYPES, Arc::new(MarkdownProcessor::new())),
        ];
        let mut bindings = BTreeMap::new();
        for (names, processor) in families {
            for name in names {
                bindings.insert((*name).to_string(), Arc::clone(&processor));
            }
        }
        Self::new(bindings)
    }

    /// The processor bound to a file-type name.
    pub fn get(&self, file_type: &str) -> Option<Arc<dyn HeaderProcessor>> {
        self.inner.get(file_type)
    }

    pub fn is_bound(&self, file_type: &str) -> bool {
        self.inner.contains(file_type)
    }

    /// Bound file-type names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.inner.names()
    }

    /// Bind a processor at runtime. Dropping the guard removes the binding.
    pub fn bind(
        &self,
        file_type: impl Into<String>,
        processor: Arc<dyn HeaderProcessor>,
    ) -> Result<OverlayGuard<'_, dyn HeaderProcessor>> {
        self.inner.register(file_type, processor)
    }

    /// Hide a binding. Dropping the guard restores it.
    pub fn unbind(&self, file_type: &str) -> Result<OverlayGuard<'_, dyn HeaderProcessor>> {
        self.inner.unregister(file_type)
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("bindings", &self.names())
            .finish()
    }
}
