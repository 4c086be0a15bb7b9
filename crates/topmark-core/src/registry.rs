//! Read-only lookup of file types and their processors

use std::sync::Arc;

use topmark_filetypes::{FileType, FileTypeRegistry};
use topmark_processors::{HeaderProcessor, ProcessorRegistry};

/// File types plus the processor bound to each of them.
#[derive(Debug, Default)]
pub struct Registry {
    pub file_types: FileTypeRegistry,
    pub processors: ProcessorRegistry,
}

impl Registry {
    pub fn new(file_types: FileTypeRegistry, processors: ProcessorRegistry) -> Self {
        Self {
            file_types,
            processors,
        }
    }

    /// The built-in catalogue with its built-in bindings.
    pub fn builtin() -> Self {
        Self::new(
            FileTypeRegistry::with_builtins(),
            ProcessorRegistry::with_builtins(),
        )
    }

    pub fn file_type(&self, name: &str) -> Option<Arc<FileType>> {
        self.file_types.get(name)
    }

    pub fn processor_for(&self, name: &str) -> Option<Arc<dyn HeaderProcessor>> {
        self.processors.get(name)
    }

    /// Whether headers can be managed for a file type: it is registered,
    /// not marked `skip_processing`, and has a processor.
    pub fn is_supported(&self, name: &str) -> bool {
        self.file_types
            .get(name)
            .is_some_and(|ft| !ft.skip_processing && self.processors.is_bound(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_types() {
        let registry = Registry::builtin();
        assert!(registry.is_supported("python"));
        assert!(registry.is_supported("xml"));
        assert!(!registry.is_supported("json"));
        assert!(!registry.is_supported("cobol"));
    }

    #[test]
    fn test_every_processable_builtin_has_a_processor() {
        let registry = Registry::builtin();
        for file_type in registry.file_types.entries() {
            if !file_type.skip_processing {
                assert!(
                    registry.processors.is_bound(&file_type.name),
                    "{} has no processor",
                    file_type.name
                );
            }
        }
    }
}
