//! [`TestDir`] builder for header-processing test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary source tree with helpers for writing inputs and asserting
/// on outputs.
///
/// # Example
///
/// ```rust,no_run
/// use topmark_test_utils::TestDir;
///
/// let dir = TestDir::new();
/// let path = dir.write("src/app.py", "print('hi')\n");
/// dir.assert_file_starts_with("src/app.py", "# topmark:header:start");
/// # let _ = path;
/// ```
pub struct TestDir {
    temp_dir: TempDir,
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDir {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` under the root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a `topmark.toml` at the root and return its path.
    pub fn write_config(&self, toml: &str) -> PathBuf {
        self.write("topmark.toml", toml)
    }

    /// Raw bytes of `rel`.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_bytes(&self, rel: &str) -> Vec<u8> {
        let path = self.path(rel);
        fs::read(&path).unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// UTF-8 content of `rel`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or is not UTF-8.
    pub fn read(&self, rel: &str) -> String {
        String::from_utf8(self.read_bytes(rel)).unwrap()
    }

    /// Assert that the file at `rel` starts with `prefix`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not start with `prefix`.
    pub fn assert_file_starts_with(&self, rel: &str, prefix: &str) {
        let content = self.read(rel);
        assert!(
            content.starts_with(prefix),
            "File {} does not start with {:?}. Content:\n{}",
            rel,
            prefix,
            content
        );
    }

    /// Assert that the file at `rel` contains exactly `expected`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or differs.
    pub fn assert_file_eq(&self, rel: &str, expected: &str) {
        let content = self.read(rel);
        assert_eq!(content, expected, "File {} has unexpected content", rel);
    }
}
