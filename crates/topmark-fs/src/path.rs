//! Normalized path handling for cross-platform file-type matching

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// File-type rules (filename tails such as `.github/CODEOWNERS`) and
/// built-in header fields are always expressed with POSIX separators,
/// so every path is normalized once and converted back to the
/// platform-native form only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes, drops `.` components and
    /// collapses repeated separators. `..` components are kept verbatim.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        Self {
            inner: clean(&raw),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        if segment.starts_with('/') || self.inner.is_empty() || self.inner == "." {
            return Self::new(segment);
        }
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(0) => None,
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None if self.inner != "." && !self.inner.is_empty() => Some(Self {
                inner: ".".to_string(),
            }),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
    }

    /// Whether this path is absolute.
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/') || has_drive_prefix(&self.inner)
    }

    /// Check whether the path equals `tail` or ends with `/<tail>`.
    ///
    /// `tail` is matched on whole components, so `b/c` matches `a/b/c`
    /// but not `a/xb/c`.
    pub fn ends_with_tail(&self, tail: &str) -> bool {
        let tail = clean(&tail.replace('\\', "/"));
        if tail.is_empty() {
            return false;
        }
        self.inner == tail
            || self
                .inner
                .strip_suffix(tail.as_str())
                .is_some_and(|head| head.ends_with('/'))
    }

    /// Express this path relative to `base`.
    ///
    /// Both paths must be of the same kind (both absolute or both
    /// relative). Returns `None` when no relative form exists, e.g. for
    /// different drive prefixes.
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<Self> {
        if self.is_absolute() != base.is_absolute() {
            return None;
        }
        let ours: Vec<&str> = components(&self.inner).collect();
        let theirs: Vec<&str> = components(&base.inner).collect();
        if self.is_absolute() && ours.first() != theirs.first() && has_drive_prefix(&self.inner)
        {
            return None;
        }

        let common = ours
            .iter()
            .zip(theirs.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = Vec::new();
        parts.extend(std::iter::repeat_n("..", theirs.len() - common));
        parts.extend(&ours[common..]);

        if parts.is_empty() {
            return Some(Self {
                inner: ".".to_string(),
            });
        }
        Some(Self {
            inner: parts.join("/"),
        })
    }

    /// Resolve to an absolute, normalized path without requiring it to exist.
    ///
    /// Uses `dunce::canonicalize` when the path exists so Windows verbatim
    /// prefixes never leak into header fields; otherwise joins onto the
    /// current working directory.
    pub fn absolutize(&self) -> Self {
        let native = self.to_native();
        if let Ok(canonical) = dunce::canonicalize(&native) {
            return Self::new(canonical);
        }
        if self.is_absolute() {
            return self.clone();
        }
        match std::env::current_dir() {
            Ok(cwd) => Self::new(cwd).join(&self.inner),
            Err(_) => self.clone(),
        }
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|c| !c.is_empty() && *c != ".")
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn clean(raw: &str) -> String {
    let absolute = raw.starts_with('/');
    let parts: Vec<&str> = components(raw).collect();
    let body = parts.join("/");
    match (absolute, body.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{body}"),
        (false, true) if raw.is_empty() => String::new(),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl serde::Serialize for NormalizedPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslashes_become_forward_slashes() {
        assert_eq!(NormalizedPath::new("a\\b\\c.py").as_str(), "a/b/c.py");
    }

    #[test]
    fn test_dot_and_double_separators_collapse() {
        assert_eq!(NormalizedPath::new("./a//b/./c").as_str(), "a/b/c");
        assert_eq!(NormalizedPath::new("/").as_str(), "/");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(NormalizedPath::new("src/lib.rs").file_name(), Some("lib.rs"));
        assert_eq!(NormalizedPath::new("Makefile").file_name(), Some("Makefile"));
        assert_eq!(NormalizedPath::new("/").file_name(), None);
    }

    #[test]
    fn test_parent_of_bare_name_is_dot() {
        let parent = NormalizedPath::new("setup.py").parent().unwrap();
        assert_eq!(parent.as_str(), ".");
    }

    #[test]
    fn test_ends_with_tail_matches_whole_components() {
        let path = NormalizedPath::new("repo/.github/CODEOWNERS");
        assert!(path.ends_with_tail(".github/CODEOWNERS"));
        assert!(path.ends_with_tail("CODEOWNERS"));
        assert!(!path.ends_with_tail("github/CODEOWNERS"));
    }

    #[test]
    fn test_relative_to_sibling_directory() {
        let path = NormalizedPath::new("/work/proj/src/main.py");
        let base = NormalizedPath::new("/work/proj/docs");
        assert_eq!(path.relative_to(&base).unwrap().as_str(), "../src/main.py");
    }

    #[test]
    fn test_relative_to_itself_is_dot() {
        let path = NormalizedPath::new("/work/proj");
        assert_eq!(path.relative_to(&path).unwrap().as_str(), ".");
    }

    #[test]
    fn test_relative_to_rejects_mixed_kinds() {
        let path = NormalizedPath::new("src/main.py");
        let base = NormalizedPath::new("/work");
        assert!(path.relative_to(&base).is_none());
    }
}
