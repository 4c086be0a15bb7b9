//! Input path expansion

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{CliError, Result};

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Expand files and directories into a sorted, de-duplicated file list.
///
/// Explicit file arguments are kept even when they do not exist, so the
/// pipeline can report them. Directories are walked recursively.
pub fn collect(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));
        for entry in walker {
            let entry = entry.map_err(|e| CliError::user(format!("cannot walk {}: {e}", path.display())))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    tracing::debug!(count = files.len(), "Collected input files");
    Ok(files)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_str().is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Display form of `path`, relative to the current directory when possible.
pub fn display(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    relative.unwrap_or_else(|| path.to_path_buf()).display().to_string()
}
