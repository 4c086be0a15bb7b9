//! Whole-file reads and locked writes

use std::fs::{self, OpenOptions};
use std::io::Write;

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::{Error, NormalizedPath, Result};

/// How a planned file image is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Write to a sibling temp file, then rename over the target.
    #[default]
    Atomic,
    /// Truncate and rewrite the target file under an exclusive lock.
    InPlace,
    /// Emit the image on standard output; the file is left untouched.
    Stdout,
}

/// Read the full byte content of a file.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Persist `content` to `path` using the given mode.
pub fn write_with_mode(path: &NormalizedPath, content: &[u8], mode: WriteMode) -> Result<()> {
    match mode {
        WriteMode::Atomic => write_atomic(path, content),
        WriteMode::InPlace => write_in_place(path, content),
        WriteMode::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|_| stdout.flush())
                .map_err(|e| Error::io("<stdout>", e))
        }
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial
/// file. The original file's permissions are carried over to the
/// replacement.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    // Temp file lives in the same directory so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.topmark.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

    let written = temp_file
        .write_all(content)
        .and_then(|_| temp_file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&temp_path, e));
    }

    if let Ok(metadata) = fs::metadata(&native_path) {
        if let Err(e) = fs::set_permissions(&temp_path, metadata.permissions()) {
            tracing::warn!(path = %path, error = %e, "Could not carry over file permissions");
        }
    }

    FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(&native_path, e)
    })?;

    tracing::debug!(path = %path, bytes = content.len(), "Wrote file atomically");
    Ok(())
}

/// Rewrite an existing file in place under an exclusive advisory lock.
pub fn write_in_place(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    let mut file = OpenOptions::new()
        .write(true)
        .open(&native_path)
        .map_err(|e| Error::io(&native_path, e))?;

    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    file.set_len(0)
        .and_then(|_| file.write_all(content))
        .and_then(|_| file.sync_all())
        .map_err(|e| Error::io(&native_path, e))?;

    FileExt::unlock(&file).map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    tracing::debug!(path = %path, bytes = content.len(), "Wrote file in place");
    Ok(())
}
