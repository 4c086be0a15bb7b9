//! Error types for topmark-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that abort a CLI invocation. Per-file problems are reported,
/// not raised.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from topmark-core
    #[error(transparent)]
    Core(#[from] topmark_core::Error),

    /// Error from topmark-fs
    #[error(transparent)]
    Fs(#[from] topmark_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON report serialization
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
