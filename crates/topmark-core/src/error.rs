//! Error types for topmark-core
//!
//! Only configuration handling returns errors. Pipeline steps record
//! failures on the processing context instead.

/// Result type for topmark-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in topmark-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `add_only` and `update_only` were both enabled
    #[error("Conflicting policy for {scope}: add_only and update_only cannot both be enabled")]
    PolicyConflict { scope: String },

    /// A header field name that is not a valid field key
    #[error("Invalid header field name: {name:?}")]
    InvalidFieldName { name: String },

    /// Filesystem error from topmark-fs
    #[error(transparent)]
    Fs(#[from] topmark_fs::Error),

    /// Registry error from topmark-filetypes
    #[error(transparent)]
    FileTypes(#[from] topmark_filetypes::Error),
}
