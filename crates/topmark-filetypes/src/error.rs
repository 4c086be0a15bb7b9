//! Error types for topmark-filetypes

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid pattern '{pattern}' for file type {file_type}: {source}")]
    InvalidPattern {
        file_type: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{kind} already registered: {name}")]
    AlreadyRegistered { kind: &'static str, name: String },

    #[error("{kind} not registered: {name}")]
    NotRegistered { kind: &'static str, name: String },
}
