//! Filesystem and text-image primitives for topmark
//!
//! Provides POSIX-normalized path handling, newline-style detection,
//! newline-preserving line splitting, and safe whole-file I/O.

pub mod config;
pub mod error;
pub mod io;
pub mod newline;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use error::{Error, Result};
pub use io::WriteMode;
pub use newline::{NewlineCounter, NewlineHistogram, NewlineStyle, split_lines_keepends};
pub use path::NormalizedPath;
