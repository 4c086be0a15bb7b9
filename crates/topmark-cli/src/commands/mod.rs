//! Command implementations for topmark-cli

pub mod filetypes;
pub mod process;

pub use filetypes::run_filetypes;
pub use process::{run_pipeline, run_probe};

/// Exit code when every file is fine.
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration errors and files that failed.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for a dry run that found files to change.
pub const EXIT_CHANGES: i32 = 2;
