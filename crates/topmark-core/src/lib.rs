//! Per-file header processing for topmark
//!
//! This crate turns one source file into one classified result. It is
//! built from:
//!
//! - **Configuration**: a [`MutableConfig`] built from TOML or flags and
//!   frozen once into an immutable [`Config`]
//! - **Processing context**: the per-file [`ProcessingContext`] with its
//!   eleven-axis [`ProcessingStatus`], [`Views`], diagnostics and hints
//! - **Steps**: resolver, sniffer, reader, scanner, builder, renderer,
//!   stripper, comparer, planner, patcher and writer
//! - **Runner and pipelines**: ordered step lists ([`Pipeline::Probe`],
//!   [`Pipeline::Check`], [`Pipeline::Strip`]) executed by a [`Runner`]
//!
//! # Architecture
//!
//! ```text
//!                    topmark-cli
//!                        |
//!                  topmark-core
//!                        |
//!        +---------------+----------------+
//!        |               |                |
//!   topmark-fs   topmark-filetypes  topmark-processors
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use topmark_core::{MutableConfig, Outcome, Pipeline, Registry};
//!
//! fn example() -> topmark_core::Result<()> {
//!     let config = Arc::new(MutableConfig::default().freeze()?);
//!     let runner = Pipeline::Check.runner(Arc::new(Registry::builtin()));
//!     let ctx = runner.process("src/main.py", config);
//!     if Outcome::classify(&ctx).is_change() {
//!         println!("{} needs a header", ctx.path());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod hints;
pub mod outcome;
pub mod pipelines;
pub mod registry;
pub mod runner;
pub mod status;
pub mod steps;
pub mod views;

pub use config::{Config, HeaderFormat, MutableConfig, MutablePolicy, Policy, PolicyRegistry};
pub use context::{FileFacts, HaltState, HintContext, ProcessingContext, StepContext};
pub use diagnostics::{Diagnostic, DiagnosticLevel, DiagnosticLog};
pub use error::{Error, Result};
pub use hints::{Hint, HintLog};
pub use outcome::{FileReport, Outcome};
pub use pipelines::Pipeline;
pub use registry::Registry;
pub use runner::Runner;
pub use status::{Axis, AxisUpdate, ProcessingStatus};
pub use steps::Step;
pub use views::{Image, Releasable, Views};
