//! Shared test utilities for the topmark workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`dir`]: [`TestDir`] builder for source trees on disk

pub mod dir;

pub use dir::TestDir;
