//! Shared test utilities for the climate hazard workspace.
//!
//! Provides deterministic synthetic [`hazard_common::GridTimeSeries`]
//! builders used across the crate test suites.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod generators;

pub use generators::*;
