//! Extreme-value estimation for gridded annual maxima.
//!
//! Fits a two-parameter Gumbel distribution to each grid cell's annual
//! maxima and derives return-level maps for a configured set of return
//! periods, bundled into a single multi-layer artifact.

pub mod estimator;
pub mod gumbel;

pub use estimator::{EstimatorOutcome, ExtremeValueEstimator, RETURN_LEVEL_ARTIFACT};
pub use gumbel::{fit_gumbel, GumbelParams};
