//! Climate indicator calculator.
//!
//! Computes per-grid-cell threshold-exceedance counts and distributional
//! percentiles from normalized gridded series, writing one map artifact per
//! indicator. Indicators are memoized by artifact name: an existing artifact
//! is a cache hit and is never recomputed unless overwrite is requested.

pub mod calculator;
pub mod exceedance;
pub mod quantile;
pub mod spec;

pub use calculator::{CalculatorReport, IndicatorCalculator};
pub use exceedance::mean_annual_days_above;
pub use quantile::empirical_quantile;
pub use spec::{precipitation_specs, temperature_specs, IndicatorKind, IndicatorSpec};
