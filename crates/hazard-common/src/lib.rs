//! Common types shared across the climate hazard pipeline crates.

pub mod error;
pub mod reduce;
pub mod series;

pub use error::{HazardError, HazardResult};
pub use reduce::{annual_max, daily_max, AnnualSeries, DailySeries, ReducedSeries};
pub use series::{GridTimeSeries, VariableKind};
