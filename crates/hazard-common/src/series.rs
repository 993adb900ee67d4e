//! Gridded time-series data model for climate reanalysis variables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HazardError, HazardResult};

/// Physical variable carried by a gridded series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// Near-surface air temperature (degrees Celsius).
    Temperature,
    /// Daily precipitation (millimeters per day).
    Precipitation,
}

impl VariableKind {
    /// Variable name as it appears in input datasets.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Precipitation => "precipitation",
        }
    }

    /// Parse from a dataset variable name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "temperature" => Some(Self::Temperature),
            "precipitation" => Some(Self::Precipitation),
            _ => None,
        }
    }

    /// All variable kinds the pipeline recognizes.
    pub fn all() -> [Self; 2] {
        [Self::Temperature, Self::Precipitation]
    }
}

impl std::fmt::Display for VariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A 3-D gridded time series addressed by (time, y, x).
///
/// Values are stored row-major as `[time, y, x]`. Missing observations are
/// held as non-finite floats internally but are only ever observed through
/// the `Option`-returning accessors, so no sentinel can leak into a
/// downstream reduction. A series is never mutated after construction;
/// reductions produce new series.
#[derive(Debug, Clone)]
pub struct GridTimeSeries {
    kind: VariableKind,
    units: String,
    times: Vec<DateTime<Utc>>,
    y: Vec<f64>,
    x: Vec<f64>,
    values: Vec<f32>,
}

impl GridTimeSeries {
    /// Create a new series, validating shape consistency.
    pub fn new(
        kind: VariableKind,
        units: impl Into<String>,
        times: Vec<DateTime<Utc>>,
        y: Vec<f64>,
        x: Vec<f64>,
        values: Vec<f32>,
    ) -> HazardResult<Self> {
        if times.is_empty() {
            return Err(HazardError::invalid_series("time axis is empty"));
        }
        if y.is_empty() || x.is_empty() {
            return Err(HazardError::invalid_series("spatial axes must be non-empty"));
        }
        let expected = times.len() * y.len() * x.len();
        if values.len() != expected {
            return Err(HazardError::invalid_series(format!(
                "value buffer holds {} elements, expected {} ({} times x {} rows x {} cols)",
                values.len(),
                expected,
                times.len(),
                y.len(),
                x.len()
            )));
        }
        Ok(Self {
            kind,
            units: units.into(),
            times,
            y,
            x,
            values,
        })
    }

    /// Variable kind tag.
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// Physical unit string attached by the normalizer.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Ordered time coordinate.
    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    /// Ordered y coordinate values.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Ordered x coordinate values.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Number of time steps.
    pub fn n_times(&self) -> usize {
        self.times.len()
    }

    /// Number of grid rows.
    pub fn ny(&self) -> usize {
        self.y.len()
    }

    /// Number of grid columns.
    pub fn nx(&self) -> usize {
        self.x.len()
    }

    /// Number of grid cells per time step.
    pub fn n_cells(&self) -> usize {
        self.ny() * self.nx()
    }

    /// Value at (time, row, col), or `None` if out of range or missing.
    pub fn get(&self, t: usize, row: usize, col: usize) -> Option<f32> {
        if row >= self.ny() || col >= self.nx() {
            return None;
        }
        self.value_at(t, row * self.nx() + col)
    }

    /// Value at (time, flat cell index), or `None` if out of range or missing.
    pub fn value_at(&self, t: usize, cell: usize) -> Option<f32> {
        if t >= self.n_times() || cell >= self.n_cells() {
            return None;
        }
        let v = self.values[t * self.n_cells() + cell];
        v.is_finite().then_some(v)
    }

    /// Finite values observed for one cell, in time order.
    pub fn cell_values(&self, cell: usize) -> Vec<f32> {
        (0..self.n_times())
            .filter_map(|t| self.value_at(t, cell))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn times(n: usize) -> Vec<DateTime<Utc>> {
        (0..n)
            .map(|d| Utc.with_ymd_and_hms(1990, 1, 1 + d as u32, 12, 0, 0).unwrap())
            .collect()
    }

    #[test]
    fn test_shape_validation() {
        let result = GridTimeSeries::new(
            VariableKind::Temperature,
            "degC",
            times(2),
            vec![0.0, 1.0],
            vec![0.0],
            vec![1.0; 3], // should be 2*2*1 = 4
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_time_axis_rejected() {
        let result = GridTimeSeries::new(
            VariableKind::Precipitation,
            "mm/day",
            vec![],
            vec![0.0],
            vec![0.0],
            vec![],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_values_masked() {
        let series = GridTimeSeries::new(
            VariableKind::Temperature,
            "degC",
            times(2),
            vec![0.0],
            vec![0.0, 1.0],
            vec![10.0, f32::NAN, f32::NAN, 12.0],
        )
        .unwrap();

        assert_eq!(series.get(0, 0, 0), Some(10.0));
        assert_eq!(series.get(0, 0, 1), None);
        assert_eq!(series.get(1, 0, 0), None);
        assert_eq!(series.get(1, 0, 1), Some(12.0));
        // Out of range is None, not a panic
        assert_eq!(series.get(2, 0, 0), None);
        assert_eq!(series.get(0, 1, 0), None);
    }

    #[test]
    fn test_cell_values_drops_missing() {
        let series = GridTimeSeries::new(
            VariableKind::Precipitation,
            "mm/day",
            times(3),
            vec![0.0],
            vec![0.0],
            vec![1.0, f32::NAN, 3.0],
        )
        .unwrap();

        assert_eq!(series.cell_values(0), vec![1.0, 3.0]);
    }

    #[test]
    fn test_variable_kind_names() {
        assert_eq!(VariableKind::Temperature.as_str(), "temperature");
        assert_eq!(
            VariableKind::from_name("precipitation"),
            Some(VariableKind::Precipitation)
        );
        assert_eq!(VariableKind::from_name("wind"), None);
    }
}
