//! Reader for normalized Zarr input stores.
//!
//! A store is expected to carry a 1-D `time` coordinate (`i64` seconds since
//! the Unix epoch) and any of the recognized climate variables as 3-D `f32`
//! arrays over `(time, y, x)` with NaN missing values and a `units`
//! attribute. Optional 1-D `y`/`x` arrays supply grid coordinates.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use zarrs::array::Array;
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

use hazard_common::{GridTimeSeries, HazardError, HazardResult, VariableKind};

/// Reader over one normalized input store.
pub struct DatasetReader {
    name: String,
    store: Arc<FilesystemStore>,
}

impl DatasetReader {
    /// Open a store directory.
    pub fn open(name: impl Into<String>, path: &Path) -> HazardResult<Self> {
        let store = FilesystemStore::new(path)
            .map_err(|e| HazardError::dataset_read(e.to_string()))?;
        Ok(Self {
            name: name.into(),
            store: Arc::new(store),
        })
    }

    /// Dataset identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read one variable as a grid time series; `Ok(None)` when the store
    /// does not carry it.
    pub fn read_variable(&self, kind: VariableKind) -> HazardResult<Option<GridTimeSeries>> {
        let array = match Array::open(self.store.clone(), &format!("/{}", kind.as_str())) {
            Ok(array) => array,
            Err(_) => return Ok(None),
        };

        let shape = array.shape().to_vec();
        if shape.len() != 3 {
            return Err(HazardError::dataset_read(format!(
                "{}: variable '{}' has {} dimensions, expected (time, y, x)",
                self.name,
                kind,
                shape.len()
            )));
        }

        let times = self.read_times()?;
        if times.len() != shape[0] as usize {
            return Err(HazardError::dataset_read(format!(
                "{}: time coordinate holds {} entries but '{}' has {} time steps",
                self.name,
                times.len(),
                kind,
                shape[0]
            )));
        }

        let y = self.read_coord("y", shape[1])?;
        let x = self.read_coord("x", shape[2])?;

        let units = array
            .attributes()
            .get("units")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let subset = ArraySubset::new_with_start_shape(vec![0, 0, 0], shape)
            .map_err(|e| HazardError::dataset_read(e.to_string()))?;
        let values: Vec<f32> = array
            .retrieve_array_subset_elements(&subset)
            .map_err(|e| HazardError::dataset_read(e.to_string()))?;

        GridTimeSeries::new(kind, units, times, y, x, values).map(Some)
    }

    /// Read the time coordinate; its absence makes the store unreadable.
    fn read_times(&self) -> HazardResult<Vec<DateTime<Utc>>> {
        let array = Array::open(self.store.clone(), "/time").map_err(|e| {
            HazardError::dataset_read(format!("{}: missing time coordinate: {}", self.name, e))
        })?;

        let shape = array.shape().to_vec();
        let subset = ArraySubset::new_with_start_shape(vec![0; shape.len()], shape)
            .map_err(|e| HazardError::dataset_read(e.to_string()))?;
        let seconds: Vec<i64> = array
            .retrieve_array_subset_elements(&subset)
            .map_err(|e| HazardError::dataset_read(e.to_string()))?;

        seconds
            .iter()
            .map(|&s| {
                DateTime::from_timestamp(s, 0).ok_or_else(|| {
                    HazardError::dataset_read(format!(
                        "{}: time value {} is out of range",
                        self.name, s
                    ))
                })
            })
            .collect()
    }

    /// Read a 1-D coordinate array, falling back to index coordinates when
    /// the store does not provide one.
    fn read_coord(&self, name: &str, len: u64) -> HazardResult<Vec<f64>> {
        let array = match Array::open(self.store.clone(), &format!("/{}", name)) {
            Ok(array) => array,
            Err(_) => return Ok((0..len).map(|i| i as f64).collect()),
        };

        let shape = array.shape().to_vec();
        let subset = ArraySubset::new_with_start_shape(vec![0; shape.len()], shape)
            .map_err(|e| HazardError::dataset_read(e.to_string()))?;
        let coords: Vec<f64> = array
            .retrieve_array_subset_elements(&subset)
            .map_err(|e| HazardError::dataset_read(e.to_string()))?;

        if coords.len() != len as usize {
            return Err(HazardError::dataset_read(format!(
                "{}: coordinate '{}' holds {} entries, expected {}",
                self.name,
                name,
                coords.len(),
                len
            )));
        }
        Ok(coords)
    }
}
