//! Shared fixtures for pipeline integration tests: writes normalized input
//! stores the way the (out-of-scope) archive normalizer would.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use zarrs::array::{ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

/// Write a normalized input store holding a `time` coordinate and one 3-D
/// variable. `values` is `[time, y, x]` row-major; NaN marks missing.
pub fn write_dataset(
    path: &Path,
    variable: &str,
    units: &str,
    times: &[DateTime<Utc>],
    ny: usize,
    nx: usize,
    values: &[f32],
) {
    assert_eq!(values.len(), times.len() * ny * nx, "fixture shape mismatch");
    std::fs::create_dir_all(path).unwrap();
    let store = Arc::new(FilesystemStore::new(path).unwrap());

    write_time(&store, times);

    let shape = vec![times.len() as u64, ny as u64, nx as u64];
    let chunk_grid: zarrs::array::ChunkGrid = shape.clone().try_into().unwrap();
    let mut attrs = serde_json::Map::new();
    attrs.insert("units".to_string(), serde_json::json!(units));

    let mut binding = ArrayBuilder::new(
        shape.clone(),
        DataType::Float32,
        chunk_grid,
        FillValue::from(f32::NAN),
    );
    let builder = binding.attributes(attrs);
    let array = builder
        .build(store.clone(), &format!("/{}", variable))
        .unwrap();
    array.store_metadata().unwrap();

    let subset = ArraySubset::new_with_start_shape(vec![0, 0, 0], shape).unwrap();
    array.store_array_subset_elements(&subset, values).unwrap();
}

/// Add a 1-D float64 coordinate array to an existing store.
pub fn write_coord(path: &Path, name: &str, coords: &[f64]) {
    let store = Arc::new(FilesystemStore::new(path).unwrap());
    let n = coords.len() as u64;

    let chunk_grid: zarrs::array::ChunkGrid = vec![n].try_into().unwrap();
    let binding = ArrayBuilder::new(
        vec![n],
        DataType::Float64,
        chunk_grid,
        FillValue::from(f64::NAN),
    );
    let array = binding.build(store, &format!("/{}", name)).unwrap();
    array.store_metadata().unwrap();

    let subset = ArraySubset::new_with_start_shape(vec![0], vec![n]).unwrap();
    array.store_array_subset_elements(&subset, coords).unwrap();
}

fn write_time(store: &Arc<FilesystemStore>, times: &[DateTime<Utc>]) {
    let seconds: Vec<i64> = times.iter().map(|t| t.timestamp()).collect();
    let n = seconds.len() as u64;

    let chunk_grid: zarrs::array::ChunkGrid = vec![n].try_into().unwrap();
    let binding = ArrayBuilder::new(vec![n], DataType::Int64, chunk_grid, FillValue::from(0i64));
    let array = binding.build(store.clone(), "/time").unwrap();
    array.store_metadata().unwrap();

    let subset = ArraySubset::new_with_start_shape(vec![0], vec![n]).unwrap();
    array.store_array_subset_elements(&subset, &seconds).unwrap();
}
