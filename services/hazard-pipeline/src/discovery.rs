//! Input dataset discovery.

use std::path::{Path, PathBuf};

use hazard_common::HazardResult;

/// A discovered input dataset: identifier plus on-disk location.
#[derive(Debug, Clone)]
pub struct DatasetEntry {
    /// Store name without the `.zarr` suffix.
    pub name: String,
    /// Full path of the store directory.
    pub path: PathBuf,
}

/// Enumerate the `*.zarr` stores directly under `dir`, sorted by name so
/// batch runs visit datasets in a stable order.
pub fn discover_datasets(dir: &Path) -> HazardResult<Vec<DatasetEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_store = path.is_dir() && path.extension().map(|e| e == "zarr").unwrap_or(false);
        if !is_store {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        entries.push(DatasetEntry { name, path });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
