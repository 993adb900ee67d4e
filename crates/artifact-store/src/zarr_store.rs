//! Filesystem-backed artifact store using Zarr V3 arrays.
//!
//! Each artifact occupies one `<name>.zarr` directory under the store root.
//! Every layer is written as a 2-D float32 array with a NaN fill value and
//! `units`/`description` attributes; the grid coordinates are stored as 1-D
//! float64 arrays so the artifact is self-describing on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use zarrs::array::{Array, ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

use hazard_common::{HazardError, HazardResult};

use crate::artifact::Artifact;
use crate::sink::ArtifactSink;

/// Artifact store rooted at an output directory.
pub struct ZarrArtifactStore {
    root: PathBuf,
}

impl ZarrArtifactStore {
    /// Open a store, creating the root directory if needed.
    pub fn create(root: impl Into<PathBuf>) -> HazardResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk location for a named artifact.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.zarr", name))
    }

    /// Read one layer of a persisted artifact back as a flat map.
    pub fn read_layer(&self, name: &str, layer: &str) -> HazardResult<Vec<f32>> {
        let array = self.open_layer(name, layer)?;
        let shape = array.shape().to_vec();
        let subset = ArraySubset::new_with_start_shape(vec![0; shape.len()], shape)
            .map_err(|e| HazardError::storage(e.to_string()))?;
        let data: Vec<f32> = array
            .retrieve_array_subset_elements(&subset)
            .map_err(|e| HazardError::storage(e.to_string()))?;
        Ok(data)
    }

    /// Attributes attached to one layer of a persisted artifact.
    pub fn layer_attributes(
        &self,
        name: &str,
        layer: &str,
    ) -> HazardResult<serde_json::Map<String, serde_json::Value>> {
        let array = self.open_layer(name, layer)?;
        Ok(array.attributes().clone())
    }

    fn open_layer(&self, name: &str, layer: &str) -> HazardResult<Array<FilesystemStore>> {
        let store = FilesystemStore::new(self.artifact_path(name))
            .map_err(|e| HazardError::storage(e.to_string()))?;
        Array::open(Arc::new(store), &format!("/{}", layer))
            .map_err(|e| HazardError::storage(e.to_string()))
    }

    fn write_map_layer(
        &self,
        store: &Arc<FilesystemStore>,
        artifact: &Artifact,
        layer_name: &str,
        units: &str,
        data: &[f32],
    ) -> HazardResult<()> {
        let ny = artifact.ny() as u64;
        let nx = artifact.nx() as u64;

        let mut attrs = serde_json::Map::new();
        attrs.insert("artifact".to_string(), serde_json::json!(artifact.name()));
        attrs.insert("units".to_string(), serde_json::json!(units));
        attrs.insert(
            "description".to_string(),
            serde_json::json!(artifact.description()),
        );

        let chunk_grid: zarrs::array::ChunkGrid = vec![ny, nx]
            .try_into()
            .map_err(|e| HazardError::storage(format!("{:?}", e)))?;

        let mut binding = ArrayBuilder::new(
            vec![ny, nx], // shape [rows, cols]
            DataType::Float32,
            chunk_grid,
            FillValue::from(f32::NAN),
        );
        let builder = binding.attributes(attrs);
        let array = builder
            .build(store.clone(), &format!("/{}", layer_name))
            .map_err(|e| HazardError::storage(e.to_string()))?;

        array
            .store_metadata()
            .map_err(|e| HazardError::storage(e.to_string()))?;

        let subset = ArraySubset::new_with_start_shape(vec![0, 0], vec![ny, nx])
            .map_err(|e| HazardError::storage(e.to_string()))?;
        array
            .store_array_subset_elements(&subset, data)
            .map_err(|e| HazardError::storage(e.to_string()))?;

        Ok(())
    }

    fn write_coord_layer(
        &self,
        store: &Arc<FilesystemStore>,
        layer_name: &str,
        coords: &[f64],
    ) -> HazardResult<()> {
        let n = coords.len() as u64;

        let chunk_grid: zarrs::array::ChunkGrid = vec![n]
            .try_into()
            .map_err(|e| HazardError::storage(format!("{:?}", e)))?;

        let binding = ArrayBuilder::new(
            vec![n],
            DataType::Float64,
            chunk_grid,
            FillValue::from(f64::NAN),
        );
        let array = binding
            .build(store.clone(), &format!("/{}", layer_name))
            .map_err(|e| HazardError::storage(e.to_string()))?;

        array
            .store_metadata()
            .map_err(|e| HazardError::storage(e.to_string()))?;

        let subset = ArraySubset::new_with_start_shape(vec![0], vec![n])
            .map_err(|e| HazardError::storage(e.to_string()))?;
        array
            .store_array_subset_elements(&subset, coords)
            .map_err(|e| HazardError::storage(e.to_string()))?;

        Ok(())
    }
}

impl ArtifactSink for ZarrArtifactStore {
    fn exists(&self, name: &str) -> HazardResult<bool> {
        Ok(self.artifact_path(name).is_dir())
    }

    fn write(&self, artifact: &Artifact, overwrite: bool) -> HazardResult<()> {
        let path = self.artifact_path(artifact.name());

        if path.exists() {
            if !overwrite {
                return Err(HazardError::ArtifactExists(artifact.name().to_string()));
            }
            std::fs::remove_dir_all(&path)?;
        }

        // create_dir (not create_dir_all) gives create-if-absent semantics:
        // a second writer racing on the same name fails here instead of
        // clobbering the first writer's output.
        if let Err(e) = std::fs::create_dir(&path) {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                return Err(HazardError::ArtifactExists(artifact.name().to_string()));
            }
            return Err(e.into());
        }

        let store = Arc::new(
            FilesystemStore::new(&path).map_err(|e| HazardError::storage(e.to_string()))?,
        );

        self.write_coord_layer(&store, "y", artifact.y())?;
        self.write_coord_layer(&store, "x", artifact.x())?;

        for layer in artifact.layers() {
            self.write_map_layer(&store, artifact, &layer.name, &layer.units, &layer.data)?;
        }

        debug!(
            artifact = %artifact.name(),
            layers = artifact.layers().len(),
            path = %path.display(),
            "wrote artifact"
        );

        Ok(())
    }
}
