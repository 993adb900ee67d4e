//! Artifact data model.

use hazard_common::{HazardError, HazardResult};

/// One named 2-D map inside an artifact.
#[derive(Debug, Clone)]
pub struct ArtifactLayer {
    /// Layer name; doubles as the array name on disk.
    pub name: String,
    /// Physical units of the map values (empty for dimensionless counts).
    pub units: String,
    /// Map values in row-major (y, x) order; NaN marks a missing cell.
    pub data: Vec<f32>,
}

impl ArtifactLayer {
    /// Create a new layer.
    pub fn new(name: impl Into<String>, units: impl Into<String>, data: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            data,
        }
    }
}

/// A named, self-describing bundle of map layers.
///
/// Most artifacts carry a single layer named after the artifact; return-level
/// artifacts bundle one layer per return period under one name.
#[derive(Debug, Clone)]
pub struct Artifact {
    name: String,
    description: String,
    y: Vec<f64>,
    x: Vec<f64>,
    layers: Vec<ArtifactLayer>,
}

impl Artifact {
    /// Create a single-layer artifact whose layer shares the artifact name.
    pub fn single(
        name: impl Into<String>,
        description: impl Into<String>,
        y: Vec<f64>,
        x: Vec<f64>,
        units: impl Into<String>,
        data: Vec<f32>,
    ) -> HazardResult<Self> {
        let name = name.into();
        let layer = ArtifactLayer::new(name.clone(), units, data);
        Self::bundle(name, description, y, x, vec![layer])
    }

    /// Create a multi-layer artifact, validating every layer's shape.
    pub fn bundle(
        name: impl Into<String>,
        description: impl Into<String>,
        y: Vec<f64>,
        x: Vec<f64>,
        layers: Vec<ArtifactLayer>,
    ) -> HazardResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(HazardError::storage("artifact name must be non-empty"));
        }
        if layers.is_empty() {
            return Err(HazardError::storage(format!(
                "artifact '{}' has no layers",
                name
            )));
        }
        let n_cells = y.len() * x.len();
        for layer in &layers {
            if layer.data.len() != n_cells {
                return Err(HazardError::storage(format!(
                    "layer '{}' of artifact '{}' holds {} values, expected {}",
                    layer.name,
                    name,
                    layer.data.len(),
                    n_cells
                )));
            }
        }
        Ok(Self {
            name,
            description: description.into(),
            y,
            x,
            layers,
        })
    }

    /// Artifact name; the memoization key on the sink.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description of the statistic.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Ordered y coordinate values.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Ordered x coordinate values.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Number of grid rows.
    pub fn ny(&self) -> usize {
        self.y.len()
    }

    /// Number of grid columns.
    pub fn nx(&self) -> usize {
        self.x.len()
    }

    /// Map layers in write order.
    pub fn layers(&self) -> &[ArtifactLayer] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_layer_shares_name() {
        let artifact = Artifact::single(
            "days-above-30",
            "mean annual days above 30 degC",
            vec![0.0, 1.0],
            vec![0.0, 1.0, 2.0],
            "count/year",
            vec![0.0; 6],
        )
        .unwrap();

        assert_eq!(artifact.name(), "days-above-30");
        assert_eq!(artifact.layers().len(), 1);
        assert_eq!(artifact.layers()[0].name, "days-above-30");
        assert_eq!(artifact.ny(), 2);
        assert_eq!(artifact.nx(), 3);
    }

    #[test]
    fn test_layer_shape_mismatch_rejected() {
        let result = Artifact::single(
            "temp-p95",
            "",
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            "degC",
            vec![0.0; 3], // should be 4
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_bundle_rejected() {
        let result = Artifact::bundle("return-levels", "", vec![0.0], vec![0.0], vec![]);
        assert!(result.is_err());
    }
}
