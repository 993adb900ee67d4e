//! Pipeline configuration.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use hazard_common::{HazardError, HazardResult};

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding normalized input stores (`*.zarr`).
    pub input_dir: PathBuf,

    /// Directory receiving output artifacts; created if absent.
    pub output_dir: PathBuf,

    /// Temperature thresholds for exceedance-day counts (degC).
    pub temperature_thresholds: Vec<f32>,

    /// Quantiles for temperature percentiles, each in (0, 1).
    pub temperature_quantiles: Vec<f64>,

    /// Quantiles for precipitation percentiles, each in (0, 1).
    pub precipitation_quantiles: Vec<f64>,

    /// Return periods for extreme-value estimation (years).
    pub return_periods: Vec<u32>,

    /// Recompute and replace existing artifacts instead of skipping them.
    pub overwrite: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/input"),
            output_dir: PathBuf::from("data/output"),
            temperature_thresholds: vec![30.0, 35.0, 40.0, 45.0],
            temperature_quantiles: vec![0.95, 0.999],
            precipitation_quantiles: vec![0.99, 0.995, 0.999],
            return_periods: vec![10, 20, 30, 50, 100, 150],
            overwrite: false,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml(path: impl AsRef<std::path::Path>) -> HazardResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            HazardError::config(format!(
                "cannot read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        serde_yaml::from_str(&text).map_err(|e| HazardError::config(e.to_string()))
    }

    /// Load configuration from environment variables (fallback when no
    /// config file is given). Unset variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = env::var("HAZARD_INPUT_DIR") {
            config.input_dir = PathBuf::from(val);
        }

        if let Ok(val) = env::var("HAZARD_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(val);
        }

        if let Ok(val) = env::var("HAZARD_TEMPERATURE_THRESHOLDS") {
            if let Some(list) = parse_list(&val) {
                config.temperature_thresholds = list;
            }
        }

        if let Ok(val) = env::var("HAZARD_TEMPERATURE_QUANTILES") {
            if let Some(list) = parse_list(&val) {
                config.temperature_quantiles = list;
            }
        }

        if let Ok(val) = env::var("HAZARD_PRECIPITATION_QUANTILES") {
            if let Some(list) = parse_list(&val) {
                config.precipitation_quantiles = list;
            }
        }

        if let Ok(val) = env::var("HAZARD_RETURN_PERIODS") {
            if let Some(list) = parse_list(&val) {
                config.return_periods = list;
            }
        }

        if let Ok(val) = env::var("HAZARD_OVERWRITE") {
            config.overwrite = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.input_dir.as_os_str().is_empty() {
            return Err("input_dir must be set".to_string());
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err("output_dir must be set".to_string());
        }

        for &q in self
            .temperature_quantiles
            .iter()
            .chain(&self.precipitation_quantiles)
        {
            if !(q > 0.0 && q < 1.0) {
                return Err(format!("quantile {} must be in (0, 1)", q));
            }
        }

        if self.return_periods.is_empty() {
            return Err("return_periods must be non-empty".to_string());
        }

        if let Some(&r) = self.return_periods.iter().find(|&&r| r < 2) {
            return Err(format!("return period {} must be at least 2 years", r));
        }

        Ok(())
    }
}

/// Parse a comma-separated list ("30, 35, 40"); `None` on any bad element.
fn parse_list<T: std::str::FromStr>(val: &str) -> Option<Vec<T>> {
    val.split(',')
        .map(|item| item.trim().parse().ok())
        .collect()
}
