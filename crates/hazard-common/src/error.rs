//! Error types for the climate hazard pipeline.

use thiserror::Error;

/// Result type alias using HazardError.
pub type HazardResult<T> = Result<T, HazardError>;

/// Primary error type for hazard pipeline operations.
#[derive(Debug, Error)]
pub enum HazardError {
    // === Input Errors ===
    #[error("failed to read dataset: {0}")]
    DatasetRead(String),

    #[error("variable '{variable}' not found in dataset '{dataset}'")]
    VariableNotFound { dataset: String, variable: String },

    #[error("invalid series: {0}")]
    InvalidSeries(String),

    // === Computation Errors ===
    #[error("invalid indicator spec: {0}")]
    InvalidSpec(String),

    // === Storage Errors ===
    #[error("artifact already exists: {0}")]
    ArtifactExists(String),

    #[error("storage error: {0}")]
    Storage(String),

    // === Infrastructure Errors ===
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HazardError {
    /// Create a DatasetRead error.
    pub fn dataset_read(msg: impl Into<String>) -> Self {
        Self::DatasetRead(msg.into())
    }

    /// Create a VariableNotFound error.
    pub fn variable_not_found(dataset: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::VariableNotFound {
            dataset: dataset.into(),
            variable: variable.into(),
        }
    }

    /// Create an InvalidSeries error.
    pub fn invalid_series(msg: impl Into<String>) -> Self {
        Self::InvalidSeries(msg.into())
    }

    /// Create a Storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<std::io::Error> for HazardError {
    fn from(err: std::io::Error) -> Self {
        HazardError::Storage(err.to_string())
    }
}
