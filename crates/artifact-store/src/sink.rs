//! Artifact sink trait and the in-memory test sink.

use std::collections::HashMap;
use std::sync::Mutex;

use hazard_common::{HazardError, HazardResult};

use crate::artifact::Artifact;

/// Persistence surface for named artifacts.
///
/// The calculators receive a sink by reference; existence of a name is the
/// sole memoization key, so implementations must keep `exists` and `write`
/// consistent with each other.
pub trait ArtifactSink {
    /// Whether an artifact with this name is already persisted.
    fn exists(&self, name: &str) -> HazardResult<bool>;

    /// Persist an artifact. Fails with [`HazardError::ArtifactExists`] when
    /// the name is taken and `overwrite` was not requested.
    fn write(&self, artifact: &Artifact, overwrite: bool) -> HazardResult<()>;
}

/// HashMap-backed sink for exercising the memoization policy in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<HashMap<String, Artifact>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a stored artifact by name.
    pub fn get(&self, name: &str) -> Option<Artifact> {
        self.artifacts.lock().unwrap().get(name).cloned()
    }

    /// Names of all stored artifacts, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.artifacts.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    /// Delete a stored artifact, forcing the next run to recompute it.
    pub fn remove(&self, name: &str) -> Option<Artifact> {
        self.artifacts.lock().unwrap().remove(name)
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.lock().unwrap().len()
    }

    /// Whether the sink holds no artifacts.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactSink for MemorySink {
    fn exists(&self, name: &str) -> HazardResult<bool> {
        Ok(self.artifacts.lock().unwrap().contains_key(name))
    }

    fn write(&self, artifact: &Artifact, overwrite: bool) -> HazardResult<()> {
        let mut artifacts = self.artifacts.lock().unwrap();
        if artifacts.contains_key(artifact.name()) && !overwrite {
            return Err(HazardError::ArtifactExists(artifact.name().to_string()));
        }
        artifacts.insert(artifact.name().to_string(), artifact.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> Artifact {
        Artifact::single(name, "test", vec![0.0], vec![0.0], "degC", vec![1.0]).unwrap()
    }

    #[test]
    fn test_write_then_exists() {
        let sink = MemorySink::new();
        assert!(!sink.exists("temp-p95").unwrap());

        sink.write(&sample("temp-p95"), false).unwrap();
        assert!(sink.exists("temp-p95").unwrap());
        assert_eq!(sink.names(), vec!["temp-p95".to_string()]);
    }

    #[test]
    fn test_write_refuses_duplicate_without_overwrite() {
        let sink = MemorySink::new();
        sink.write(&sample("temp-p95"), false).unwrap();

        let err = sink.write(&sample("temp-p95"), false).unwrap_err();
        assert!(matches!(err, HazardError::ArtifactExists(_)));
    }

    #[test]
    fn test_write_with_overwrite_replaces() {
        let sink = MemorySink::new();
        sink.write(&sample("temp-p95"), false).unwrap();
        sink.write(&sample("temp-p95"), true).unwrap();
        assert_eq!(sink.len(), 1);
    }
}
