//! Batch driver: discover datasets, compute indicators and return levels.
//!
//! The driver is sequential over datasets and over stages within a dataset.
//! Failure isolation follows the unit of work: an unreadable dataset is
//! skipped, a failed indicator leaves its siblings running, and a failed
//! return-level estimation does not disturb the indicator artifacts.

use tracing::{info, warn};

use artifact_store::ZarrArtifactStore;
use extremes::{EstimatorOutcome, ExtremeValueEstimator};
use hazard_common::{HazardError, HazardResult, VariableKind};
use indicators::{precipitation_specs, temperature_specs, IndicatorCalculator};

use crate::config::PipelineConfig;
use crate::discovery::{discover_datasets, DatasetEntry};
use crate::reader::DatasetReader;

/// Totals for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Datasets read and processed.
    pub datasets_processed: usize,
    /// Datasets skipped as unreadable or unrecognized.
    pub datasets_skipped: usize,
    /// Artifacts computed and written (indicators and return-level bundles).
    pub artifacts_computed: usize,
    /// Artifacts skipped because they already existed.
    pub artifacts_cached: usize,
    /// Artifact computations that failed.
    pub artifacts_failed: usize,
}

/// Run the full batch over the configured input directory.
pub fn run(config: &PipelineConfig) -> HazardResult<PipelineSummary> {
    let sink = ZarrArtifactStore::create(&config.output_dir)?;
    let datasets = discover_datasets(&config.input_dir)?;
    info!(
        count = datasets.len(),
        input = %config.input_dir.display(),
        "discovered input datasets"
    );

    let mut summary = PipelineSummary::default();
    for entry in &datasets {
        match process_dataset(config, &sink, entry, &mut summary) {
            Ok(()) => summary.datasets_processed += 1,
            Err(e) => {
                warn!(dataset = %entry.name, error = %e, "skipping dataset");
                summary.datasets_skipped += 1;
            }
        }
    }

    info!(
        processed = summary.datasets_processed,
        skipped = summary.datasets_skipped,
        computed = summary.artifacts_computed,
        cached = summary.artifacts_cached,
        failed = summary.artifacts_failed,
        "pipeline run complete"
    );
    Ok(summary)
}

fn process_dataset(
    config: &PipelineConfig,
    sink: &ZarrArtifactStore,
    entry: &DatasetEntry,
    summary: &mut PipelineSummary,
) -> HazardResult<()> {
    let reader = DatasetReader::open(&entry.name, &entry.path)?;
    let calculator = IndicatorCalculator::new(sink, config.overwrite);
    let mut recognized = false;

    if let Some(series) = reader.read_variable(VariableKind::Temperature)? {
        recognized = true;
        info!(dataset = %entry.name, variable = "temperature", steps = series.n_times(), "read variable");
        let specs = temperature_specs(
            &config.temperature_thresholds,
            &config.temperature_quantiles,
        )?;
        let report = calculator.run(&series, &specs);
        summary.artifacts_computed += report.computed;
        summary.artifacts_cached += report.cache_hits;
        summary.artifacts_failed += report.failed;
    }

    if let Some(series) = reader.read_variable(VariableKind::Precipitation)? {
        recognized = true;
        info!(dataset = %entry.name, variable = "precipitation", steps = series.n_times(), "read variable");
        let specs = precipitation_specs(&config.precipitation_quantiles)?;
        let report = calculator.run(&series, &specs);
        summary.artifacts_computed += report.computed;
        summary.artifacts_cached += report.cache_hits;
        summary.artifacts_failed += report.failed;

        // Return-level estimation is its own unit of work: a failure here
        // leaves the percentile artifacts in place.
        let estimator =
            ExtremeValueEstimator::new(sink, config.return_periods.clone(), config.overwrite)?;
        match estimator.run(&series) {
            Ok(EstimatorOutcome::Computed) => summary.artifacts_computed += 1,
            Ok(EstimatorOutcome::CacheHit) => summary.artifacts_cached += 1,
            Err(e) => {
                warn!(dataset = %entry.name, error = %e, "return-level estimation failed");
                summary.artifacts_failed += 1;
            }
        }
    }

    if !recognized {
        return Err(HazardError::variable_not_found(
            &entry.name,
            "temperature or precipitation",
        ));
    }
    Ok(())
}
