//! Grid-wide return-level estimation.

use rayon::prelude::*;
use tracing::{info, warn};

use artifact_store::{Artifact, ArtifactLayer, ArtifactSink};
use hazard_common::{annual_max, GridTimeSeries, HazardError, HazardResult};

use crate::gumbel::{fit_gumbel, GumbelParams};

/// Name of the bundled return-level artifact.
pub const RETURN_LEVEL_ARTIFACT: &str = "precip-return-levels";

/// Distribution family tag attached to the artifact description.
const DISTRIBUTION_TAG: &str =
    "Return levels of annual maximum daily precipitation from a two-parameter \
     Gumbel distribution fitted by the method of L-moments";

/// Outcome of one estimator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorOutcome {
    /// Return levels were fitted and the artifact written.
    Computed,
    /// The artifact already existed; nothing was recomputed.
    CacheHit,
}

/// Estimates per-cell Gumbel return levels from a precipitation series.
///
/// The per-cell fit is a pure function of the cell's annual-maxima sample,
/// so cells are processed data-parallel with no shared mutable state. The
/// whole bundle is memoized under one artifact name.
pub struct ExtremeValueEstimator<'a, S: ArtifactSink> {
    sink: &'a S,
    return_periods: Vec<u32>,
    overwrite: bool,
}

impl<'a, S: ArtifactSink> ExtremeValueEstimator<'a, S> {
    /// Create an estimator for the given return periods (each >= 2 years).
    pub fn new(sink: &'a S, return_periods: Vec<u32>, overwrite: bool) -> HazardResult<Self> {
        if return_periods.is_empty() {
            return Err(HazardError::InvalidSpec(
                "return period set must be non-empty".to_string(),
            ));
        }
        if let Some(&r) = return_periods.iter().find(|&&r| r < 2) {
            return Err(HazardError::InvalidSpec(format!(
                "return period must be at least 2 years, got {}",
                r
            )));
        }
        Ok(Self {
            sink,
            return_periods,
            overwrite,
        })
    }

    /// Reduce to annual maxima, fit per cell, and write the bundled
    /// return-level artifact.
    pub fn run(&self, series: &GridTimeSeries) -> HazardResult<EstimatorOutcome> {
        if !self.overwrite && self.sink.exists(RETURN_LEVEL_ARTIFACT)? {
            info!(artifact = RETURN_LEVEL_ARTIFACT, "artifact already exists, skipping");
            return Ok(EstimatorOutcome::CacheHit);
        }

        let annual = annual_max(series);
        let n_cells = annual.n_cells();

        let fits: Vec<Option<GumbelParams>> = (0..n_cells)
            .into_par_iter()
            .map(|cell| {
                let sample: Vec<f64> =
                    annual.cell_values(cell).iter().map(|&v| v as f64).collect();
                fit_gumbel(&sample)
            })
            .collect();

        let fitted = fits.iter().filter(|f| f.is_some()).count();
        if fitted == 0 {
            warn!(
                cells = n_cells,
                years = annual.n_periods(),
                "no grid cell produced a valid fit"
            );
        }
        info!(
            cells = n_cells,
            fitted,
            years = annual.n_periods(),
            "fitted annual-maxima distribution"
        );

        let layers: Vec<ArtifactLayer> = self
            .return_periods
            .iter()
            .map(|&r| {
                let data: Vec<f32> = fits
                    .iter()
                    .map(|fit| {
                        fit.map(|params| params.return_level(r as f64) as f32)
                            .unwrap_or(f32::NAN)
                    })
                    .collect();
                ArtifactLayer::new(format!("return_period_{}_y", r), series.units(), data)
            })
            .collect();

        let artifact = Artifact::bundle(
            RETURN_LEVEL_ARTIFACT,
            DISTRIBUTION_TAG,
            annual.y().to_vec(),
            annual.x().to_vec(),
            layers,
        )?;
        self.sink.write(&artifact, self.overwrite)?;
        info!(
            artifact = RETURN_LEVEL_ARTIFACT,
            return_periods = self.return_periods.len(),
            "computed return levels"
        );
        Ok(EstimatorOutcome::Computed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use artifact_store::MemorySink;
    use hazard_common::VariableKind;
    use test_utils::{multi_year_daily_times, series_from_fn};

    /// Five years of daily precipitation on a 1x3 grid. Cell 0 has annual
    /// maxima [50, 55, 60, 45, 70]; cell 1 is entirely missing; cell 2 has
    /// identical maxima every year (degenerate).
    fn precipitation_series() -> GridTimeSeries {
        let annual_peaks = [50.0, 55.0, 60.0, 45.0, 70.0f32];
        let times = multi_year_daily_times(2001, 5);
        series_from_fn(
            VariableKind::Precipitation,
            "mm/day",
            times,
            1,
            3,
            move |t, _, col| {
                let year = t / 365;
                let day = t % 365;
                match col {
                    0 => {
                        if day == 180 {
                            annual_peaks[year]
                        } else {
                            5.0
                        }
                    }
                    1 => f32::NAN,
                    _ => {
                        if day == 180 {
                            30.0
                        } else {
                            5.0
                        }
                    }
                }
            },
        )
    }

    #[test]
    fn test_bundle_has_one_layer_per_period() {
        let sink = MemorySink::new();
        let estimator =
            ExtremeValueEstimator::new(&sink, vec![10, 20, 30, 50, 100, 150], false).unwrap();

        let outcome = estimator.run(&precipitation_series()).unwrap();
        assert_eq!(outcome, EstimatorOutcome::Computed);

        let artifact = sink.get(RETURN_LEVEL_ARTIFACT).unwrap();
        let names: Vec<&str> = artifact.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "return_period_10_y",
                "return_period_20_y",
                "return_period_30_y",
                "return_period_50_y",
                "return_period_100_y",
                "return_period_150_y"
            ]
        );
        assert!(artifact.layers().iter().all(|l| l.units == "mm/day"));
        assert!(artifact.description().contains("Gumbel"));
    }

    #[test]
    fn test_return_level_values_and_monotonicity() {
        let sink = MemorySink::new();
        let estimator = ExtremeValueEstimator::new(&sink, vec![10, 20, 100], false).unwrap();
        estimator.run(&precipitation_series()).unwrap();

        let artifact = sink.get(RETURN_LEVEL_ARTIFACT).unwrap();
        let rl10 = artifact.layers()[0].data[0];
        let rl20 = artifact.layers()[1].data[0];
        let rl100 = artifact.layers()[2].data[0];

        // Known L-moment fit of [50, 55, 60, 45, 70].
        assert_relative_eq!(rl10 as f64, 70.4831, epsilon = 1e-3);
        assert!(rl10 > 70.0, "10-year level extrapolates past the sample max");
        assert!(rl10 < rl20 && rl20 < rl100);
    }

    #[test]
    fn test_unfittable_cells_are_missing_in_every_layer() {
        let sink = MemorySink::new();
        let estimator = ExtremeValueEstimator::new(&sink, vec![10, 100], false).unwrap();
        estimator.run(&precipitation_series()).unwrap();

        let artifact = sink.get(RETURN_LEVEL_ARTIFACT).unwrap();
        for layer in artifact.layers() {
            assert!(layer.data[1].is_nan(), "all-missing cell must stay missing");
            assert!(layer.data[2].is_nan(), "degenerate cell must stay missing");
        }
    }

    #[test]
    fn test_second_run_is_cache_hit() {
        let sink = MemorySink::new();
        let estimator = ExtremeValueEstimator::new(&sink, vec![10], false).unwrap();
        let series = precipitation_series();

        assert_eq!(estimator.run(&series).unwrap(), EstimatorOutcome::Computed);
        assert_eq!(estimator.run(&series).unwrap(), EstimatorOutcome::CacheHit);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_overwrite_recomputes() {
        let sink = MemorySink::new();
        let series = precipitation_series();

        ExtremeValueEstimator::new(&sink, vec![10], false)
            .unwrap()
            .run(&series)
            .unwrap();
        let outcome = ExtremeValueEstimator::new(&sink, vec![10], true)
            .unwrap()
            .run(&series)
            .unwrap();
        assert_eq!(outcome, EstimatorOutcome::Computed);
    }

    #[test]
    fn test_return_period_validation() {
        let sink = MemorySink::new();
        assert!(ExtremeValueEstimator::new(&sink, vec![], false).is_err());
        assert!(ExtremeValueEstimator::new(&sink, vec![1], false).is_err());
        assert!(ExtremeValueEstimator::new(&sink, vec![2, 10], false).is_ok());
    }
}
