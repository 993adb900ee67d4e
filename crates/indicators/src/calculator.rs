//! Indicator calculator with sink-backed memoization.

use tracing::{info, warn};

use artifact_store::{Artifact, ArtifactSink};
use hazard_common::{daily_max, DailySeries, GridTimeSeries, HazardResult, VariableKind};

use crate::exceedance::mean_annual_days_above;
use crate::quantile::empirical_quantile;
use crate::spec::{IndicatorKind, IndicatorSpec};

/// Outcome counts for one calculator run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculatorReport {
    /// Indicators computed and written.
    pub computed: usize,
    /// Indicators skipped because their artifact already existed.
    pub cache_hits: usize,
    /// Indicators that failed; siblings are unaffected.
    pub failed: usize,
}

/// Computes indicator maps from a normalized series and persists them.
///
/// The sink is injected so the memoization policy is testable in isolation;
/// existence of the artifact name is the sole cache key.
pub struct IndicatorCalculator<'a, S: ArtifactSink> {
    sink: &'a S,
    overwrite: bool,
}

impl<'a, S: ArtifactSink> IndicatorCalculator<'a, S> {
    /// Create a calculator writing to `sink`. With `overwrite` set, existing
    /// artifacts are recomputed and replaced instead of skipped.
    pub fn new(sink: &'a S, overwrite: bool) -> Self {
        Self { sink, overwrite }
    }

    /// Run every spec against the series. Each indicator is isolated: a
    /// failure is logged and counted, and its siblings still run.
    pub fn run(&self, series: &GridTimeSeries, specs: &[IndicatorSpec]) -> CalculatorReport {
        let mut report = CalculatorReport::default();
        // Daily maxima are shared by every temperature statistic; reduced
        // lazily once per series.
        let mut daily: Option<DailySeries> = None;

        for spec in specs {
            match self.run_one(series, spec, &mut daily) {
                Ok(true) => report.computed += 1,
                Ok(false) => report.cache_hits += 1,
                Err(e) => {
                    warn!(indicator = %spec.name(), error = %e, "indicator computation failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Returns Ok(true) when the indicator was computed, Ok(false) on a
    /// cache hit.
    fn run_one(
        &self,
        series: &GridTimeSeries,
        spec: &IndicatorSpec,
        daily: &mut Option<DailySeries>,
    ) -> HazardResult<bool> {
        if !self.overwrite && self.sink.exists(spec.name())? {
            info!(indicator = %spec.name(), "artifact already exists, skipping");
            return Ok(false);
        }

        let (units, data) = match spec.kind() {
            IndicatorKind::DaysAbove { threshold } => {
                let daily = daily.get_or_insert_with(|| daily_max(series));
                (
                    "count/year".to_string(),
                    mean_annual_days_above(daily, threshold),
                )
            }
            IndicatorKind::Percentile { quantile } => {
                let data = match series.kind() {
                    // Temperature percentiles are taken over the same
                    // daily-maxima series the exceedance counts use.
                    VariableKind::Temperature => {
                        let daily = daily.get_or_insert_with(|| daily_max(series));
                        percentile_map_daily(daily, quantile)
                    }
                    // Precipitation input is already daily.
                    VariableKind::Precipitation => percentile_map_raw(series, quantile),
                };
                (series.units().to_string(), data)
            }
        };

        let artifact = Artifact::single(
            spec.name(),
            describe(spec, series),
            series.y().to_vec(),
            series.x().to_vec(),
            units,
            data,
        )?;
        self.sink.write(&artifact, self.overwrite)?;
        info!(indicator = %spec.name(), variable = %series.kind(), "computed indicator");
        Ok(true)
    }
}

fn percentile_map_daily(daily: &DailySeries, quantile: f64) -> Vec<f32> {
    (0..daily.n_cells())
        .map(|cell| empirical_quantile(&daily.cell_values(cell), quantile).unwrap_or(f32::NAN))
        .collect()
}

fn percentile_map_raw(series: &GridTimeSeries, quantile: f64) -> Vec<f32> {
    (0..series.n_cells())
        .map(|cell| empirical_quantile(&series.cell_values(cell), quantile).unwrap_or(f32::NAN))
        .collect()
}

fn describe(spec: &IndicatorSpec, series: &GridTimeSeries) -> String {
    match spec.kind() {
        IndicatorKind::DaysAbove { threshold } => format!(
            "Mean annual number of days with daily maximum {} above {} {}",
            series.kind(),
            threshold,
            series.units()
        ),
        IndicatorKind::Percentile { quantile } => format!(
            "Empirical {} quantile of {} over the reference period",
            quantile,
            series.kind()
        ),
    }
}
