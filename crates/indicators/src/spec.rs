//! Indicator specifications.
//!
//! The set of indicators to compute is an explicit, configuration-driven
//! enumeration; nothing is inferred from the data.

use hazard_common::{HazardError, HazardResult};

/// What an indicator computes per grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorKind {
    /// Mean annual count of days whose daily maximum strictly exceeds the
    /// threshold (in the units of the input series).
    DaysAbove { threshold: f32 },
    /// Empirical quantile of the per-cell sample; `quantile` in (0, 1).
    Percentile { quantile: f64 },
}

/// An immutable (name, kind, parameter) indicator description.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSpec {
    name: String,
    kind: IndicatorKind,
}

impl IndicatorSpec {
    /// Exceedance-count spec named `days-above-{T}`.
    pub fn days_above(threshold: f32) -> Self {
        Self {
            name: format!("days-above-{}", format_tenths(threshold as f64)),
            kind: IndicatorKind::DaysAbove { threshold },
        }
    }

    /// Percentile spec named `{prefix}-p{Q}` with Q in percent.
    pub fn percentile(prefix: &str, quantile: f64) -> HazardResult<Self> {
        if !(quantile > 0.0 && quantile < 1.0) {
            return Err(HazardError::InvalidSpec(format!(
                "quantile must be in (0, 1), got {}",
                quantile
            )));
        }
        Ok(Self {
            name: format!("{}-p{}", prefix, format_tenths(quantile * 100.0)),
            kind: IndicatorKind::Percentile { quantile },
        })
    }

    /// Artifact name; the memoization key on the sink.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What this indicator computes.
    pub fn kind(&self) -> IndicatorKind {
        self.kind
    }
}

/// Build the configured indicator set for a temperature series:
/// one exceedance count per threshold, one percentile per quantile.
pub fn temperature_specs(thresholds: &[f32], quantiles: &[f64]) -> HazardResult<Vec<IndicatorSpec>> {
    let mut specs: Vec<IndicatorSpec> =
        thresholds.iter().map(|&t| IndicatorSpec::days_above(t)).collect();
    for &q in quantiles {
        specs.push(IndicatorSpec::percentile("temp", q)?);
    }
    Ok(specs)
}

/// Build the configured indicator set for a precipitation series:
/// one percentile per quantile.
pub fn precipitation_specs(quantiles: &[f64]) -> HazardResult<Vec<IndicatorSpec>> {
    quantiles
        .iter()
        .map(|&q| IndicatorSpec::percentile("precip", q))
        .collect()
}

/// Render a value with at most one decimal place, dropping a trailing `.0`
/// (30.0 -> "30", 99.9 -> "99.9").
fn format_tenths(value: f64) -> String {
    let tenths = (value * 10.0).round() as i64;
    if tenths % 10 == 0 {
        format!("{}", tenths / 10)
    } else {
        format!("{:.1}", tenths as f64 / 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_above_naming() {
        assert_eq!(IndicatorSpec::days_above(30.0).name(), "days-above-30");
        assert_eq!(IndicatorSpec::days_above(37.5).name(), "days-above-37.5");
    }

    #[test]
    fn test_percentile_naming() {
        assert_eq!(
            IndicatorSpec::percentile("temp", 0.95).unwrap().name(),
            "temp-p95"
        );
        assert_eq!(
            IndicatorSpec::percentile("temp", 0.999).unwrap().name(),
            "temp-p99.9"
        );
        assert_eq!(
            IndicatorSpec::percentile("precip", 0.995).unwrap().name(),
            "precip-p99.5"
        );
    }

    #[test]
    fn test_quantile_range_validated() {
        assert!(IndicatorSpec::percentile("temp", 0.0).is_err());
        assert!(IndicatorSpec::percentile("temp", 1.0).is_err());
        assert!(IndicatorSpec::percentile("temp", 1.5).is_err());
    }

    #[test]
    fn test_temperature_spec_set() {
        let specs = temperature_specs(&[30.0, 35.0], &[0.95, 0.999]).unwrap();
        let names: Vec<&str> = specs.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["days-above-30", "days-above-35", "temp-p95", "temp-p99.9"]
        );
    }

    #[test]
    fn test_precipitation_spec_set() {
        let specs = precipitation_specs(&[0.99, 0.995, 0.999]).unwrap();
        let names: Vec<&str> = specs.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["precip-p99", "precip-p99.5", "precip-p99.9"]);
    }
}
