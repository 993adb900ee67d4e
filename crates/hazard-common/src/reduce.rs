//! Temporal reduction of gridded series into per-period maxima.
//!
//! Reductions collapse the time axis of a [`GridTimeSeries`] into calendar
//! bins (one entry per day or per year). Each output cell holds the maximum
//! of the finite values observed in that bin; a bin with zero finite
//! observations for a cell stays missing.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::series::{GridTimeSeries, VariableKind};

/// A time-reduced series: same (y, x) grid, coarser period axis.
#[derive(Debug, Clone)]
pub struct ReducedSeries<P> {
    kind: VariableKind,
    units: String,
    periods: Vec<P>,
    y: Vec<f64>,
    x: Vec<f64>,
    values: Vec<f32>,
}

/// One maximum per calendar day.
pub type DailySeries = ReducedSeries<NaiveDate>;

/// One maximum per calendar year.
pub type AnnualSeries = ReducedSeries<i32>;

impl<P: Copy> ReducedSeries<P> {
    /// Variable kind inherited from the source series.
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// Physical unit inherited from the source series.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Ordered period labels, one per time-axis entry.
    pub fn periods(&self) -> &[P] {
        &self.periods
    }

    /// Ordered y coordinate values.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Ordered x coordinate values.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Number of periods on the reduced time axis.
    pub fn n_periods(&self) -> usize {
        self.periods.len()
    }

    /// Number of grid rows.
    pub fn ny(&self) -> usize {
        self.y.len()
    }

    /// Number of grid columns.
    pub fn nx(&self) -> usize {
        self.x.len()
    }

    /// Number of grid cells per period.
    pub fn n_cells(&self) -> usize {
        self.ny() * self.nx()
    }

    /// Value at (period, flat cell index), or `None` if out of range or missing.
    pub fn value_at(&self, period: usize, cell: usize) -> Option<f32> {
        if period >= self.n_periods() || cell >= self.n_cells() {
            return None;
        }
        let v = self.values[period * self.n_cells() + cell];
        v.is_finite().then_some(v)
    }

    /// Finite values observed for one cell, in period order.
    pub fn cell_values(&self, cell: usize) -> Vec<f32> {
        (0..self.n_periods())
            .filter_map(|p| self.value_at(p, cell))
            .collect()
    }
}

/// Collapse a series to one maximum per calendar day (UTC).
pub fn daily_max(series: &GridTimeSeries) -> DailySeries {
    reduce_max(series, |t| t.date_naive())
}

/// Collapse a series to one maximum per calendar year (UTC).
pub fn annual_max(series: &GridTimeSeries) -> AnnualSeries {
    reduce_max(series, |t| t.year())
}

/// Bin time steps by `period_of` and take the per-cell maximum of the finite
/// values in each bin. Periods come out in ascending order regardless of the
/// input cadence.
fn reduce_max<P: Ord + Copy>(
    series: &GridTimeSeries,
    period_of: impl Fn(&DateTime<Utc>) -> P,
) -> ReducedSeries<P> {
    let keys: BTreeSet<P> = series.times().iter().map(&period_of).collect();
    let periods: Vec<P> = keys.into_iter().collect();
    let bin_of: BTreeMap<P, usize> = periods.iter().enumerate().map(|(i, p)| (*p, i)).collect();

    let n_cells = series.n_cells();
    let mut values = vec![f32::NAN; periods.len() * n_cells];

    for (t, time) in series.times().iter().enumerate() {
        let bin = bin_of[&period_of(time)];
        for cell in 0..n_cells {
            if let Some(v) = series.value_at(t, cell) {
                let slot = &mut values[bin * n_cells + cell];
                if slot.is_nan() || v > *slot {
                    *slot = v;
                }
            }
        }
    }

    ReducedSeries {
        kind: series.kind(),
        units: series.units().to_string(),
        periods,
        y: series.y().to_vec(),
        x: series.x().to_vec(),
        values,
    }
}
