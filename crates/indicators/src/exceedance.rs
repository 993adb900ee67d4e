//! Threshold-exceedance day counts.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;

use hazard_common::DailySeries;

/// Mean annual count of days whose daily maximum strictly exceeds
/// `threshold`, per grid cell.
///
/// For each calendar year the exceedance days are counted per cell; the
/// counts are then averaged over the years in which the cell has at least
/// one finite daily value. A year with no data for a cell does not dilute
/// the average, and a cell with zero valid years is missing (NaN).
pub fn mean_annual_days_above(daily: &DailySeries, threshold: f32) -> Vec<f32> {
    let years: BTreeSet<i32> = daily.periods().iter().map(|d| d.year()).collect();
    let year_index: BTreeMap<i32, usize> =
        years.iter().enumerate().map(|(i, y)| (*y, i)).collect();
    let n_years = year_index.len();
    let n_cells = daily.n_cells();

    let mut exceedances = vec![0u32; n_years * n_cells];
    let mut has_data = vec![false; n_years * n_cells];

    for (p, date) in daily.periods().iter().enumerate() {
        let yi = year_index[&date.year()];
        for cell in 0..n_cells {
            if let Some(v) = daily.value_at(p, cell) {
                has_data[yi * n_cells + cell] = true;
                if v > threshold {
                    exceedances[yi * n_cells + cell] += 1;
                }
            }
        }
    }

    (0..n_cells)
        .map(|cell| {
            let mut total = 0u32;
            let mut valid_years = 0u32;
            for yi in 0..n_years {
                if has_data[yi * n_cells + cell] {
                    valid_years += 1;
                    total += exceedances[yi * n_cells + cell];
                }
            }
            if valid_years == 0 {
                f32::NAN
            } else {
                total as f32 / valid_years as f32
            }
        })
        .collect()
}
