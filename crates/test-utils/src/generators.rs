//! Generators for synthetic gridded climate series.
//!
//! These build predictable, verifiable series so tests can assert exact
//! statistics instead of approximations against random data.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};

use hazard_common::{GridTimeSeries, VariableKind};

/// One timestamp per day at 12:00 UTC, starting at `start`.
pub fn daily_times(start: NaiveDate, days: usize) -> Vec<DateTime<Utc>> {
    (0..days)
        .map(|d| {
            let date = start.checked_add_days(Days::new(d as u64)).unwrap();
            Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
        })
        .collect()
}

/// Daily timestamps covering `years` whole calendar years from January 1 of
/// `start_year` (365-day years; leap days are not generated so per-year
/// counts stay uniform).
pub fn multi_year_daily_times(start_year: i32, years: usize) -> Vec<DateTime<Utc>> {
    let mut times = Vec::with_capacity(years * 365);
    for year in start_year..start_year + years as i32 {
        for ordinal in 1..=365u32 {
            let date = NaiveDate::from_yo_opt(year, ordinal).unwrap();
            times.push(Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap()));
        }
    }
    times
}

/// Build a series whose value at `(time_index, row, col)` comes from a
/// closure. Return NaN from the closure to mark an observation missing.
///
/// Grid coordinates are the row/column indices as floats.
pub fn series_from_fn(
    kind: VariableKind,
    units: &str,
    times: Vec<DateTime<Utc>>,
    ny: usize,
    nx: usize,
    value: impl Fn(usize, usize, usize) -> f32,
) -> GridTimeSeries {
    let mut values = Vec::with_capacity(times.len() * ny * nx);
    for t in 0..times.len() {
        for row in 0..ny {
            for col in 0..nx {
                values.push(value(t, row, col));
            }
        }
    }
    let y: Vec<f64> = (0..ny).map(|i| i as f64).collect();
    let x: Vec<f64> = (0..nx).map(|i| i as f64).collect();
    GridTimeSeries::new(kind, units, times, y, x, values).expect("generator shapes are consistent")
}
