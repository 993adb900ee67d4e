//! Empirical quantile estimation.

/// Empirical quantile of a sample by linear interpolation between order
/// statistics: `h = (n - 1) * q`, interpolating between the surrounding
/// sorted values. Non-finite values are dropped first; returns `None` when
/// nothing finite remains.
pub fn empirical_quantile(values: &[f32], q: f64) -> Option<f32> {
    let mut sorted: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    if n == 1 {
        return Some(sorted[0]);
    }

    let h = (n - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    let value = sorted[lo] as f64 + frac * (sorted[hi] as f64 - sorted[lo] as f64);
    Some(value as f32)
}
