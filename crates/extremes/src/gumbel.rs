//! Two-parameter Gumbel distribution: L-moment fitting and quantiles.

/// Euler-Mascheroni constant.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Fitted Gumbel location/scale parameters for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GumbelParams {
    location: f64,
    scale: f64,
}

impl GumbelParams {
    /// Location parameter (mode of the distribution).
    pub fn location(&self) -> f64 {
        self.location
    }

    /// Scale parameter (strictly positive).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Quantile function at non-exceedance probability `p` in (0, 1):
    /// `location - scale * ln(-ln p)`.
    pub fn quantile(&self, p: f64) -> f64 {
        self.location - self.scale * (-(p.ln())).ln()
    }

    /// Return level for return period `r` years: the quantile at
    /// non-exceedance probability `1 - 1/r`.
    pub fn return_level(&self, r: f64) -> f64 {
        self.quantile(1.0 - 1.0 / r)
    }
}

/// Fit a Gumbel distribution to a sample by the method of L-moments
/// (unbiased probability-weighted moments).
///
/// With the sample sorted ascending, `b0` is the mean and
/// `b1 = (1/n) * sum((i-1)/(n-1) * x_i)` (1-indexed), giving the second
/// L-moment `lambda2 = 2*b1 - b0`. Then `scale = lambda2 / ln 2` and
/// `location = b0 - gamma * scale`. Closed-form and deterministic for a
/// given sample.
///
/// Returns `None` when fewer than two finite values remain or when the
/// sample is degenerate (`lambda2` at or below zero, e.g. all values
/// identical).
pub fn fit_gumbel(sample: &[f64]) -> Option<GumbelParams> {
    let mut values: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
    let n = values.len();
    if n < 2 {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let b0 = values.iter().sum::<f64>() / n as f64;
    let b1 = values
        .iter()
        .enumerate()
        .map(|(i, &v)| i as f64 / (n - 1) as f64 * v)
        .sum::<f64>()
        / n as f64;

    let lambda2 = 2.0 * b1 - b0;
    if lambda2 <= 1e-10 {
        return None;
    }

    let scale = lambda2 / std::f64::consts::LN_2;
    let location = b0 - EULER_GAMMA * scale;
    Some(GumbelParams { location, scale })
}
