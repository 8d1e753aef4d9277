use crate::error::{Result, check_curve};
use crate::metric::Estimator;

/// Goodness of fit of the curve against the straight line through its
/// endpoints, as a coefficient of determination.
///
/// Interior points `1, 1 + s, 1 + 2s, …` (excluding the last point) are
/// sampled with stride `s = max(ceil(n / sampling_size), 1)` and
/// `R² = Σ(f(xᵢ) - ȳ)² / Σ(yᵢ - ȳ)²` is computed over the samples, where `f`
/// is the endpoint line and `ȳ` the sample mean.
///
/// Values near 1 mean the curve is close to straight. The ratio is not
/// clamped, so strongly bent curves can score above 1 as well as below.
///
/// Fallbacks:
/// - vertical chord or constant samples: retried once with the axes swapped;
///   if still degenerate the curve counts as straight (`1.0`);
/// - NaN: `0.0`.
///
/// Expects `xs` sorted ascending with at least 4 points.
pub fn linear_regression_tortuosity(xs: &[f64], ys: &[f64], sampling_size: usize) -> Result<f64> {
    let estimator = Estimator::LinearRegression;
    check_curve(estimator, xs, ys, estimator.min_points())?;

    let r2 = endpoint_fit_r2(xs, ys, sampling_size)
        .or_else(|| endpoint_fit_r2(ys, xs, sampling_size))
        .unwrap_or(1.0);

    Ok(if r2.is_nan() { 0.0 } else { r2 })
}

/// `None` when a denominator is zero.
fn endpoint_fit_r2(xs: &[f64], ys: &[f64], sampling_size: usize) -> Option<f64> {
    let n = xs.len();
    let run = xs[n - 1] - xs[0];
    if run == 0.0 {
        return None;
    }

    let slope = (ys[n - 1] - ys[0]) / run;
    let intercept = ys[0] - slope * xs[0];
    let stride = n.div_ceil(sampling_size.max(1)).max(1);
    let samples = (1..n - 1).step_by(stride);

    let (sum, count) = samples
        .clone()
        .fold((0.0, 0usize), |(s, c), i| (s + ys[i], c + 1));
    if count == 0 {
        return None;
    }
    let y_mean = sum / count as f64;

    let mut explained = 0.0;
    let mut total = 0.0;
    for i in samples {
        let fitted = slope * xs[i] + intercept;
        explained += (fitted - y_mean).powi(2);
        total += (ys[i] - y_mean).powi(2);
    }

    if total == 0.0 {
        return None;
    }
    Some(explained / total)
}
