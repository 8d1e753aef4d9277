//! Finite-difference stencils and polyline measurements shared by the
//! estimators.

/// Centered first derivative at `i` with unit spacing.
///
/// Caller guarantees `0 < i < values.len() - 1`.
#[inline]
pub fn derivative1_centered(values: &[f64], i: usize) -> f64 {
    (values[i + 1] - values[i - 1]) / 2.0
}

/// Centered second derivative at `i`, scaled by 1/4.
///
/// The divisor is 4 rather than the textbook 1; existing curvature scores
/// depend on it.
#[inline]
pub fn derivative2_centered(values: &[f64], i: usize) -> f64 {
    (values[i + 1] - 2.0 * values[i] + values[i - 1]) / 4.0
}

#[inline]
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Sum of point-to-point distances. Zero for fewer than two points.
pub fn arc_length(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| distance(x[0], y[0], x[1], y[1]))
        .sum()
}

/// Distance from the first to the last point. Zero for an empty curve.
pub fn chord_length(xs: &[f64], ys: &[f64]) -> f64 {
    match (xs.first(), ys.first(), xs.last(), ys.last()) {
        (Some(&x0), Some(&y0), Some(&x1), Some(&y1)) => distance(x0, y0, x1, y1),
        _ => 0.0,
    }
}

/// Indices where the sign of the first difference of `ys` changes.
///
/// With `d[i] = ys[i] - ys[i-1]`, index `i-1` is reported for every `i` in
/// `2..n` where `sign(d[i]) != sign(d[i-1])`. Zero is its own sign, so a run
/// that flattens out also counts. The first and last index are never
/// reported.
pub fn inflection_points(ys: &[f64]) -> Vec<usize> {
    let mut out = Vec::new();
    for i in 2..ys.len() {
        let prev = sign(ys[i - 1] - ys[i - 2]);
        let cur = sign(ys[i] - ys[i - 1]);
        if cur != prev {
            out.push(i - 1);
        }
    }
    out
}

/// Trapezoidal integral of `values` sampled with unit spacing.
pub fn trapezoid(values: &[f64]) -> f64 {
    values.windows(2).map(|w| (w[0] + w[1]) / 2.0).sum()
}

#[inline]
fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}
