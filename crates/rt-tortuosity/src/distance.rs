//! Arc/chord family of tortuosity measures.

use crate::error::{Result, check_curve};
use crate::metric::Estimator;
use crate::numeric::{arc_length, chord_length, inflection_points};

/// Arc length over chord length. At least `1.0` for any curve whose ends
/// differ; exactly `1.0` for colinear points.
///
/// A closed curve (zero chord) yields `1.0` when it is a single repeated
/// point and `f64::INFINITY` otherwise.
pub fn distance_measure_tortuosity(xs: &[f64], ys: &[f64]) -> Result<f64> {
    let estimator = Estimator::DistanceMeasure;
    check_curve(estimator, xs, ys, estimator.min_points())?;
    Ok(arc_chord_ratio(xs, ys))
}

/// Distance measure weighted by the number of curve pieces, i.e.
/// `distance × (inflections + 1)`.
pub fn distance_inflection_count_tortuosity(xs: &[f64], ys: &[f64]) -> Result<f64> {
    let estimator = Estimator::DistanceInflectionCount;
    check_curve(estimator, xs, ys, estimator.min_points())?;

    let pieces = inflection_points(ys).len() + 1;
    Ok(arc_chord_ratio(xs, ys) * pieces as f64)
}

/// Tortuosity density: the curve is cut at its inflection points and the
/// excess arc of every piece is accumulated.
///
/// With inflections `p1 < … < pn`, the pieces are `[0, p1)`, `[p1, p2)`, …;
/// the tail after `pn` does not contribute. Pieces with a zero chord are
/// skipped. The result is `(n - 1) / n + Σ(arc/chord - 1) / total_arc`, or
/// `0.0` when there is no inflection.
pub fn tortuosity_density(xs: &[f64], ys: &[f64]) -> Result<f64> {
    let estimator = Estimator::Density;
    check_curve(estimator, xs, ys, estimator.min_points())?;

    let inflections = inflection_points(ys);
    let n = inflections.len();
    if n == 0 {
        return Ok(0.0);
    }
    let total_arc = arc_length(xs, ys);
    if total_arc == 0.0 {
        return Ok(0.0);
    }

    let mut start = 0;
    let mut excess = 0.0;
    for &end in &inflections {
        let (seg_x, seg_y) = (&xs[start..end], &ys[start..end]);
        let chord = chord_length(seg_x, seg_y);
        if chord > 0.0 {
            excess += arc_length(seg_x, seg_y) / chord - 1.0;
        }
        start = end;
    }

    Ok((n - 1) as f64 / n as f64 + excess / total_arc)
}

fn arc_chord_ratio(xs: &[f64], ys: &[f64]) -> f64 {
    let arc = arc_length(xs, ys);
    let chord = chord_length(xs, ys);
    if chord > 0.0 {
        arc / chord
    } else if arc == 0.0 {
        1.0
    } else {
        f64::INFINITY
    }
}
