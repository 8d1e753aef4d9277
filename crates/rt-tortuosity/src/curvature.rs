use crate::error::{Result, check_curve};
use crate::metric::Estimator;
use crate::numeric::{derivative1_centered, derivative2_centered, trapezoid};

/// Integrated absolute curvature along the curve.
///
/// For every interior index the signed curvature
/// `κ = (x'y'' - x''y') / (x'² + y'²)^1.5` is evaluated with centered
/// differences; stationary points (zero speed) contribute `κ = 0`. The result
/// is the unit-spacing trapezoidal integral of `|κ|`, so a curve with only
/// one interior point scores `0.0`.
pub fn squared_curvature_tortuosity(xs: &[f64], ys: &[f64]) -> Result<f64> {
    let estimator = Estimator::SquaredCurvature;
    check_curve(estimator, xs, ys, estimator.min_points())?;

    let curvatures: Vec<f64> = (1..xs.len() - 1)
        .map(|i| curvature_at(xs, ys, i).abs())
        .collect();

    Ok(trapezoid(&curvatures))
}

fn curvature_at(xs: &[f64], ys: &[f64], i: usize) -> f64 {
    let dx = derivative1_centered(xs, i);
    let dy = derivative1_centered(ys, i);
    let ddx = derivative2_centered(xs, i);
    let ddy = derivative2_centered(ys, i);

    let speed2 = dx * dx + dy * dy;
    if speed2 == 0.0 {
        return 0.0;
    }
    (dx * ddy - ddx * dy) / speed2.powf(1.5)
}

#[cfg(test)]
mod tests {
    use super::squared_curvature_tortuosity;
    use crate::{Estimator, TortuosityError};

    const EPS: f64 = 1e-12;

    #[test]
    fn straight_line_has_no_curvature() {
        let xs: Vec<f64> = (0..10).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x + 1.0).collect();
        assert_eq!(squared_curvature_tortuosity(&xs, &ys), Ok(0.0));
    }

    #[test]
    fn parabola() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 1.0, 4.0, 9.0, 16.0];

        // y' = 2i, y'' = 0.5 with the quarter-scaled stencil.
        let k = |i: f64| 0.5 / (1.0 + 4.0 * i * i).powf(1.5);
        let expected = (k(1.0) + k(2.0)) / 2.0 + (k(2.0) + k(3.0)) / 2.0;

        let t = squared_curvature_tortuosity(&xs, &ys).expect("long enough");
        assert!((t - expected).abs() < EPS);
    }

    #[test]
    fn opposite_bends_do_not_cancel() {
        let xs = [-2.0, -1.0, 0.0, 1.0, 2.0];
        let ys = [-8.0, -1.0, 0.0, 1.0, 8.0];

        let t = squared_curvature_tortuosity(&xs, &ys).expect("long enough");
        assert!((t - 1.5 / 17f64.powf(1.5)).abs() < EPS);
    }

    #[test]
    fn stationary_points_contribute_nothing() {
        let xs = [2.0, 2.0, 2.0, 2.0];
        let ys = [5.0, 5.0, 5.0, 5.0];
        assert_eq!(squared_curvature_tortuosity(&xs, &ys), Ok(0.0));
    }

    #[test]
    fn three_points_give_a_single_sample() {
        let t = squared_curvature_tortuosity(&[0.0, 1.0, 2.0], &[0.0, 3.0, 0.0])
            .expect("long enough");
        assert_eq!(t, 0.0);

        assert_eq!(
            squared_curvature_tortuosity(&[0.0, 1.0], &[0.0, 1.0]),
            Err(TortuosityError::InvalidCurveLength {
                estimator: Estimator::SquaredCurvature,
                required: 3,
                actual: 2,
            })
        );
    }
}
