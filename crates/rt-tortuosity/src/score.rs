use rt_trace::VesselCurve;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::Result;
use crate::metric::{Estimator, TortuosityScore};
use crate::numeric::inflection_points;
use crate::params::TortuosityParams;

/// Every estimator evaluated on one vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselScores {
    /// Raw skeleton pixels of the vessel.
    pub pixel_count: usize,
    /// Points in the `y = f(x)` projection the estimators ran on.
    pub points: usize,
    pub inflection_points: usize,
    /// One entry per estimator, in [`Estimator::ALL`] order.
    pub scores: Vec<TortuosityScore>,
}

impl VesselScores {
    pub fn get(&self, estimator: Estimator) -> Option<&TortuosityScore> {
        self.scores.iter().find(|s| s.estimator == estimator)
    }

    pub fn value(&self, estimator: Estimator) -> Option<f64> {
        self.get(estimator).map(|s| s.value)
    }

    /// Whether any thresholded estimator called this vessel tortuous.
    pub fn is_tortuous(&self) -> bool {
        self.scores.iter().any(|s| s.tortuous == Some(true))
    }
}

/// Runs every estimator on `curve`.
///
/// Fails with the first estimator error, which for curves shorter than four
/// projected points is the linear regression length check.
pub fn score_vessel(curve: &VesselCurve, params: &TortuosityParams) -> Result<VesselScores> {
    let xs = curve.xs_f64();
    let ys = curve.ys_f64();

    let scores = Estimator::ALL
        .iter()
        .map(|e| e.score(&xs, &ys, params))
        .collect::<Result<Vec<_>>>()?;

    Ok(VesselScores {
        pixel_count: curve.pixel_count(),
        points: curve.len(),
        inflection_points: inflection_points(&ys).len(),
        scores,
    })
}

/// Scores every curve longer than `params.min_pixels_per_vessel` projected
/// points, keeping input order. Shorter curves are skipped silently.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(curves, params), fields(curves = curves.len()))
)]
pub fn score_vessels(
    curves: &[VesselCurve],
    params: &TortuosityParams,
) -> Result<Vec<VesselScores>> {
    let scored = curves
        .iter()
        .filter(|c| c.len() > params.min_pixels_per_vessel)
        .map(|c| score_vessel(c, params))
        .collect::<Result<Vec<_>>>()?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        scored = scored.len(),
        skipped = curves.len() - scored.len(),
        "vessels scored"
    );

    Ok(scored)
}

/// Per-image aggregate of vessel scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSummary {
    pub vessel_count: usize,
    /// Share of vessels called tortuous, in `[0, 1]`.
    pub tortuous_fraction: f64,
    /// Mean value per estimator, in [`Estimator::ALL`] order.
    pub means: Vec<(Estimator, f64)>,
    /// Box-counting dimension of the whole skeleton.
    pub image_fractal: f64,
}

impl ImageSummary {
    pub fn from_scores(scores: &[VesselScores], image_fractal: f64) -> Self {
        let vessel_count = scores.len();
        let divisor = vessel_count.max(1) as f64;

        let tortuous = scores.iter().filter(|s| s.is_tortuous()).count();
        let means = Estimator::ALL
            .iter()
            .map(|&e| {
                let sum: f64 = scores.iter().filter_map(|s| s.value(e)).sum();
                (e, sum / divisor)
            })
            .collect();

        Self {
            vessel_count,
            tortuous_fraction: tortuous as f64 / divisor,
            means,
            image_fractal,
        }
    }

    pub fn mean(&self, estimator: Estimator) -> Option<f64> {
        self.means
            .iter()
            .find(|(e, _)| *e == estimator)
            .map(|&(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use rt_core::PixelCoord;
    use rt_trace::VesselCurve;

    use super::{ImageSummary, score_vessel, score_vessels};
    use crate::{Estimator, TortuosityError, TortuosityParams};

    fn curve(points: &[(usize, usize)]) -> VesselCurve {
        VesselCurve::from_pixels(points.iter().map(|&p| PixelCoord::from(p)).collect())
    }

    fn diagonal(len: usize) -> VesselCurve {
        curve(&(0..len).map(|i| (i + 1, i + 1)).collect::<Vec<_>>())
    }

    fn wiggly() -> VesselCurve {
        let cols = [0, 0, 5, 3, 1, 6, 6];
        curve(
            &cols
                .iter()
                .enumerate()
                .map(|(row, &col)| (row + 2, col + 2))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn straight_vessel_scores() {
        let scores = score_vessel(&diagonal(7), &TortuosityParams::default()).expect("long");

        assert_eq!(scores.pixel_count, 7);
        assert_eq!(scores.points, 7);
        assert_eq!(scores.inflection_points, 0);
        assert_eq!(scores.scores.len(), Estimator::ALL.len());
        assert!(!scores.is_tortuous());

        assert_eq!(scores.value(Estimator::LinearRegression), Some(1.0));
        let distance = scores.value(Estimator::DistanceMeasure).expect("present");
        assert!((distance - 1.0).abs() < 1e-12);
        assert_eq!(scores.value(Estimator::SquaredCurvature), Some(0.0));
        assert_eq!(scores.value(Estimator::Density), Some(0.0));
    }

    #[test]
    fn wiggly_vessel_is_tortuous() {
        let scores = score_vessel(&wiggly(), &TortuosityParams::default()).expect("long");

        assert!(scores.is_tortuous());
        let r2 = scores.get(Estimator::LinearRegression).expect("present");
        assert!((r2.value - 4.0 / 9.0).abs() < 1e-12);
        assert_eq!(r2.tortuous, Some(true));
        assert!(scores.inflection_points > 0);
    }

    #[test]
    fn short_vessel_error_is_surfaced() {
        let err = score_vessel(&diagonal(3), &TortuosityParams::default()).expect_err("short");
        assert_eq!(
            err,
            TortuosityError::InvalidCurveLength {
                estimator: Estimator::LinearRegression,
                required: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn batch_skips_curves_at_or_below_minimum() {
        let curves = vec![diagonal(6), diagonal(7), diagonal(3), wiggly()];
        let scored = score_vessels(&curves, &TortuosityParams::default()).expect("ok");
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].points, 7);
        assert!(scored[1].is_tortuous());

        let params = TortuosityParams {
            min_pixels_per_vessel: 5,
            ..TortuosityParams::default()
        };
        assert_eq!(score_vessels(&curves, &params).expect("ok").len(), 3);

        let loose = TortuosityParams {
            min_pixels_per_vessel: 0,
            ..TortuosityParams::default()
        };
        assert!(score_vessels(&curves, &loose).is_err());
    }

    #[test]
    fn summary_averages_every_estimator() {
        let params = TortuosityParams::default();
        let straight = score_vessel(&diagonal(7), &params).expect("long");
        let bent = score_vessel(&wiggly(), &params).expect("long");

        let summary = ImageSummary::from_scores(&[straight.clone(), bent.clone()], 1.3);
        assert_eq!(summary.vessel_count, 2);
        assert_eq!(summary.tortuous_fraction, 0.5);
        assert_eq!(summary.image_fractal, 1.3);
        assert_eq!(summary.means.len(), Estimator::ALL.len());

        for e in Estimator::ALL {
            let expected = (straight.value(e).expect("present") + bent.value(e).expect("present"))
                / 2.0;
            let mean = summary.mean(e).expect("present");
            assert!((mean - expected).abs() < 1e-12, "{e}");
        }
    }

    #[test]
    fn empty_summary_has_zero_means() {
        let summary = ImageSummary::from_scores(&[], 0.0);
        assert_eq!(summary.vessel_count, 0);
        assert_eq!(summary.tortuous_fraction, 0.0);
        assert!(summary.means.iter().all(|&(_, v)| v == 0.0));
    }
}
