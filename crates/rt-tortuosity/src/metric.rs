use core::fmt;

use crate::error::Result;
use crate::params::TortuosityParams;
use crate::{curvature, distance, fractal, linear};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Estimator {
    LinearRegression,
    DistanceMeasure,
    DistanceInflectionCount,
    SquaredCurvature,
    Density,
    FractalCurve,
}

impl Estimator {
    /// Every per-curve estimator, in report order.
    pub const ALL: [Estimator; 6] = [
        Estimator::LinearRegression,
        Estimator::DistanceMeasure,
        Estimator::DistanceInflectionCount,
        Estimator::SquaredCurvature,
        Estimator::Density,
        Estimator::FractalCurve,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::LinearRegression => "linear_regression",
            Self::DistanceMeasure => "distance_measure",
            Self::DistanceInflectionCount => "distance_inflection_count",
            Self::SquaredCurvature => "squared_curvature",
            Self::Density => "tortuosity_density",
            Self::FractalCurve => "fractal_curve",
        }
    }

    pub fn min_points(self) -> usize {
        match self {
            Self::LinearRegression => 4,
            Self::SquaredCurvature => 3,
            Self::DistanceMeasure | Self::DistanceInflectionCount | Self::Density => 2,
            Self::FractalCurve => 1,
        }
    }

    /// Runs this estimator on one curve.
    pub fn evaluate(self, xs: &[f64], ys: &[f64], params: &TortuosityParams) -> Result<f64> {
        match self {
            Self::LinearRegression => {
                linear::linear_regression_tortuosity(xs, ys, params.sampling_size)
            }
            Self::DistanceMeasure => distance::distance_measure_tortuosity(xs, ys),
            Self::DistanceInflectionCount => {
                distance::distance_inflection_count_tortuosity(xs, ys)
            }
            Self::SquaredCurvature => curvature::squared_curvature_tortuosity(xs, ys),
            Self::Density => distance::tortuosity_density(xs, ys),
            Self::FractalCurve => fractal::fractal_tortuosity_curve(xs, ys),
        }
    }

    /// Scores one curve, attaching the tortuous/straight call for estimators
    /// that have a threshold.
    ///
    /// Linear regression is tortuous below `r2_threshold`. The distance,
    /// inflection-count, curvature and density estimators are tortuous above
    /// their optional threshold. The fractal estimator is never classified.
    pub fn score(
        self,
        xs: &[f64],
        ys: &[f64],
        params: &TortuosityParams,
    ) -> Result<TortuosityScore> {
        let value = self.evaluate(xs, ys, params)?;
        let tortuous = match self {
            Self::LinearRegression => Some(value < params.r2_threshold),
            _ => params.upper_threshold(self).map(|t| value > t),
        };
        Ok(TortuosityScore {
            estimator: self,
            value,
            tortuous,
        })
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TortuosityScore {
    pub estimator: Estimator,
    pub value: f64,
    pub tortuous: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::Estimator;
    use crate::{TortuosityError, TortuosityParams};

    #[test]
    fn only_linear_regression_classifies() {
        let xs: Vec<f64> = (1..=7).map(f64::from).collect();
        let ys = xs.clone();
        let params = TortuosityParams::default();

        for estimator in Estimator::ALL {
            let score = estimator.score(&xs, &ys, &params).expect("long enough");
            assert_eq!(score.estimator, estimator);
            match estimator {
                Estimator::LinearRegression => {
                    assert_eq!(score.value, 1.0);
                    assert_eq!(score.tortuous, Some(false));
                }
                _ => assert_eq!(score.tortuous, None),
            }
        }
    }

    #[test]
    fn upper_thresholds_classify_above() {
        // Zigzag with density 2/3 and arc/chord sqrt(2).
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 1.0, 0.0, 1.0, 0.0];

        let strict = TortuosityParams {
            density_threshold: Some(0.5),
            ..TortuosityParams::default()
        };
        let score = Estimator::Density
            .score(&xs, &ys, &strict)
            .expect("long enough");
        assert!((score.value - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(score.tortuous, Some(true));

        let loose = TortuosityParams {
            density_threshold: Some(0.9),
            ..TortuosityParams::default()
        };
        let score = Estimator::Density.score(&xs, &ys, &loose).expect("long enough");
        assert_eq!(score.tortuous, Some(false));

        let all = TortuosityParams {
            distance_threshold: Some(1.1),
            inflection_count_threshold: Some(1.1),
            curvature_threshold: Some(0.1),
            density_threshold: Some(0.1),
            ..TortuosityParams::default()
        };
        for estimator in Estimator::ALL {
            let score = estimator.score(&xs, &ys, &all).expect("long enough");
            match estimator {
                Estimator::FractalCurve => assert_eq!(score.tortuous, None),
                Estimator::LinearRegression => assert!(score.tortuous.is_some()),
                _ => assert_eq!(score.tortuous, Some(true), "{estimator}"),
            }
        }
    }

    #[test]
    fn length_errors_name_the_estimator() {
        let err = Estimator::SquaredCurvature
            .evaluate(&[1.0, 2.0], &[1.0, 2.0], &TortuosityParams::default())
            .expect_err("too short");
        assert_eq!(
            err,
            TortuosityError::InvalidCurveLength {
                estimator: Estimator::SquaredCurvature,
                required: 3,
                actual: 2,
            }
        );
        assert_eq!(
            err.to_string(),
            "squared_curvature needs at least 3 points, got 2"
        );
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Estimator::ALL.iter().map(|e| e.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Estimator::ALL.len());
    }
}
