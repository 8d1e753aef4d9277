use crate::metric::Estimator;

/// Estimator parameters, passed explicitly to every scoring call.
#[derive(Debug, Clone, PartialEq)]
pub struct TortuosityParams {
    /// Approximate number of interior samples used by the linear-regression
    /// estimator. The sampling stride is `ceil(n / sampling_size)`.
    pub sampling_size: usize,
    /// A vessel whose R² falls below this value is classified as tortuous.
    pub r2_threshold: f64,
    /// Vessels with this many projected points or fewer are not scored.
    pub min_pixels_per_vessel: usize,
    /// Optional cut-offs for the arc/chord family and the curvature integral.
    /// A vessel scoring strictly above a set threshold is tortuous; `None`
    /// leaves that estimator unclassified.
    pub distance_threshold: Option<f64>,
    pub inflection_count_threshold: Option<f64>,
    pub curvature_threshold: Option<f64>,
    pub density_threshold: Option<f64>,
}

impl TortuosityParams {
    /// The "above means tortuous" cut-off configured for `estimator`.
    pub fn upper_threshold(&self, estimator: Estimator) -> Option<f64> {
        match estimator {
            Estimator::DistanceMeasure => self.distance_threshold,
            Estimator::DistanceInflectionCount => self.inflection_count_threshold,
            Estimator::SquaredCurvature => self.curvature_threshold,
            Estimator::Density => self.density_threshold,
            Estimator::LinearRegression | Estimator::FractalCurve => None,
        }
    }
}

impl Default for TortuosityParams {
    fn default() -> Self {
        Self {
            sampling_size: 6,
            r2_threshold: 0.80,
            min_pixels_per_vessel: 6,
            distance_threshold: None,
            inflection_count_threshold: None,
            curvature_threshold: None,
            density_threshold: None,
        }
    }
}
