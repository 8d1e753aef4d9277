use thiserror::Error;

use crate::metric::Estimator;

/// Caller-visible estimator failures.
///
/// Degenerate geometry (vertical chords, zero denominators) is not an error;
/// each estimator maps it to a fixed fallback value instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TortuosityError {
    #[error("{estimator} needs at least {required} points, got {actual}")]
    InvalidCurveLength {
        estimator: Estimator,
        required: usize,
        actual: usize,
    },

    #[error("coordinate length mismatch: {xs} x values vs {ys} y values")]
    LengthMismatch { xs: usize, ys: usize },

    #[error("coordinate {index} is not finite")]
    NonFiniteCoordinate { index: usize },

    #[error("curve spans {span_x}x{span_y} pixels, canvas side is limited to {max_side}")]
    CanvasTooLarge {
        span_x: usize,
        span_y: usize,
        max_side: usize,
    },
}

pub type Result<T, E = TortuosityError> = std::result::Result<T, E>;

pub(crate) fn check_curve(
    estimator: Estimator,
    xs: &[f64],
    ys: &[f64],
    required: usize,
) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(TortuosityError::LengthMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if xs.len() < required {
        return Err(TortuosityError::InvalidCurveLength {
            estimator,
            required,
            actual: xs.len(),
        });
    }
    Ok(())
}
