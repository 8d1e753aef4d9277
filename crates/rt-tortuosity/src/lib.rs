//! Tortuosity estimators for traced vessel curves.
//!
//! Every estimator takes a curve as two equal-length coordinate slices
//! `xs`, `ys`, normally the row-sorted projection of a
//! [`rt_trace::VesselCurve`] (`x = row`, `y = col`, one point per row).
//!
//! | estimator | min points | straight curve |
//! |---|---|---|
//! | [`linear_regression_tortuosity`] | 4 | R² = 1 |
//! | [`distance_measure_tortuosity`] | 2 | 1 |
//! | [`distance_inflection_count_tortuosity`] | 2 | 1 |
//! | [`squared_curvature_tortuosity`] | 3 | 0 |
//! | [`tortuosity_density`] | 2 | 0 |
//! | [`fractal_tortuosity_curve`] | 1 | ~1 |
//!
//! Too-short curves are rejected with [`TortuosityError::InvalidCurveLength`].
//! Degenerate geometry (vertical chords, closed curves, stationary points)
//! maps to fixed fallback values and never fails.
//!
//! [`score_vessels`] runs all of them over a traced image and
//! [`ImageSummary`] aggregates the result.

pub mod curvature;
pub mod distance;
mod error;
pub mod fractal;
pub mod linear;
mod metric;
pub mod numeric;
mod params;
mod score;

pub use curvature::squared_curvature_tortuosity;
pub use distance::{
    distance_inflection_count_tortuosity, distance_measure_tortuosity, tortuosity_density,
};
pub use error::{Result, TortuosityError};
pub use fractal::{fractal_dimension, fractal_tortuosity_curve, rasterize_curve};
pub use linear::linear_regression_tortuosity;
pub use metric::{Estimator, TortuosityScore};
pub use numeric::{arc_length, chord_length, inflection_points};
pub use params::TortuosityParams;
pub use score::{ImageSummary, VesselScores, score_vessel, score_vessels};
