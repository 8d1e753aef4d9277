//! Vessel skeleton tracing.
//!
//! Turns a binary skeleton image (1-pixel-wide vessel centerlines, non-zero
//! pixels are vessel) into one [`VesselCurve`] per 8-connected component:
//! - Seeds are scanned row-major, skipping a configurable border margin.
//! - Each seed is grown breadth-first over all 8 neighbors, in the fixed
//!   order top-left, top, top-right, left, right, bottom-left, bottom,
//!   bottom-right.
//! - Visited pixels are recorded in a [`VisitMask`]; the input image is
//!   never modified.
//!
//! Each curve keeps its raw pixels and a row-sorted projection with one
//! point per row, which is what the tortuosity estimators consume.

mod curve;
mod trace;

pub use curve::VesselCurve;
pub use trace::{TraceConfig, VisitMask, extract_vessels, trace_vessels};
