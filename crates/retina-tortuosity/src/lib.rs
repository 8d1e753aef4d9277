//! Umbrella crate for the `retina-tortuosity` workspace.
//!
//! Re-exports the image primitives, the skeleton tracer and the tortuosity
//! estimators so a single dependency covers the whole pipeline:
//! image → [`trace_vessels`] → [`score_vessels`] → [`ImageSummary`].

pub use rt_core::*;
pub use rt_tortuosity::*;
pub use rt_trace::*;
