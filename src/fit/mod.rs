//! Bounded curve fitting.
//!
//! Responsibilities:
//!
//! - box constraints with pre/post-mitigation presets
//! - the Levenberg–Marquardt segment fitter
//! - the two-segment orchestration (independent, parallel fits)

pub mod bounds;
pub mod fitter;
pub mod segments;

pub use bounds::*;
pub use fitter::*;
pub use segments::*;
