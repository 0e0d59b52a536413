//! `mitigation-curves` library crate.
//!
//! Fits a blended diffusion ("transition") curve to two regimes of a
//! cumulative case-count series, split at a known mitigation start date:
//!
//! - the curve model blends a logistic S-shape with an exponential rapid
//!   curve, both analytically integrated over the sampling interval
//! - each regime is fitted independently with box-constrained nonlinear
//!   least squares
//!
//! CSV ingestion and chart rendering are the caller's concern: this crate
//! consumes already-split `(dates, values)` segments and exposes the fitted
//! parameters plus a stateless evaluator for re-plotting or extrapolation.

pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod model;
pub mod report;
pub mod time;
