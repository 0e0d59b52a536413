//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - transition curve parameters (`CurveParams`) and the per-segment launch
//!   context (`LaunchConfig`)
//! - observed segments (`Segment`) and the mitigation-date split
//! - fit outputs (`SegmentFit`, `FitQuality`, `TwoSegmentFit`)

pub mod types;

pub use types::*;
