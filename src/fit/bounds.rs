//! Box constraints on the free parameter vector.
//!
//! The bounds encode physical meaning: levels cannot be negative,
//! the blend knob lives in `[0, 10]`, the peak time is at most two years and
//! the lag phase at most 1.8 years. The post-mitigation preset raises the
//! `final_value` floor to 100 000 — confirmed counts cannot shrink below the
//! pre-mitigation level once mitigation begins.
//!
//! Bounds are explicit values passed into the fitter; there is no
//! process-wide bound state.

use serde::{Deserialize, Serialize};

use crate::domain::{CurveParams, PARAM_COUNT};
use crate::error::FitError;

/// `final_value` floor for the post-mitigation segment.
pub const POST_MITIGATION_FINAL_FLOOR: f64 = 100_000.0;

/// Lower/upper box on `[initial_value, final_value, curve_type,
/// time_to_peak, time_in_lag]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitBounds {
    pub lower: [f64; PARAM_COUNT],
    pub upper: [f64; PARAM_COUNT],
}

impl FitBounds {
    pub fn new(lower: [f64; PARAM_COUNT], upper: [f64; PARAM_COUNT]) -> Self {
        FitBounds { lower, upper }
    }

    /// Bounds for the segment before the mitigation date.
    pub fn pre_mitigation() -> Self {
        FitBounds {
            lower: [0.0, 0.0, 0.0, 0.0, 0.0],
            upper: [99_999.0, 9_999_999.0, 10.0, 2.0, 1.8],
        }
    }

    /// Bounds for the segment from the mitigation date onward: identical to
    /// the pre-mitigation box except for the raised `final_value` floor.
    pub fn post_mitigation() -> Self {
        let mut bounds = Self::pre_mitigation();
        bounds.lower[1] = POST_MITIGATION_FINAL_FLOOR;
        bounds
    }

    /// Check the box itself is well formed.
    pub fn validate(&self) -> Result<(), FitError> {
        for i in 0..PARAM_COUNT {
            if self.lower[i].is_nan() || self.upper[i].is_nan() {
                return Err(FitError::fit_convergence(format!(
                    "bound on {} is NaN",
                    CurveParams::names()[i]
                )));
            }
            if self.lower[i] > self.upper[i] {
                return Err(FitError::fit_convergence(format!(
                    "lower bound {} exceeds upper bound {} for {}",
                    self.lower[i],
                    self.upper[i],
                    CurveParams::names()[i]
                )));
            }
        }
        Ok(())
    }

    /// Check the initial guess sits inside the box.
    pub fn check_initial(&self, p0: &[f64; PARAM_COUNT]) -> Result<(), FitError> {
        for i in 0..PARAM_COUNT {
            if !p0[i].is_finite() || p0[i] < self.lower[i] || p0[i] > self.upper[i] {
                return Err(FitError::fit_convergence(format!(
                    "initial guess {}={} outside bounds [{}, {}]",
                    CurveParams::names()[i],
                    p0[i],
                    self.lower[i],
                    self.upper[i]
                )));
            }
        }
        Ok(())
    }

    /// Project a candidate point onto the box.
    pub fn project(&self, p: &mut [f64; PARAM_COUNT]) {
        for i in 0..PARAM_COUNT {
            p[i] = p[i].clamp(self.lower[i], self.upper[i]);
        }
    }

    pub fn contains(&self, p: &[f64; PARAM_COUNT]) -> bool {
        (0..PARAM_COUNT).all(|i| p[i] >= self.lower[i] && p[i] <= self.upper[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_only_in_final_value_floor() {
        let pre = FitBounds::pre_mitigation();
        let post = FitBounds::post_mitigation();
        assert_eq!(pre.upper, post.upper);
        assert_eq!(pre.lower[0], post.lower[0]);
        assert_eq!(post.lower[1], POST_MITIGATION_FINAL_FLOOR);
        assert_eq!(pre.lower[1], 0.0);
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let bounds = FitBounds::new([0.0; 5], [-1.0, 1.0, 1.0, 1.0, 1.0]);
        assert!(bounds.validate().is_err());
        assert!(FitBounds::pre_mitigation().validate().is_ok());
    }

    #[test]
    fn check_initial_rejects_out_of_box_guess() {
        let bounds = FitBounds::pre_mitigation();
        let mut p0 = [10.0, 1000.0, 5.0, 1.0, 0.5];
        assert!(bounds.check_initial(&p0).is_ok());
        p0[2] = 11.0;
        assert!(bounds.check_initial(&p0).is_err());
        p0[2] = f64::NAN;
        assert!(bounds.check_initial(&p0).is_err());
    }

    #[test]
    fn project_clamps_to_box() {
        let bounds = FitBounds::pre_mitigation();
        let mut p = [-5.0, 1e9, 12.0, 1.0, 0.5];
        bounds.project(&mut p);
        assert!(bounds.contains(&p));
        assert_eq!(p[0], 0.0);
        assert_eq!(p[1], 9_999_999.0);
        assert_eq!(p[2], 10.0);
    }
}
