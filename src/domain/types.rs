//! Shared domain types.
//!
//! These are intentionally lightweight value types, serializable where a
//! caller would plausibly export them (fitted parameters, fit quality) so
//! results can be written to JSON and reloaded later for plotting or
//! comparisons. Nothing here owns state across fit calls.

use serde::{Deserialize, Serialize};

use crate::error::FitError;
use crate::time::{to_indices, TimePoint};

/// Number of free parameters in a segment fit.
pub const PARAM_COUNT: usize = 5;

/// Shape parameters of the transition curve.
///
/// The launch time is deliberately not part of this struct: it is pinned per
/// segment via [`LaunchConfig`] and never varied by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Asymptotic starting level of the modeled quantity.
    pub initial_value: f64,
    /// Asymptotic terminal level.
    pub final_value: f64,
    /// Blend knob in `[0, 10]`: 0 = pure S-shape, 10 = pure rapid.
    pub curve_type: f64,
    /// Duration (fractional years) from launch until the terminal level is
    /// reached. Negative values mean the process is inactive.
    pub time_to_peak: f64,
    /// Width of the S-shape lag phase; 0 is a sentinel meaning
    /// "derive as `time_to_peak / 4`".
    pub time_in_lag: f64,
}

impl CurveParams {
    /// Free-vector layout used by the fitter and bounds:
    /// `[initial_value, final_value, curve_type, time_to_peak, time_in_lag]`.
    pub fn to_array(self) -> [f64; PARAM_COUNT] {
        [
            self.initial_value,
            self.final_value,
            self.curve_type,
            self.time_to_peak,
            self.time_in_lag,
        ]
    }

    pub fn from_array(p: [f64; PARAM_COUNT]) -> Self {
        CurveParams {
            initial_value: p[0],
            final_value: p[1],
            curve_type: p[2],
            time_to_peak: p[3],
            time_in_lag: p[4],
        }
    }

    /// Parameter names in free-vector order (for reports and diagnostics).
    pub fn names() -> [&'static str; PARAM_COUNT] {
        [
            "initial_value",
            "final_value",
            "curve_type",
            "time_to_peak",
            "time_in_lag",
        ]
    }
}

/// Launch time bound once per segment and shared by every evaluation.
///
/// Replaces positional partial application of the launch date: the fitter and
/// evaluator both take this explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    launch: f64,
}

impl LaunchConfig {
    /// Bind a launch time from any time point (date or index).
    pub fn new(launch: TimePoint) -> Result<Self, FitError> {
        Ok(LaunchConfig {
            launch: launch.to_index()?,
        })
    }

    /// Bind a launch time from a pre-normalized fractional-year index.
    pub fn from_index(index: f64) -> Result<Self, FitError> {
        Self::new(TimePoint::Index(index))
    }

    pub fn index(&self) -> f64 {
        self.launch
    }
}

/// One regime of an observed series, already converted to the index domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Fractional-year sample times, chronological.
    pub times: Vec<f64>,
    /// Observed values, aligned 1:1 with `times`.
    pub values: Vec<f64>,
}

impl Segment {
    /// Build a segment from raw dates and observations, validating alignment,
    /// ordering, and finiteness.
    pub fn new(dates: &[TimePoint], values: &[f64]) -> Result<Self, FitError> {
        if dates.len() != values.len() {
            return Err(FitError::fit_convergence(format!(
                "invalid segment: {} dates but {} values",
                dates.len(),
                values.len()
            )));
        }
        if dates.is_empty() {
            return Err(FitError::fit_convergence("invalid segment: no observations"));
        }
        let times = to_indices(dates)?;
        if times.windows(2).any(|w| w[1] < w[0]) {
            return Err(FitError::fit_convergence(
                "invalid segment: dates must be chronological",
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FitError::fit_convergence(
                "invalid segment: non-finite observations",
            ));
        }
        Ok(Segment {
            times,
            values: values.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Split one series at the mitigation date into (pre, post) segments.
    ///
    /// Closed-open policy: the pre segment holds observations strictly before
    /// the split date, the post segment holds the split date onward.
    pub fn split_at(
        dates: &[TimePoint],
        values: &[f64],
        split: TimePoint,
    ) -> Result<(Segment, Segment), FitError> {
        if dates.len() != values.len() {
            return Err(FitError::fit_convergence(format!(
                "invalid series: {} dates but {} values",
                dates.len(),
                values.len()
            )));
        }
        let split = split.to_index()?;
        let times = to_indices(dates)?;
        if times.windows(2).any(|w| w[1] < w[0]) {
            return Err(FitError::fit_convergence(
                "invalid series: dates must be chronological",
            ));
        }
        let cut = times.partition_point(|&t| t < split);
        if cut == 0 || cut == times.len() {
            return Err(FitError::fit_convergence(
                "invalid series: mitigation date must fall strictly inside the series",
            ));
        }
        let pre = Segment {
            times: times[..cut].to_vec(),
            values: values[..cut].to_vec(),
        };
        let post = Segment {
            times: times[cut..].to_vec(),
            values: values[cut..].to_vec(),
        };
        Ok((pre, post))
    }
}

/// Fit quality diagnostics for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
    pub iterations: usize,
}

/// Fitted output for one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentFit {
    pub params: CurveParams,
    /// Covariance estimate of the free parameters, `(JᵀJ)⁻¹ · SSE/(n-k)`.
    /// `None` when the problem is underdetermined or the Jacobian is
    /// rank-deficient at the solution.
    pub covariance: Option<Vec<Vec<f64>>>,
    pub quality: FitQuality,
}

/// Result of fitting both regimes. One segment failing never suppresses the
/// other segment's outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoSegmentFit {
    pub pre: Result<SegmentFit, FitError>,
    pub post: Result<SegmentFit, FitError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(i: i64) -> TimePoint {
        TimePoint::Date(NaiveDate::from_ymd_opt(2020, 1, 22).unwrap() + chrono::Duration::days(i))
    }

    #[test]
    fn params_array_round_trip() {
        let p = CurveParams {
            initial_value: 1.0,
            final_value: 2.0,
            curve_type: 3.0,
            time_to_peak: 4.0,
            time_in_lag: 5.0,
        };
        assert_eq!(CurveParams::from_array(p.to_array()), p);
    }

    #[test]
    fn segment_rejects_misaligned_inputs() {
        let dates = [day(0), day(1)];
        assert!(Segment::new(&dates, &[1.0]).is_err());
        assert!(Segment::new(&[], &[]).is_err());
    }

    #[test]
    fn input_misuse_carries_an_invalid_prefix() {
        let err = Segment::new(&[day(0), day(1)], &[1.0]).unwrap_err();
        assert!(format!("{err}").contains("invalid segment"));

        let dates: Vec<TimePoint> = (0..5).map(day).collect();
        let err = Segment::split_at(&dates, &vec![0.0; 5], day(50)).unwrap_err();
        assert!(format!("{err}").contains("invalid series"));
    }

    #[test]
    fn segment_rejects_unordered_dates() {
        let dates = [day(3), day(1)];
        assert!(Segment::new(&dates, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn split_is_closed_open_at_the_mitigation_date() {
        let dates: Vec<TimePoint> = (0..10).map(day).collect();
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let (pre, post) = Segment::split_at(&dates, &values, day(4)).unwrap();
        assert_eq!(pre.len(), 4);
        assert_eq!(post.len(), 6);
        // The split date itself belongs to the post segment.
        assert_eq!(post.values[0], 4.0);
        assert_eq!(pre.values.last().copied(), Some(3.0));
    }

    #[test]
    fn split_rejects_out_of_range_date() {
        let dates: Vec<TimePoint> = (0..5).map(day).collect();
        let values = vec![0.0; 5];
        assert!(Segment::split_at(&dates, &values, day(-3)).is_err());
        assert!(Segment::split_at(&dates, &values, day(50)).is_err());
    }
}
