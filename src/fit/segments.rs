//! Two-segment orchestration: independent fits of the pre- and
//! post-mitigation regimes.

use crate::domain::{CurveParams, LaunchConfig, Segment, TwoSegmentFit};
use crate::fit::bounds::FitBounds;
use crate::fit::fitter::{fit_segment, FitOptions};

/// Fit both regimes of a split series.
///
/// The segments share nothing mutable, so they run in parallel via
/// `rayon::join`. Each side carries its own bounds and initial guess; the
/// launch time is shared (pinned to the series start). A failure on one side
/// never suppresses the other side's result.
#[allow(clippy::too_many_arguments)]
pub fn fit_two_segments(
    pre: &Segment,
    post: &Segment,
    bounds_pre: &FitBounds,
    bounds_post: &FitBounds,
    p0_pre: CurveParams,
    p0_post: CurveParams,
    launch: &LaunchConfig,
    options: &FitOptions,
) -> TwoSegmentFit {
    let (pre_fit, post_fit) = rayon::join(
        || fit_segment(pre, bounds_pre, p0_pre, launch, options),
        || fit_segment(post, bounds_post, p0_post, launch, options),
    );
    TwoSegmentFit {
        pre: pre_fit,
        post: post_fit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FitError;
    use crate::model::evaluate_indexed;
    use crate::time::DAILY_INTERVAL;

    fn segment(truth: CurveParams, launch: f64, start_day: usize, days: usize) -> Segment {
        let times: Vec<f64> = (start_day..start_day + days)
            .map(|i| launch + i as f64 * DAILY_INTERVAL)
            .collect();
        let values = evaluate_indexed(&times, &truth, launch).unwrap();
        Segment { times, values }
    }

    fn truth_pre() -> CurveParams {
        CurveParams {
            initial_value: 20.0,
            final_value: 400_000.0,
            curve_type: 2.0,
            time_to_peak: 1.0,
            time_in_lag: 0.3,
        }
    }

    fn truth_post() -> CurveParams {
        CurveParams {
            initial_value: 20.0,
            final_value: 160_000.0,
            curve_type: 4.0,
            time_to_peak: 0.7,
            time_in_lag: 0.2,
        }
    }

    #[test]
    fn both_segments_fit_independently() {
        let launch = 2020.0;
        let pre = segment(truth_pre(), launch, 0, 50);
        let post = segment(truth_post(), launch, 50, 70);

        let out = fit_two_segments(
            &pre,
            &post,
            &FitBounds::pre_mitigation(),
            &FitBounds::post_mitigation(),
            truth_pre(),
            truth_post(),
            &LaunchConfig::from_index(launch).unwrap(),
            &FitOptions::default(),
        );

        let pre_fit = out.pre.unwrap();
        let post_fit = out.post.unwrap();
        assert!(pre_fit.quality.sse.is_finite());
        assert!(post_fit.params.final_value >= 100_000.0);
    }

    #[test]
    fn one_failing_segment_does_not_suppress_the_other() {
        let launch = 2020.0;
        let pre = segment(truth_pre(), launch, 0, 50);
        let post = segment(truth_post(), launch, 50, 70);

        // Pre-side guess is outside its box; the post side must still fit.
        let mut bad_guess = truth_pre();
        bad_guess.curve_type = 50.0;

        let out = fit_two_segments(
            &pre,
            &post,
            &FitBounds::pre_mitigation(),
            &FitBounds::post_mitigation(),
            bad_guess,
            truth_post(),
            &LaunchConfig::from_index(launch).unwrap(),
            &FitOptions::default(),
        );

        assert!(matches!(out.pre, Err(FitError::FitConvergence(_))));
        assert!(out.post.is_ok());
    }
}
