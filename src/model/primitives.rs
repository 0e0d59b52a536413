//! Diffusion curve primitives: step, S-shape, and rapid curves.
//!
//! Each primitive returns the **interval-average** of its level curve over one
//! sampling window `[time, time + interval]`, computed from a closed-form
//! antiderivative. Pre-integrating avoids numerical quadrature inside the
//! optimizer loop and keeps sampled values exact for any interval width.
//!
//! The S-shape and rapid curves are calibrated by fixed level fractions:
//!
//! - S-shape: 15% of `dmax` at `launch + time_lag`, 98% at `launch + time_to_peak`
//! - rapid: 98% of `dmax` at `launch + time_to_peak`
//!
//! Numerical notes:
//! - `log(1 + exp(u))` is evaluated in softplus form to avoid overflow for
//!   large `u`.
//! - the integration window is clamped to start no earlier than `launch`, so
//!   fully pre-launch windows integrate to exactly zero.
//! - `interval <= 0` is unsupported and reported as a degenerate-curve error;
//!   there is no defined zero-width semantics.

use crate::error::FitError;

/// Level fraction reached at the end of the lag phase (S-shape calibration).
pub const LAG_LEVEL: f64 = 0.15;

/// Level fraction reached at the peak time (both curve calibrations).
pub const PEAK_LEVEL: f64 = 0.98;

fn check_interval(interval: f64) -> Result<(), FitError> {
    if interval.is_finite() && interval > 0.0 {
        Ok(())
    } else {
        Err(FitError::degenerate_curve(format!(
            "sampling interval must be finite and positive, got {interval}"
        )))
    }
}

/// Numerically stable `ln(1 + exp(u))`.
fn softplus(u: f64) -> f64 {
    u.max(0.0) + (-u.abs()).exp().ln_1p()
}

/// Interval-average of an instantaneous jump from `start` to `end` at `launch`.
///
/// Used as the fallback for degenerate peak times. Branches:
/// - window entirely before the jump: `start * interval`
/// - window entirely after the jump: `end * interval`
/// - jump inside the window: blend weighted by the pre-jump fraction
pub fn step_average(
    start: f64,
    end: f64,
    launch: f64,
    time: f64,
    interval: f64,
) -> Result<f64, FitError> {
    check_interval(interval)?;
    if time + interval <= launch {
        Ok(start * interval)
    } else if time >= launch {
        Ok(end * interval)
    } else {
        let w = (launch - time) / interval;
        Ok(w * start + (1.0 - w) * end)
    }
}

/// Interval-average of the logistic S-shape curve.
///
/// The curve is `dmax / (1 + exp(con + slo * (t - launch)))`, with `con` and
/// `slo` solved in closed form from the two calibration conditions (15% at
/// `time_lag`, 98% at `time_to_peak`). The average over the clamped window is
/// taken from the `u - ln(1 + exp(u))` antiderivative.
///
/// Degenerate cases: `time_to_peak == time_lag` with a negative peak time
/// clamps to a step at `launch`; a zero peak time (or a non-negative peak time
/// equal to the lag) leaves the calibration division-by-zero undefined and is
/// reported as a degenerate-curve error.
pub fn s_shape_average(
    dmax: f64,
    time_to_peak: f64,
    time_lag: f64,
    launch: f64,
    time: f64,
    interval: f64,
) -> Result<f64, FitError> {
    check_interval(interval)?;

    if time_to_peak == time_lag || time_to_peak == 0.0 {
        if time_to_peak < 0.0 {
            // Clamped peak time of zero: the whole transition collapses into
            // an instantaneous jump at launch.
            return step_average(0.0, dmax, launch, time, interval);
        }
        return Err(FitError::degenerate_curve(format!(
            "s-shape calibration undefined for time_to_peak={time_to_peak} with time_lag={time_lag}"
        )));
    }

    // Logits of the two calibration levels.
    let lag_logit = (1.0 / LAG_LEVEL - 1.0).ln();
    let peak_logit = (1.0 / PEAK_LEVEL - 1.0).ln();

    let slo = (peak_logit - lag_logit) / (time_to_peak - time_lag);
    let con = lag_logit - slo * time_lag;

    let lower = time.max(launch);
    let upper = (time + interval).max(launch);

    let anti = |x: f64| {
        let u = con + slo * (x - launch);
        dmax / slo * (u - softplus(u))
    };

    Ok((anti(upper) - anti(lower)) / interval)
}

/// Interval-average of the exponential-approach ("rapid") curve.
///
/// The curve is `dmax * (1 - exp(-slo * (t - launch)))` with
/// `slo = -ln(1 - PEAK_LEVEL) / time_to_peak`, so it reaches 98% of `dmax`
/// at the peak time. A non-positive peak time falls back to a step at launch.
pub fn rapid_average(
    dmax: f64,
    time_to_peak: f64,
    launch: f64,
    time: f64,
    interval: f64,
) -> Result<f64, FitError> {
    check_interval(interval)?;

    if time_to_peak <= 0.0 {
        return step_average(0.0, dmax, launch, time, interval);
    }

    let slo = -(1.0 - PEAK_LEVEL).ln() / time_to_peak;

    let lower = time.max(launch);
    let upper = (time + interval).max(launch);

    // The clamped window keeps `x - launch >= 0`, so the exponent never
    // overflows. Working launch-relative keeps the linear term small and
    // avoids cancellation on absolute fractional-year values.
    let anti = |x: f64| {
        let dx = x - launch;
        dmax * (dx + (-(slo * dx)).exp() / slo)
    };

    Ok((anti(upper) - anti(lower)) / interval)
}
