//! Box-constrained Levenberg–Marquardt fit of the transition curve to one
//! observed segment.
//!
//! The loop is a damped Gauss–Newton iteration with Marquardt diagonal
//! scaling and projection onto the bound box:
//!
//! - the Jacobian of the model predictions is taken by forward differences
//!   (backward at a bound edge)
//! - each damped step is solved as an augmented least-squares system
//! - a trial point where the curve model is degenerate counts as infeasible:
//!   the step is rejected and the damping increased
//!
//! Failure is reported per segment. The only hard failures are a malformed
//! bound box, an initial guess outside it, and residuals that are undefined
//! at the initial point (e.g. `time_to_peak = 0` with a nonzero S-shape
//! weight). A search that merely stalls returns the best point found.

use nalgebra::{DMatrix, DVector};

use crate::domain::{CurveParams, FitQuality, LaunchConfig, Segment, SegmentFit, PARAM_COUNT};
use crate::error::FitError;
use crate::fit::bounds::FitBounds;
use crate::math::{covariance, solve_damped_step};
use crate::model::evaluate_indexed;

/// Optimizer knobs. The defaults are adequate for daily case-count series;
/// callers only ever need to touch these for pathological data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Cap on outer (Jacobian) iterations.
    pub max_iterations: usize,
    /// Relative SSE decrease below which the fit counts as converged.
    pub ftol: f64,
    /// Relative step size below which the fit counts as converged.
    pub xtol: f64,
    /// Initial damping factor.
    pub lambda_init: f64,
    /// Damping ceiling; reaching it means no acceptable step exists.
    pub lambda_max: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            max_iterations: 100,
            ftol: 1e-10,
            xtol: 1e-10,
            lambda_init: 1e-3,
            lambda_max: 1e12,
        }
    }
}

/// Fit the transition curve to one segment by bounded nonlinear least
/// squares. The caller supplies the initial guess; there is no default-guess
/// heuristic.
pub fn fit_segment(
    segment: &Segment,
    bounds: &FitBounds,
    p0: CurveParams,
    launch: &LaunchConfig,
    options: &FitOptions,
) -> Result<SegmentFit, FitError> {
    bounds.validate()?;
    let p0 = p0.to_array();
    bounds.check_initial(&p0)?;
    if segment.is_empty() {
        return Err(FitError::fit_convergence("cannot fit an empty segment"));
    }

    let n = segment.len();
    let launch_index = launch.index();
    let residuals = |p: &[f64; PARAM_COUNT]| -> Result<DVector<f64>, FitError> {
        let fitted = evaluate_indexed(&segment.times, &CurveParams::from_array(*p), launch_index)?;
        Ok(DVector::from_iterator(
            n,
            segment.values.iter().zip(fitted).map(|(y, f)| y - f),
        ))
    };

    let mut p = p0;
    let mut r = residuals(&p).map_err(|e| {
        FitError::fit_convergence(format!("residuals undefined at the initial guess: {e}"))
    })?;
    let mut sse = r.norm_squared();
    if !sse.is_finite() {
        return Err(FitError::fit_convergence(
            "non-finite residuals at the initial guess",
        ));
    }

    let mut lambda = options.lambda_init;
    let mut iterations = 0;

    for _ in 0..options.max_iterations {
        iterations += 1;

        let jac = model_jacobian(&residuals, &p, &r, bounds).map_err(|e| {
            FitError::fit_convergence(format!("jacobian undefined near the current point: {e}"))
        })?;

        // Marquardt scaling: damp each column by its own norm so parameters
        // of very different magnitude (levels vs. durations) step sensibly.
        let scale = DVector::from_iterator(
            PARAM_COUNT,
            (0..PARAM_COUNT).map(|c| jac.column(c).norm().max(1e-8)),
        );

        let mut accepted = false;
        let mut converged = false;
        while lambda <= options.lambda_max {
            let Some(delta) = solve_damped_step(&jac, &r, lambda, &scale) else {
                lambda *= 10.0;
                continue;
            };

            let mut trial = p;
            for i in 0..PARAM_COUNT {
                trial[i] += delta[i];
            }
            bounds.project(&mut trial);

            let trial_r = match residuals(&trial) {
                Ok(v) => v,
                Err(_) => {
                    // Degenerate curve at the trial point: infeasible step.
                    lambda *= 10.0;
                    continue;
                }
            };
            let trial_sse = trial_r.norm_squared();
            if !trial_sse.is_finite() || trial_sse > sse {
                lambda *= 10.0;
                continue;
            }

            let step_norm: f64 = (0..PARAM_COUNT)
                .map(|i| (trial[i] - p[i]).powi(2))
                .sum::<f64>()
                .sqrt();
            let point_norm: f64 = p.iter().map(|v| v * v).sum::<f64>().sqrt();
            let drop = sse - trial_sse;

            p = trial;
            r = trial_r;
            sse = trial_sse;
            lambda = (lambda * 0.1).max(1e-12);
            accepted = true;

            if drop <= options.ftol * sse.max(f64::MIN_POSITIVE)
                || step_norm <= options.xtol * (1.0 + point_norm)
            {
                converged = true;
            }
            break;
        }

        if !accepted || converged {
            break;
        }
    }

    // Covariance at the solution; a degenerate Jacobian here just yields no
    // covariance, not a fit failure.
    let cov = match model_jacobian(&residuals, &p, &r, bounds) {
        Ok(jac) => covariance(&jac, sse, n, PARAM_COUNT),
        Err(_) => None,
    };

    Ok(SegmentFit {
        params: CurveParams::from_array(p),
        covariance: cov,
        quality: FitQuality {
            sse,
            rmse: (sse / n as f64).sqrt(),
            n,
            iterations,
        },
    })
}

/// Forward-difference Jacobian of the model predictions.
///
/// Residuals are `y - f(p)`, so each column is `-(r(p+h) - r(p)) / h`. The
/// step direction flips at the upper bound, and once more if the perturbed
/// point turns out degenerate.
fn model_jacobian<F>(
    residuals: &F,
    p: &[f64; PARAM_COUNT],
    r0: &DVector<f64>,
    bounds: &FitBounds,
) -> Result<DMatrix<f64>, FitError>
where
    F: Fn(&[f64; PARAM_COUNT]) -> Result<DVector<f64>, FitError>,
{
    let n = r0.len();
    let mut jac = DMatrix::<f64>::zeros(n, PARAM_COUNT);

    for col in 0..PARAM_COUNT {
        let mut h = f64::EPSILON.sqrt() * p[col].abs().max(1.0);
        if p[col] + h > bounds.upper[col] {
            h = -h;
        }

        let mut perturbed = *p;
        perturbed[col] += h;
        let rh = match residuals(&perturbed) {
            Ok(v) => v,
            Err(_) => {
                h = -h;
                perturbed = *p;
                perturbed[col] += h;
                residuals(&perturbed)?
            }
        };

        for row in 0..n {
            jac[(row, col)] = -(rh[row] - r0[row]) / h;
        }
    }

    Ok(jac)
}
