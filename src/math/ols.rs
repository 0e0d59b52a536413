//! Linear least-squares kernels.
//!
//! The Levenberg–Marquardt fitter repeatedly solves small linear problems:
//! the damped step
//!
//! ```text
//! minimize ||J δ - r||² + λ ||D δ||²
//! ```
//!
//! posed as an augmented least-squares system, and a pseudo-inverse of `JᵀJ`
//! for the covariance estimate at the solution.
//!
//! Implementation choices:
//! - We solve via SVD so tall systems and near-rank-deficient Jacobians
//!   (e.g. a blend weight of zero making one column vanish) are handled
//!   without panics. The parameter dimension is 5, so SVD cost is negligible.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails. Steep
    // transition curves can make Jacobian columns nearly collinear, so we
    // balance numerical stability against solution acceptance.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve one damped (Marquardt-scaled) step `δ` of a least-squares iteration.
///
/// `scale` carries the per-column damping weights `D` (typically the column
/// norms of `J`), appended as `sqrt(λ) D` rows below `J`.
pub fn solve_damped_step(
    j: &DMatrix<f64>,
    r: &DVector<f64>,
    lambda: f64,
    scale: &DVector<f64>,
) -> Option<DVector<f64>> {
    let n = j.nrows();
    let k = j.ncols();
    debug_assert_eq!(scale.len(), k);

    let mut aug = DMatrix::<f64>::zeros(n + k, k);
    aug.view_mut((0, 0), (n, k)).copy_from(j);
    let sqrt_lambda = lambda.sqrt();
    for col in 0..k {
        aug[(n + col, col)] = sqrt_lambda * scale[col];
    }

    let mut rhs = DVector::<f64>::zeros(n + k);
    rhs.rows_mut(0, n).copy_from(r);

    solve_least_squares(&aug, &rhs)
}

/// Covariance estimate `(JᵀJ)⁻¹ · SSE/(n-k)` at the solution.
///
/// Returns `None` when the fit is underdetermined (`n <= k`) or `JᵀJ` has no
/// usable pseudo-inverse.
pub fn covariance(j: &DMatrix<f64>, sse: f64, n: usize, k: usize) -> Option<Vec<Vec<f64>>> {
    if n <= k {
        return None;
    }
    let jtj = j.transpose() * j;
    let pinv = jtj.pseudo_inverse(1e-12).ok()?;
    if pinv.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let s2 = sse / (n - k) as f64;
    Some(
        (0..k)
            .map(|row| (0..k).map(|col| pinv[(row, col)] * s2).collect())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn damped_step_with_zero_lambda_is_gauss_newton() {
        let j = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let r = DVector::from_row_slice(&[2.0, 5.0, 8.0]);
        let scale = DVector::from_row_slice(&[1.0, 1.0]);

        let plain = solve_least_squares(&j, &r).unwrap();
        let damped = solve_damped_step(&j, &r, 0.0, &scale).unwrap();
        assert!((plain - damped).norm() < 1e-10);
    }

    #[test]
    fn heavy_damping_shrinks_the_step() {
        let j = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let r = DVector::from_row_slice(&[2.0, 5.0, 8.0]);
        let scale = DVector::from_row_slice(&[1.0, 1.0]);

        let light = solve_damped_step(&j, &r, 1e-6, &scale).unwrap();
        let heavy = solve_damped_step(&j, &r, 1e6, &scale).unwrap();
        assert!(heavy.norm() < light.norm());
    }

    #[test]
    fn covariance_requires_overdetermination() {
        let j = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        assert!(covariance(&j, 1.0, 2, 2).is_none());

        let j = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let cov = covariance(&j, 0.5, 3, 2).unwrap();
        assert_eq!(cov.len(), 2);
        assert_eq!(cov[0].len(), 2);
        assert!(cov[0][0].is_finite());
    }
}
