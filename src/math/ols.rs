//! Dense least-squares helpers for small design matrices.
//!
//! The unweighted straight-line fit builds an `n × 2` design matrix `[1, x]`
//! and needs two things from it:
//!
//! ```text
//! β   = argmin ||y - X β||²
//! cov = s² (XᵀX)⁻¹
//! ```
//!
//! The solve goes through SVD because `X` is tall (more rows than columns);
//! nalgebra's `QR::solve` only handles square systems.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() != y.len() || x.nrows() < x.ncols() {
        return None;
    }

    let svd = x.clone().svd(true, true);
    let beta = svd.solve(y, 1e-12).ok()?;
    beta.iter().all(|v| v.is_finite()).then_some(beta)
}

/// Inverse of the normal matrix `XᵀX`, or `None` when it is singular.
pub fn normal_matrix_inverse(x: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let xtx = x.transpose() * x;
    let inv = xtx.try_inverse()?;
    inv.iter().all(|v| v.is_finite()).then_some(inv)
}

/// Design matrix `[1, x_i]` for a straight line.
pub fn line_design(x: &[f64]) -> DMatrix<f64> {
    DMatrix::from_fn(x.len(), 2, |i, j| if j == 0 { 1.0 } else { x[i] })
}
