//! Unweighted straight-line fit (spreadsheet `LINEST` style).
//!
//! Used when a dataset carries no per-point uncertainties. The scatter of the
//! residuals stands in for the missing sigmas:
//!
//! ```text
//! s² = Σ (y_i - a - b*x_i)² / (n - 2)
//! ```
//!
//! and the parameter errors come from `s² (XᵀX)⁻¹`. With only two points the
//! line is exact and `s` is reported as 0.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::fit::weighted::{FitError, Series, ensure_finite, ensure_finite_fields};
use crate::math::{line_design, normal_matrix_inverse, solve_least_squares};

/// Unweighted fit parameters and residual-based uncertainties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrdinaryFit {
    pub intercept: f64,
    pub slope: f64,
    pub sigma_intercept: f64,
    pub sigma_slope: f64,
    /// Standard deviation of the residuals (n - 2 degrees of freedom).
    pub residual_sigma: f64,
}

impl OrdinaryFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit `y = a + b*x` by ordinary least squares.
pub fn fit_ordinary(x: &[f64], y: &[f64]) -> Result<OrdinaryFit, FitError> {
    ensure_finite(Series::X, x)?;
    ensure_finite(Series::Y, y)?;

    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
            sigma: x.len(),
        });
    }

    let n = x.len();
    if n < 2 {
        return Err(FitError::InsufficientData { n });
    }
    if x.iter().all(|&v| v == x[0]) {
        return Err(FitError::DegenerateAbscissa);
    }

    let design = line_design(x);
    let rhs = DVector::from_column_slice(y);
    let beta = solve_least_squares(&design, &rhs).ok_or(FitError::DegenerateAbscissa)?;
    let cov_unscaled = normal_matrix_inverse(&design).ok_or(FitError::DegenerateAbscissa)?;

    let intercept = beta[0];
    let slope = beta[1];

    let residual_sigma = if n <= 2 {
        0.0
    } else {
        let sse: f64 = x
            .iter()
            .zip(y)
            .map(|(&xi, &yi)| (yi - (intercept + slope * xi)).powi(2))
            .sum();
        (sse / (n - 2) as f64).sqrt()
    };

    let s2 = residual_sigma * residual_sigma;
    let out = OrdinaryFit {
        intercept,
        slope,
        sigma_intercept: (s2 * cov_unscaled[(0, 0)]).sqrt(),
        sigma_slope: (s2 * cov_unscaled[(1, 1)]).sqrt(),
        residual_sigma,
    };

    ensure_finite_fields(&[
        ("intercept", out.intercept),
        ("slope", out.slope),
        ("sigma_intercept", out.sigma_intercept),
        ("sigma_slope", out.sigma_slope),
        ("residual_sigma", out.residual_sigma),
    ])?;
    Ok(out)
}
