//! Weighted least-squares straight-line fit.
//!
//! Fits `y = a + b*x` to observations with per-point standard deviations
//! `sigma_i`, minimizing:
//!
//! ```text
//! chi^2 = Σ ((y_i - a - b*x_i) / sigma_i)^2
//! ```
//!
//! The naive normal-equations formula subtracts two large, nearly equal sums
//! and loses precision badly when the x values sit far from the origin. We use
//! the two-pass form instead: pass 1 accumulates the weighted sums, pass 2
//! re-centers x on its weighted mean before accumulating the slope numerator.
//!
//! No I/O, no logging, no global state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted per-point uncertainty.
pub const SIGMA_EPSILON: f64 = 1e-5;

/// Smallest accepted weighted-variance sum `S = Σ 1/sigma_i^2`.
pub const VARIANCE_EPSILON: f64 = 1e-6;

/// Which input sequence a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Series {
    X,
    Y,
    Sigma,
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Series::X => "x",
            Series::Y => "y",
            Series::Sigma => "sigma",
        };
        f.write_str(name)
    }
}

/// Reasons a straight-line fit cannot be computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("element {index} of {series} is not a finite number ({value})")]
    InvalidInputType { series: Series, index: usize, value: f64 },

    #[error("data must be sequences of the same length (x={x}, y={y}, sigma={sigma})")]
    LengthMismatch { x: usize, y: usize, sigma: usize },

    #[error("not enough data to fit: {n} point(s), need at least 2")]
    InsufficientData { n: usize },

    #[error("sigma[{index}] = {value} is too small (must be >= {min})", min = SIGMA_EPSILON)]
    SigmaTooSmall { index: usize, value: f64 },

    #[error("sum of inverse variances {sum} is too small (must be >= {min})", min = VARIANCE_EPSILON)]
    DegenerateVariance { sum: f64 },

    #[error("x values have no weighted spread; slope is undefined")]
    DegenerateAbscissa,

    #[error("fit produced a non-finite {field}")]
    NonFiniteResult { field: &'static str },
}

/// Best-fit line with parameter uncertainties and goodness of fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub intercept: f64,
    pub slope: f64,
    pub sigma_intercept: f64,
    pub sigma_slope: f64,
    pub chi_squared: f64,
}

impl FitResult {
    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Degrees of freedom left after fitting two parameters to `n` points.
    pub fn degrees_of_freedom(n: usize) -> usize {
        n.saturating_sub(2)
    }

    /// `chi^2 / (n - 2)`, or `None` when there are no degrees of freedom left.
    pub fn reduced_chi_squared(&self, n: usize) -> Option<f64> {
        match Self::degrees_of_freedom(n) {
            0 => None,
            dof => Some(self.chi_squared / dof as f64),
        }
    }
}

/// Fit `y = a + b*x` by weighted least squares.
///
/// `sigma[i]` is the standard deviation of `y[i]`. Inputs are validated in a
/// fixed order (finite values, equal lengths, at least two points, usable
/// sigmas) before any arithmetic happens.
pub fn fit(x: &[f64], y: &[f64], sigma: &[f64]) -> Result<FitResult, FitError> {
    ensure_finite(Series::X, x)?;
    ensure_finite(Series::Y, y)?;
    ensure_finite(Series::Sigma, sigma)?;

    if x.len() != y.len() || x.len() != sigma.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
            sigma: sigma.len(),
        });
    }

    let n = x.len();
    if n < 2 {
        return Err(FitError::InsufficientData { n });
    }

    if let Some((index, &value)) = sigma.iter().enumerate().find(|&(_, &s)| s < SIGMA_EPSILON) {
        return Err(FitError::SigmaTooSmall { index, value });
    }

    // Pass 1: weighted sums.
    let mut s = 0.0;
    let mut s_x = 0.0;
    let mut s_y = 0.0;
    for i in 0..n {
        let w = 1.0 / (sigma[i] * sigma[i]);
        s += w;
        s_x += x[i] * w;
        s_y += y[i] * w;
    }

    if s.abs() < VARIANCE_EPSILON {
        return Err(FitError::DegenerateVariance { sum: s });
    }

    // Pass 2: center on the weighted mean of x.
    let x_mean = s_x / s;
    let mut s_tt = 0.0;
    let mut b = 0.0;
    for i in 0..n {
        let t = (x[i] - x_mean) / sigma[i];
        s_tt += t * t;
        b += t * y[i] / sigma[i];
    }

    // Identical x values can still leave a round-off sized s_tt behind.
    if s_tt <= 0.0 || x.iter().all(|&v| v == x[0]) {
        return Err(FitError::DegenerateAbscissa);
    }

    let slope = b / s_tt;
    let intercept = (s_y - s_x * slope) / s;
    let sigma_slope = (1.0 / s_tt).sqrt();
    let sigma_intercept = ((1.0 + s_x * s_x / (s * s_tt)) / s).sqrt();

    let chi_squared = (0..n)
        .map(|i| ((y[i] - intercept - slope * x[i]) / sigma[i]).powi(2))
        .sum::<f64>();

    let result = FitResult {
        intercept,
        slope,
        sigma_intercept,
        sigma_slope,
        chi_squared,
    };
    ensure_finite_fields(&[
        ("intercept", result.intercept),
        ("slope", result.slope),
        ("sigma_intercept", result.sigma_intercept),
        ("sigma_slope", result.sigma_slope),
        ("chi_squared", result.chi_squared),
    ])?;
    Ok(result)
}

pub(crate) fn ensure_finite(series: Series, values: &[f64]) -> Result<(), FitError> {
    match values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(FitError::InvalidInputType { series, index, value }),
        None => Ok(()),
    }
}

/// First named output that is not finite, as `NonFiniteResult`.
pub(crate) fn ensure_finite_fields(fields: &[(&'static str, f64)]) -> Result<(), FitError> {
    match fields.iter().find(|(_, v)| !v.is_finite()) {
        Some(&(field, _)) => Err(FitError::NonFiniteResult { field }),
        None => Ok(()),
    }
}
