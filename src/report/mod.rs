//! Reporting utilities: residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{Observations, Residual};
use crate::fit::FitResult;

/// Compute fitted values, residuals and pulls for each observation.
pub fn compute_residuals(obs: &Observations, fit: &FitResult) -> Vec<Residual> {
    obs.points()
        .map(|(x, y, sigma)| {
            let y_fit = fit.predict(x);
            let residual = y - y_fit;
            Residual {
                x,
                y,
                sigma,
                y_fit,
                residual,
                pull: residual / sigma,
            }
        })
        .collect()
}
