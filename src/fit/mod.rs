//! Straight-line fitting.
//!
//! Responsibilities:
//!
//! - weighted least squares with per-point sigmas (`weighted`)
//! - unweighted least squares with residual-based errors (`ordinary`)
//! - independent fan-out over many datasets (`batch`)

pub mod batch;
pub mod ordinary;
pub mod weighted;

pub use batch::*;
pub use ordinary::*;
pub use weighted::*;

/// Anything that describes a straight line `y = a + b*x`.
///
/// Plots and reports only need the line itself, so they accept either kind
/// of fit through this trait.
pub trait FittedLine {
    fn intercept(&self) -> f64;
    fn slope(&self) -> f64;

    fn value_at(&self, x: f64) -> f64 {
        self.intercept() + self.slope() * x
    }
}

impl FittedLine for FitResult {
    fn intercept(&self) -> f64 {
        self.intercept
    }

    fn slope(&self) -> f64 {
        self.slope
    }
}

impl FittedLine for OrdinaryFit {
    fn intercept(&self) -> f64 {
        self.intercept
    }

    fn slope(&self) -> f64 {
        self.slope
    }
}
