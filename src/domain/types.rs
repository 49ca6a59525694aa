//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use serde::{Deserialize, Serialize};

use crate::fit::{FitError, FitResult, fit};

/// Default header names for the three fit columns.
pub const DEFAULT_X_COLUMN: &str = "x";
pub const DEFAULT_Y_COLUMN: &str = "y";
pub const DEFAULT_SIGMA_COLUMN: &str = "sigma";

/// Which CSV headers hold `x`, `y` and `sigma`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub x: String,
    pub y: String,
    pub sigma: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            x: DEFAULT_X_COLUMN.to_string(),
            y: DEFAULT_Y_COLUMN.to_string(),
            sigma: DEFAULT_SIGMA_COLUMN.to_string(),
        }
    }
}

impl ColumnSpec {
    pub fn names(&self) -> [&str; 3] {
        [&self.x, &self.y, &self.sigma]
    }
}

/// An observation set: three parallel sequences.
///
/// The lengths are *not* forced to agree here; that is the fit's job, so a
/// caller can hand over whatever it parsed and get a typed error back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub sigma: Vec<f64>,
}

impl Observations {
    pub fn new(x: Vec<f64>, y: Vec<f64>, sigma: Vec<f64>) -> Self {
        Self { x, y, sigma }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Weighted straight-line fit of this set.
    pub fn fit(&self) -> Result<FitResult, FitError> {
        fit(&self.x, &self.y, &self.sigma)
    }

    /// `(x, y, sigma)` triples, truncated to the shortest sequence.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.sigma)
            .map(|((&x, &y), &s)| (x, y, s))
    }

    /// Range of `x`, or `None` for an empty or non-finite set.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        finite_range(&self.x)
    }

    /// Range of `y ± sigma`, so error bars stay inside plot bounds.
    pub fn y_range_with_errors(&self) -> Option<(f64, f64)> {
        let lo: Vec<f64> = self.points().map(|(_, y, s)| y - s.abs()).collect();
        let hi: Vec<f64> = self.points().map(|(_, y, s)| y + s.abs()).collect();
        let (lo_min, _) = finite_range(&lo)?;
        let (_, hi_max) = finite_range(&hi)?;
        Some((lo_min, hi_max))
    }
}

/// Summary stats about the points read from a table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DatasetStats {
    pub fn from_observations(obs: &Observations) -> Option<Self> {
        let (x_min, x_max) = finite_range(&obs.x)?;
        let (y_min, y_max) = finite_range(&obs.y)?;
        Some(Self {
            n_points: obs.len(),
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

/// Fitted value and standardized residual for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Residual {
    pub x: f64,
    pub y: f64,
    pub sigma: f64,
    pub y_fit: f64,
    pub residual: f64,
    /// `residual / sigma`; its square summed over all points is chi².
    pub pull: f64,
}

pub(crate) fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_error_bars() {
        let obs = Observations::new(vec![1.0, 3.0], vec![10.0, 20.0], vec![1.0, 2.0]);
        assert_eq!(obs.x_range(), Some((1.0, 3.0)));
        assert_eq!(obs.y_range_with_errors(), Some((9.0, 22.0)));
    }

    #[test]
    fn empty_set_has_no_stats() {
        assert!(DatasetStats::from_observations(&Observations::default()).is_none());
    }
}
