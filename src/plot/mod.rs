//! Plotting utilities.
//!
//! Two outputs:
//!
//! - deterministic ASCII (terminal)
//! - SVG files via Plotters

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;

use crate::io::FitFile;

/// Render a saved fit file without refitting.
pub fn render_ascii_plot_from_fit_file(file: &FitFile, width: usize, height: usize) -> String {
    let mut out = format!(
        "Fit: y = {:.6} + {:.6}*x  (chi²={:.4e}, n={})\n",
        file.fit.intercept, file.fit.slope, file.fit.chi_squared, file.n_points
    );
    out.push_str(&render_ascii_plot(&file.observations, &file.fit, width, height));
    out
}

