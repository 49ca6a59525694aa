//! Read/write fit JSON files.
//!
//! A fit file is the portable representation of one weighted fit:
//! - the fit parameters and chi²
//! - run metadata (source table, column names, timestamp)
//! - the observations themselves (datasets here are small)
//! - a precomputed fitted-line grid for quick plotting
//!
//! `hubble plot` re-renders a fit from this file alone.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ColumnSpec, Observations};
use crate::error::AppError;
use crate::fit::FitResult;

/// Number of samples in the stored fitted-line grid.
pub const GRID_POINTS: usize = 101;

/// Fitted line sampled over the observed x range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// On-disk schema of a fit JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub source: Option<PathBuf>,
    pub columns: ColumnSpec,
    pub n_points: usize,
    pub fit: FitResult,
    pub reduced_chi_squared: Option<f64>,
    pub observations: Observations,
    pub grid: LineGrid,
}

impl FitFile {
    pub fn new(
        source: Option<&Path>,
        columns: &ColumnSpec,
        observations: &Observations,
        fit: FitResult,
    ) -> Self {
        let (x0, x1) = observations.x_range().unwrap_or((0.0, 1.0));
        Self {
            tool: "hubble".to_string(),
            generated_at: Utc::now(),
            source: source.map(Path::to_path_buf),
            columns: columns.clone(),
            n_points: observations.len(),
            fit,
            reduced_chi_squared: fit.reduced_chi_squared(observations.len()),
            observations: observations.clone(),
            grid: build_grid(&fit, x0, x1, GRID_POINTS),
        }
    }
}

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, file: &FitFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create fit JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(2, format!("Failed to write fit JSON: {e}")))?;
    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    let fit: FitFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid fit JSON: {e}")))?;
    Ok(fit)
}

fn build_grid(fit: &FitResult, x0: f64, x1: f64, n: usize) -> LineGrid {
    let n = n.max(2);
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);

    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let x = x0 + u * (x1 - x0);
        xs.push(x);
        ys.push(fit.predict(x));
    }

    LineGrid { x: xs, y: ys }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_file_survives_disk() {
        let obs = Observations::new(
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            vec![-1.0, 1.0, 3.0, 5.0, 7.0, 9.0],
            vec![0.1; 6],
        );
        let fit = obs.fit().unwrap();
        let file = FitFile::new(Some(Path::new("data.csv")), &ColumnSpec::default(), &obs, fit);

        assert_eq!(file.grid.x.len(), GRID_POINTS);
        assert_eq!(file.grid.x[0], 0.0);
        assert_eq!(file.grid.x[GRID_POINTS - 1], 5.0);
        assert!((file.grid.y[GRID_POINTS - 1] - 9.0).abs() < 1e-9);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit.json");
        write_fit_json(&path, &file).unwrap();
        let back = read_fit_json(&path).unwrap();
        assert_eq!(back.n_points, 6);
        assert_eq!(back.fit, file.fit);
        assert_eq!(back.observations, obs);
    }

    #[test]
    fn garbage_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_fit_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
