//! CSV exports: observation tables and per-observation residuals.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use crate::domain::{ColumnSpec, Observations, Residual};
use crate::error::AppError;

/// Write an observation set as a three-column table `hubble fit` can read back.
pub fn write_observations_csv(path: &Path, obs: &Observations, columns: &ColumnSpec) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;

    writer
        .write_record(columns.names())
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;
    for (x, y, s) in obs.points() {
        writer
            .write_record([x.to_string(), y.to_string(), s.to_string()])
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV '{}': {e}", path.display())))?;
    Ok(())
}

/// Write `x,y,sigma,y_fit,residual,pull` rows to a CSV file.
pub fn write_residuals_csv(path: &Path, residuals: &[Residual]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create residuals CSV '{}': {e}", path.display())))?;

    for r in residuals {
        writer
            .serialize(r)
            .map_err(|e| AppError::new(2, format!("Failed to write residuals CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush residuals CSV: {e}")))?;
    Ok(())
}
