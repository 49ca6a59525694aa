//! Shared "fit pipeline" logic used by the `fit` and `batch` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> fit -> residuals
//!
//! The command handlers can then focus on presentation (printing, plots, exports).

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::{ColumnSpec, Residual};
use crate::error::AppError;
use crate::fit::{BatchOutcome, Dataset, FitResult, OrdinaryFit, fit_batch, fit_ordinary};
use crate::io::ingest::{IngestError, IngestedData, LoadFailure, load_observations, load_observations_xy};

/// All computed outputs of a single weighted `hubble fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub fit: FitResult,
    pub residuals: Vec<Residual>,
}

/// Outputs of an unweighted run.
#[derive(Debug, Clone)]
pub struct OrdinaryRunOutput {
    pub ingest: IngestedData,
    pub fit: OrdinaryFit,
}

/// Outputs of `hubble batch`.
#[derive(Debug)]
pub struct BatchRunOutput {
    pub outcomes: Vec<BatchOutcome>,
    pub load_failures: Vec<LoadFailure>,
}

impl BatchRunOutput {
    pub fn failed(&self) -> usize {
        self.load_failures.len() + self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }
}

/// Load one table and run the weighted fit.
///
/// A failed fit returns early, so callers never plot or export an invalid
/// result.
pub fn run_fit(path: &Path, columns: &ColumnSpec) -> Result<RunOutput, AppError> {
    let ingest = load(path, columns)?;
    let obs = &ingest.observations;

    let fit = obs.fit()?;
    info!(
        slope = fit.slope,
        intercept = fit.intercept,
        chi_squared = fit.chi_squared,
        "weighted fit done"
    );

    let residuals = crate::report::compute_residuals(obs, &fit);
    Ok(RunOutput {
        ingest,
        fit,
        residuals,
    })
}

/// Load one table and run the unweighted fit.
///
/// The sigma column is optional here; when present it only feeds plot error bars.
pub fn run_ordinary(path: &Path, columns: &ColumnSpec) -> Result<OrdinaryRunOutput, AppError> {
    debug!(path = %path.display(), x = %columns.x, y = %columns.y, "loading table (sigma optional)");
    let ingest = load_observations_xy(path, columns)?;
    info!(path = %path.display(), n_points = ingest.observations.len(), "table loaded");
    let fit = fit_ordinary(&ingest.observations.x, &ingest.observations.y)?;
    info!(slope = fit.slope, intercept = fit.intercept, "ordinary fit done");
    Ok(OrdinaryRunOutput { ingest, fit })
}

/// Load every table, then fit the readable ones in parallel.
///
/// Neither a read failure nor a fit failure stops the other datasets.
pub fn run_batch(paths: &[PathBuf], columns: &ColumnSpec) -> BatchRunOutput {
    let loaded: Vec<(String, Result<IngestedData, IngestError>)> = paths
        .par_iter()
        .map(|p| (p.display().to_string(), load_observations(p, columns)))
        .collect();

    let mut datasets = Vec::with_capacity(loaded.len());
    let mut load_failures = Vec::new();
    for (name, result) in loaded {
        match result {
            Ok(ingest) => datasets.push(Dataset {
                name,
                observations: ingest.observations,
            }),
            Err(error) => {
                warn!(file = %name, %error, "skipping unreadable dataset");
                load_failures.push(LoadFailure { name, error });
            }
        }
    }

    let outcomes = fit_batch(&datasets);
    for o in &outcomes {
        if let Err(e) = &o.result {
            warn!(file = %o.name, error = %e, "fit failed");
        }
    }
    info!(
        datasets = paths.len(),
        failed = load_failures.len() + outcomes.iter().filter(|o| !o.is_ok()).count(),
        "batch done"
    );

    BatchRunOutput {
        outcomes,
        load_failures,
    }
}

fn load(path: &Path, columns: &ColumnSpec) -> Result<IngestedData, AppError> {
    debug!(path = %path.display(), x = %columns.x, y = %columns.y, sigma = %columns.sigma, "loading table");
    let ingest = load_observations(path, columns)?;
    info!(path = %path.display(), n_points = ingest.observations.len(), "table loaded");
    Ok(ingest)
}
