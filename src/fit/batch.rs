//! Fit many independent datasets at once.
//!
//! Each dataset is its own unit of work. Fits run on the rayon pool, results
//! come back in input order, and a failing dataset only affects its own
//! outcome.

use rayon::prelude::*;

use crate::domain::Observations;
use crate::fit::{FitError, FitResult};

/// A named observation set.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub observations: Observations,
}

/// Result of fitting one dataset in a batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub name: String,
    pub n_points: usize,
    pub result: Result<FitResult, FitError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fit every dataset, in parallel.
pub fn fit_batch(datasets: &[Dataset]) -> Vec<BatchOutcome> {
    datasets
        .par_iter()
        .map(|d| BatchOutcome {
            name: d.name.clone(),
            n_points: d.observations.len(),
            result: d.observations.fit(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(name: &str, x: &[f64], y: &[f64], sigma: &[f64]) -> Dataset {
        Dataset {
            name: name.to_string(),
            observations: Observations::new(x.to_vec(), y.to_vec(), sigma.to_vec()),
        }
    }

    #[test]
    fn failure_does_not_abort_siblings() {
        let datasets = vec![
            dataset("a", &[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0], &[0.1; 3]),
            dataset("bad", &[0.0], &[1.0], &[0.1]),
            dataset("c", &[0.0, 1.0, 2.0], &[0.0, -1.0, -2.0], &[0.5; 3]),
        ];

        let out = fit_batch(&datasets);
        let names: Vec<&str> = out.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["a", "bad", "c"]);

        assert!((out[0].result.as_ref().unwrap().slope - 2.0).abs() < 1e-10);
        assert_eq!(out[1].result, Err(FitError::InsufficientData { n: 1 }));
        assert!((out[2].result.as_ref().unwrap().slope + 1.0).abs() < 1e-10);
    }

    #[test]
    fn empty_batch_is_empty() {
        assert!(fit_batch(&[]).is_empty());
    }
}
