//! Synthetic Hubble-law datasets.
//!
//! Points are drawn as:
//!
//! ```text
//! x ~ Uniform(x_min, x_max)
//! y = intercept + h0 * x + N(0, noise_sigma)
//! ```
//!
//! with `sigma = noise_sigma` for every point, so a correct fit should give a
//! reduced chi² near 1. Generation is seeded and fully deterministic.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::Observations;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub n: usize,
    /// True slope (km/s/Mpc).
    pub h0: f64,
    pub intercept: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub noise_sigma: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            n: 24,
            h0: 70.0,
            intercept: 0.0,
            x_min: 1.0,
            x_max: 30.0,
            noise_sigma: 50.0,
            seed: 42,
        }
    }
}

pub fn generate_synthetic(config: &SyntheticConfig) -> Result<Observations, AppError> {
    if config.n == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    if !(config.x_min.is_finite() && config.x_max.is_finite() && config.x_max > config.x_min) {
        return Err(AppError::new(2, "Invalid x range for sample generation."));
    }
    if !(config.noise_sigma.is_finite() && config.noise_sigma > 0.0) {
        return Err(AppError::new(2, "Noise sigma must be finite and > 0."));
    }
    if !(config.h0.is_finite() && config.intercept.is_finite()) {
        return Err(AppError::new(2, "Slope and intercept must be finite."));
    }

    let normal = Normal::new(0.0, config.noise_sigma)
        .map_err(|e| AppError::new(2, format!("Noise distribution error: {e}")))?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut obs = Observations::default();
    for _ in 0..config.n {
        let x = rng.gen_range(config.x_min..=config.x_max);
        let y = config.intercept + config.h0 * x + normal.sample(&mut rng);
        obs.x.push(x);
        obs.y.push(y);
        obs.sigma.push(config.noise_sigma);
    }
    Ok(obs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_data() {
        let cfg = SyntheticConfig::default();
        assert_eq!(generate_synthetic(&cfg).unwrap(), generate_synthetic(&cfg).unwrap());
    }

    #[test]
    fn fit_recovers_slope() {
        let cfg = SyntheticConfig {
            n: 400,
            noise_sigma: 20.0,
            ..SyntheticConfig::default()
        };
        let obs = generate_synthetic(&cfg).unwrap();
        let fit = obs.fit().unwrap();

        // 5 standard errors is far outside what a correct fit produces.
        assert!((fit.slope - cfg.h0).abs() < 5.0 * fit.sigma_slope);
        let reduced = fit.reduced_chi_squared(obs.len()).unwrap();
        assert!(reduced > 0.7 && reduced < 1.3, "reduced chi2 = {reduced}");
    }

    #[test]
    fn rejects_bad_config() {
        let cfg = SyntheticConfig {
            x_min: 5.0,
            x_max: 1.0,
            ..SyntheticConfig::default()
        };
        assert_eq!(generate_synthetic(&cfg).unwrap_err().exit_code(), 2);

        let cfg = SyntheticConfig {
            noise_sigma: 0.0,
            ..SyntheticConfig::default()
        };
        assert!(generate_synthetic(&cfg).is_err());
    }
}
