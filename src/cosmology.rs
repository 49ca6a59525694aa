//! Hubble time from a Hubble constant.
//!
//! With `H0` in km/s/Mpc, `1/H0` is a time once the megaparsec is expressed in
//! kilometres. It is the age of a universe that has expanded at a constant
//! rate, which is the estimate a straight-line fit of velocity vs distance
//! supports.

use serde::Serialize;

use crate::error::AppError;

/// Kilometres per megaparsec, rounded to three significant figures.
pub const KM_PER_MPC: f64 = 3.09e19;

/// Seconds per Julian year.
pub const SECONDS_PER_YEAR: f64 = 3.15576e7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HubbleTime {
    pub h0: f64,
    pub seconds: f64,
    pub years: f64,
}

impl HubbleTime {
    pub fn gigayears(&self) -> f64 {
        self.years / 1e9
    }
}

/// `1/H0` for `h0` in km/s/Mpc.
pub fn hubble_time(h0: f64) -> Result<HubbleTime, AppError> {
    if !(h0.is_finite() && h0 > 0.0) {
        return Err(AppError::new(3, format!("Hubble constant must be finite and > 0 (got {h0}).")));
    }
    let seconds = KM_PER_MPC / h0;
    Ok(HubbleTime {
        h0,
        seconds,
        years: seconds / SECONDS_PER_YEAR,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h0_70_is_about_fourteen_gigayears() {
        let t = hubble_time(70.0).unwrap();
        assert!((t.seconds - 4.4143e17).abs() / 4.4143e17 < 1e-5);
        assert!((t.gigayears() - 13.988).abs() < 1e-3);
    }

    #[test]
    fn non_positive_h0_is_rejected() {
        assert!(hubble_time(0.0).is_err());
        assert!(hubble_time(-70.0).is_err());
        assert!(hubble_time(f64::NAN).is_err());
    }
}
