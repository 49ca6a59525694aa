//! Built-in reference table: 22 nebulae in 9 distance/velocity groups.
//!
//! Distances are in megaparsecs, radial velocities in km/s. The table is raw
//! (one row per nebula); `group::group_measurements` reduces it to the
//! per-group means the weighted fit expects.

use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::group::Measurement;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Nebula {
    #[serde(rename = "Group")]
    pub group: u8,
    #[serde(rename = "Nebula")]
    pub name: &'static str,
    #[serde(rename = "Velocity (km/s)")]
    pub velocity_km_s: f64,
    #[serde(rename = "Distance (Mpc)")]
    pub distance_mpc: f64,
}

const fn neb(group: u8, name: &'static str, velocity_km_s: f64, distance_mpc: f64) -> Nebula {
    Nebula {
        group,
        name,
        velocity_km_s,
        distance_mpc,
    }
}

const NEBULAE: [Nebula; 22] = [
    neb(1, "NGC 278", 650.0, 1.52),
    neb(1, "NGC 404", -25.0, 1.52),
    neb(2, "NGC 584", 1800.0, 3.45),
    neb(2, "NGC 936", 1300.0, 2.37),
    neb(3, "NGC 1023", 300.0, 0.62),
    neb(3, "NGC 1700", 800.0, 1.16),
    neb(4, "NGC 2681", 700.0, 1.42),
    neb(4, "NGC 2683", 400.0, 0.67),
    neb(5, "NGC 2841", 600.0, 1.24),
    neb(5, "NGC 3034", 290.0, 0.79),
    neb(6, "NGC 3368", 940.0, 1.74),
    neb(6, "NGC 3379", 810.0, 1.49),
    neb(7, "NGC 3623", 800.0, 1.79),
    neb(7, "NGC 4111", 800.0, 1.20),
    neb(8, "NGC 4526", 580.0, 2.35),
    neb(8, "NGC 4565", 1100.0, 2.23),
    neb(9, "NGC 5866", 650.0, 1.73),
    neb(9, "NGC 3521", 730.0, 1.27),
    neb(9, "NGC 4954", 1200.0, 2.10),
    neb(9, "NGC 3115", 920.0, 1.00),
    neb(9, "NGC 4826", 150.0, 0.9),
    neb(9, "NGC 7331", 500.0, 1.1),
];

pub fn nebulae() -> &'static [Nebula] {
    &NEBULAE
}

/// The table as raw measurements: label = group, x = distance, y = velocity.
pub fn nebula_measurements() -> Vec<Measurement> {
    NEBULAE
        .iter()
        .map(|n| Measurement {
            label: n.group.to_string(),
            x: n.distance_mpc,
            y: n.velocity_km_s,
        })
        .collect()
}

/// Write the table with `Group,Nebula,Velocity (km/s),Distance (Mpc)` headers.
pub fn write_nebulae_csv(path: &Path) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
    for n in nebulae() {
        writer
            .serialize(n)
            .map_err(|e| AppError::new(2, format!("Failed to write nebula row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::group_measurements;

    #[test]
    fn nine_groups_of_at_least_two() {
        let table = group_measurements(&nebula_measurements()).unwrap();
        assert_eq!(table.rows.len(), 9);
        assert!(table.dropped.is_empty());
        assert_eq!(table.rows.iter().map(|r| r.count).sum::<usize>(), 22);

        // Both group 7 nebulae report 800 km/s: zero spread, so the fit
        // will refuse this table until that row is dealt with.
        let g7 = table.rows.iter().find(|r| r.group == "7").unwrap();
        assert_eq!(g7.sigma, 0.0);
        assert!(table.rows.iter().filter(|r| r.group != "7").all(|r| r.sigma > 0.0));
    }

    #[test]
    fn csv_has_expected_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nebulae.csv");
        write_nebulae_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some("Group,Nebula,Velocity (km/s),Distance (Mpc)"));
        assert_eq!(text.lines().count(), 23);
    }
}
