//! Reference and synthetic datasets.

pub mod hubble;
pub mod sample;

pub use hubble::{nebula_measurements, nebulae, write_nebulae_csv, Nebula};
pub use sample::{generate_synthetic, SyntheticConfig};
