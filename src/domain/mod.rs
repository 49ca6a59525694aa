//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the observation set handed to the fit (`Observations`)
//! - column naming for tabular input (`ColumnSpec`)
//! - derived outputs (`DatasetStats`, `Residual`)

pub mod types;

pub use types::*;
