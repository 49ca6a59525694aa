//! Mathematical utilities: dense least squares on small design matrices.

pub mod ols;

pub use ols::*;
