//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - residual exports (`export`)
//! - fit JSON read/write (`fit_json`)

pub mod export;
pub mod fit_json;
pub mod ingest;

pub use export::*;
pub use fit_json::*;
pub use ingest::*;
