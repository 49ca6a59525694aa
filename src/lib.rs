//! `hubble-fit` library crate.
//!
//! The binary (`hubble`) is a thin wrapper around this library so that:
//!
//! - the fitting core is testable without spawning processes
//! - modules are reusable from other tools
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod cosmology;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod group;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
