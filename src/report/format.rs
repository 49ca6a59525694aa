//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the fitting code stays free of printing
//! - output changes are localized

use crate::cosmology::hubble_time;
use crate::fit::{BatchOutcome, FitResult, OrdinaryFit};
use crate::group::GroupedTable;
use crate::io::ingest::{IngestedData, LoadFailure};

/// Format the summary of a weighted fit.
pub fn format_fit_summary(ingest: &IngestedData, fit: &FitResult) -> String {
    let n = ingest.observations.len();
    let mut out = String::new();

    out.push_str("=== hubble - weighted least-squares fit ===\n");
    out.push_str(&format_source(ingest));

    out.push_str("\nFit: y = a + b*x\n");
    out.push_str(&format!("  a (intercept) = {:>14.6} ± {:.6}\n", fit.intercept, fit.sigma_intercept));
    out.push_str(&format!("  b (slope)     = {:>14.6} ± {:.6}\n", fit.slope, fit.sigma_slope));
    out.push_str(&format!("  chi²          = {:>14.6e}\n", fit.chi_squared));
    match fit.reduced_chi_squared(n) {
        Some(r) => out.push_str(&format!(
            "  chi²/dof      = {:>14.6} (dof={})\n",
            r,
            FitResult::degrees_of_freedom(n)
        )),
        None => out.push_str("  chi²/dof      =            n/a (line through 2 points)\n"),
    }
    out.push_str(&format_hubble_time(fit.slope));

    out
}

/// Format the summary of an unweighted fit.
pub fn format_ordinary_summary(ingest: &IngestedData, fit: &OrdinaryFit) -> String {
    let mut out = String::new();

    out.push_str("=== hubble - ordinary least-squares fit ===\n");
    out.push_str(&format_source(ingest));

    out.push_str("\nFit: y = a + b*x (sigma column ignored)\n");
    out.push_str(&format!("  a (intercept) = {:>14.6} ± {:.6}\n", fit.intercept, fit.sigma_intercept));
    out.push_str(&format!("  b (slope)     = {:>14.6} ± {:.6}\n", fit.slope, fit.sigma_slope));
    out.push_str(&format!("  residual std  = {:>14.6}\n", fit.residual_sigma));
    out.push_str(&format_hubble_time(fit.slope));

    out
}

/// One line per dataset, failures and unreadable files included.
pub fn format_batch(outcomes: &[BatchOutcome], unreadable: &[LoadFailure]) -> String {
    let mut out = String::new();
    let width = outcomes
        .iter()
        .map(|o| o.name.len())
        .chain(unreadable.iter().map(|f| f.name.len()))
        .max()
        .unwrap_or(4)
        .max(4);

    out.push_str(&format!(
        "{:<width$}  {:>4}  {:>12}  {:>10}  {:>12}  {:>10}  {:>12}\n",
        "file", "n", "slope", "±", "intercept", "±", "chi²"
    ));
    for o in outcomes {
        match &o.result {
            Ok(fit) => out.push_str(&format!(
                "{:<width$}  {:>4}  {:>12.4}  {:>10.4}  {:>12.4}  {:>10.4}  {:>12.4e}\n",
                o.name, o.n_points, fit.slope, fit.sigma_slope, fit.intercept, fit.sigma_intercept, fit.chi_squared
            )),
            Err(e) => out.push_str(&format!("{:<width$}  {:>4}  FAILED: {e}\n", o.name, o.n_points)),
        }
    }
    for f in unreadable {
        out.push_str(&format!("{:<width$}  {:>4}  UNREADABLE: {}\n", f.name, "-", f.error));
    }

    let fitted = outcomes.iter().filter(|o| o.is_ok()).count();
    let failed = outcomes.len() - fitted + unreadable.len();
    out.push_str(&format!("\n{fitted} fitted, {failed} failed\n"));
    out
}

/// Describe a grouping run.
pub fn format_group_summary(table: &GroupedTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} group(s) kept", table.rows.len()));
    if !table.dropped.is_empty() {
        out.push_str(&format!(", dropped: {}", table.dropped.join(", ")));
    }
    out.push('\n');
    for r in &table.rows {
        out.push_str(&format!(
            "  {:<10} n={:<3} x={:<10.4} y={:<12.4} sigma={:.4}\n",
            r.group, r.count, r.x, r.y, r.sigma
        ));
    }
    out
}

fn format_source(ingest: &IngestedData) -> String {
    let mut out = format!(
        "Source: {} (x=`{}`, y=`{}`, sigma=`{}`)\n",
        ingest.source.display(),
        ingest.columns.x,
        ingest.columns.y,
        ingest.columns.sigma
    );
    if let Some(stats) = &ingest.stats {
        out.push_str(&format!(
            "Points: n={} | x=[{:.4}, {:.4}] | y=[{:.4}, {:.4}]\n",
            stats.n_points, stats.x_min, stats.x_max, stats.y_min, stats.y_max
        ));
    }
    out
}

/// Only meaningful for velocity (km/s) against distance (Mpc) data with a
/// positive slope; omitted otherwise.
fn format_hubble_time(slope: f64) -> String {
    match hubble_time(slope) {
        Ok(t) => format!(
            "\nIf x is Mpc and y is km/s: H0 = {:.3} km/s/Mpc, 1/H0 = {:.4e} s ({:.3} Gyr)\n",
            t.h0,
            t.seconds,
            t.gigayears()
        ),
        Err(_) => String::new(),
    }
}
