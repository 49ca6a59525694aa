//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up stderr logging
//! - runs the requested command
//! - prints reports/plots and writes optional exports

use std::path::Path;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{AgeArgs, BatchArgs, Cli, Command, FitArgs, GroupArgs, PlotArgs, SampleArgs, SimulateArgs};
use crate::domain::{ColumnSpec, Observations};
use crate::error::AppError;
use crate::fit::{FittedLine, SIGMA_EPSILON};
use crate::group::GroupError;
use crate::plot::PlotLabels;

pub mod pipeline;

const SVG_SIZE: (u32, u32) = (900, 600);

/// Entry point for the `hubble` binary.
pub fn run() -> Result<(), AppError> {
    // Column defaults may come from `.env`; a missing file is fine.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(&cli.log_level);
    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Batch(args) => handle_batch(args),
        Command::Group(args) => handle_group(args),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
        Command::Simulate(args) => handle_simulate(args),
        Command::Age(args) => handle_age(args),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (e.g. in tests) is a no-op.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let columns = args.columns.to_spec();

    if args.ordinary {
        let run = pipeline::run_ordinary(&args.input, &columns)?;
        println!("{}", crate::report::format_ordinary_summary(&run.ingest, &run.fit));
        return emit_plots(&args, &run.ingest.observations, &run.fit);
    }

    let run = pipeline::run_fit(&args.input, &columns)?;
    println!("{}", crate::report::format_fit_summary(&run.ingest, &run.fit));
    emit_plots(&args, &run.ingest.observations, &run.fit)?;

    // Optional exports.
    if let Some(path) = &args.export_json {
        let file = crate::io::FitFile::new(
            Some(run.ingest.source.as_path()),
            &columns,
            &run.ingest.observations,
            run.fit,
        );
        crate::io::write_fit_json(path, &file)?;
        info!(path = %path.display(), "fit JSON written");
    }
    if let Some(path) = &args.export_residuals {
        crate::io::write_residuals_csv(path, &run.residuals)?;
        info!(path = %path.display(), "residuals written");
    }

    Ok(())
}

fn emit_plots<L: FittedLine>(args: &FitArgs, obs: &Observations, line: &L) -> Result<(), AppError> {
    if args.plot {
        println!("{}", crate::plot::render_ascii_plot(obs, line, args.width, args.height));
    }
    if let Some(path) = &args.svg {
        let labels = labels_for(&args.columns.to_spec(), &args.input);
        crate::plot::write_svg_plot(path, obs, line, &labels, SVG_SIZE)?;
        info!(path = %path.display(), "SVG written");
    }
    Ok(())
}

fn labels_for(columns: &ColumnSpec, source: &Path) -> PlotLabels {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    PlotLabels {
        title: format!("{name}: least-squares fit"),
        x_desc: columns.x.clone(),
        y_desc: columns.y.clone(),
    }
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let run = pipeline::run_batch(&args.inputs, &args.columns.to_spec());

    print!("{}", crate::report::format_batch(&run.outcomes, &run.load_failures));

    let failed = run.failed();
    if failed == 0 {
        return Ok(());
    }
    // Unreadable inputs take precedence over fit failures.
    let code = if run.load_failures.is_empty() { 3 } else { 2 };
    Err(AppError::new(
        code,
        format!("{failed} of {} dataset(s) failed", args.inputs.len()),
    ))
}

fn handle_group(args: GroupArgs) -> Result<(), AppError> {
    let measurements = crate::group::load_measurements(&args.input, &args.to_columns())?;
    info!(n = measurements.len(), "measurements loaded");

    let mut table = crate::group::group_measurements(&measurements)?;
    if args.drop_zero_spread {
        table.drop_sigma_below(SIGMA_EPSILON);
        if table.rows.is_empty() {
            return Err(GroupError::NoGroups.into());
        }
    }

    crate::group::write_grouped_csv(&args.output, &table)?;
    print!("{}", crate::report::format_group_summary(&table));
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::read_fit_json(&args.fit)?;
    println!(
        "{}",
        crate::plot::render_ascii_plot_from_fit_file(&file, args.width, args.height)
    );

    if let Some(path) = &args.svg {
        let source = file.source.clone().unwrap_or_else(|| args.fit.clone());
        let labels = labels_for(&file.columns, &source);
        crate::plot::write_svg_plot(path, &file.observations, &file.fit, &labels, SVG_SIZE)?;
        info!(path = %path.display(), "SVG written");
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    crate::data::write_nebulae_csv(&args.output)?;
    println!(
        "Wrote {} nebulae to {}",
        crate::data::nebulae().len(),
        args.output.display()
    );
    println!(
        "Group them with: hubble group {} -o grouped.csv --label-column Group \
         --x-column \"Distance (Mpc)\" --y-column \"Velocity (km/s)\" --drop-zero-spread",
        args.output.display()
    );
    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let obs = crate::data::generate_synthetic(&config)?;
    crate::io::write_observations_csv(&args.output, &obs, &ColumnSpec::default())?;
    println!(
        "Wrote {} synthetic points (H0={}, seed={}) to {}",
        obs.len(),
        config.h0,
        config.seed,
        args.output.display()
    );
    Ok(())
}

fn handle_age(args: AgeArgs) -> Result<(), AppError> {
    let t = crate::cosmology::hubble_time(args.h0)?;
    println!("H0    = {} km/s/Mpc", t.h0);
    println!("1/H0  = {:.4e} s", t.seconds);
    println!("      = {:.4e} yr ({:.3} Gyr)", t.years, t.gigayears());
    Ok(())
}
