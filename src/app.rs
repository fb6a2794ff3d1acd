//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - imports pump data (or generates a synthetic sample)
//! - runs the head/efficiency curve fits
//! - prints reports/plots
//! - writes optional exports

use std::fs;

use clap::Parser;

use crate::cli::{Command, FitArgs, PlotArgs, SampleArgs};
use crate::domain::FitConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `pump` binary.
pub fn run() -> Result<(), AppError> {
    // We want bare `pump` (and `pump -n 20`-style flag usage) to behave
    // like `pump tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let show_residuals = args.residuals;
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    println!("{}", crate::report::format_run_summary(&run.ingest, &run.fit));

    if show_residuals {
        println!("{}", crate::report::format_residual_table(&run.residuals));
    }

    if config.plot {
        let plot = crate::plot::render_pump_plot(
            &run.ingest.data,
            &run.fit,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.residuals)?;
    }
    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(path, &run.ingest.data, &run.fit, config.curve_points)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;

    let plot = crate::plot::render_pump_plot_from_curve_file(&curve, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_tui(args: FitArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let data = crate::data::generate_sample(args.count, args.seed)?;
    let text = crate::data::to_pump_text(&data);

    fs::write(&args.out, text).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to write sample file '{}': {e}", args.out.display()),
        )
    })?;

    println!("Wrote {} points to {}", args.count, args.out.display());
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        input: args.input.clone(),
        degree: args.degree,
        curve_points: args.curve_points,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_curve: args.export_curve.clone(),
        sample_count: args.sample_count,
        sample_seed: args.seed,
    }
}

/// Rewrite argv so `pump` defaults to `pump tui`.
///
/// Rules:
/// - `pump`                     -> `pump tui`
/// - `pump -n 20 ...`           -> `pump tui -n 20 ...`
/// - `pump --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "plot" | "tui" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["pump"])), args(&["pump", "tui"]));
    }

    #[test]
    fn leading_flag_defaults_to_tui() {
        assert_eq!(
            rewrite_args(args(&["pump", "-n", "20"])),
            args(&["pump", "tui", "-n", "20"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["pump", "fit", "data.txt"])),
            args(&["pump", "fit", "data.txt"])
        );
        assert_eq!(rewrite_args(args(&["pump", "--help"])), args(&["pump", "--help"]));
    }
}
