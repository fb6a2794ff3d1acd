//! Command-line parsing for the pump curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pump", version, about = "Pump performance curve fitter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit head/efficiency curves from a pump data file, print diagnostics,
    /// and optionally plot/export.
    Fit(FitArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying fit pipeline as `pump fit`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(FitArgs),
    /// Write a synthetic pump data file (for demos and testing).
    Sample(SampleArgs),
}

/// Common options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Pump data file (whitespace-delimited text). A synthetic pump is
    /// generated when omitted.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Polynomial degree for both curve fits.
    #[arg(short, long, default_value_t = 3)]
    pub degree: usize,

    /// Number of points when densely sampling a fitted curve (exports).
    #[arg(long, default_value_t = 500)]
    pub curve_points: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Show the per-point residual table.
    #[arg(long)]
    pub residuals: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-point results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export curves (coefficients + quality + fitted grids) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,

    /// Number of synthetic points when no data file is given.
    #[arg(short = 'n', long, default_value_t = 12)]
    pub sample_count: usize,

    /// Random seed for synthetic pump generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options for plotting a saved curve.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Curve JSON file produced by `pump fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for writing a synthetic pump data file.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Output path for the generated pump data file.
    #[arg(value_name = "FILE")]
    pub out: PathBuf,

    /// Number of data points.
    #[arg(short = 'n', long, default_value_t = 12)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
