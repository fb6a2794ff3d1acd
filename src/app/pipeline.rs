//! Shared "fit pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! import (or sample generation) -> head/efficiency fits -> residuals
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::generate_sample;
use crate::domain::{FitConfig, PointResidual, PumpFit};
use crate::error::AppError;
use crate::io::ingest::{load_pump_file, IngestedData};

/// All computed outputs of a single `pump fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub fit: PumpFit,
    pub residuals: Vec<PointResidual>,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let ingest = match &config.input {
        Some(path) => load_pump_file(path)?,
        None => IngestedData::from_data(generate_sample(config.sample_count, config.sample_seed)?)?,
    };

    run_fit_with_data(config, ingest)
}

/// Execute the fitting pipeline with already-ingested data.
///
/// This is useful for the TUI where we want to refit (e.g. a new degree)
/// without re-reading the file.
pub fn run_fit_with_data(config: &FitConfig, ingest: IngestedData) -> Result<RunOutput, AppError> {
    let fit = crate::fit::fit_pump(&ingest.data, config.degree)?;
    let residuals = crate::report::compute_residuals(&ingest.data, &fit);

    Ok(RunOutput {
        ingest,
        fit,
        residuals,
    })
}
