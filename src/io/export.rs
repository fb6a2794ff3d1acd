//! Export per-point results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::PointResidual;
use crate::error::AppError;

/// Write per-point observed/fitted values and residuals to a CSV file.
pub fn write_results_csv(path: &Path, residuals: &[PointResidual]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(
        file,
        "flow,head_obs,head_fit,head_residual,eff_obs,eff_fit,eff_residual"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        writeln!(
            file,
            "{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            r.flow, r.head_obs, r.head_fit, r.head_residual, r.eff_obs, r.eff_fit, r.eff_residual
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
