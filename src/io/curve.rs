//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted pump:
//! - pump metadata (name, units)
//! - both polynomial fits (coefficients + quality)
//! - a precomputed fitted grid per curve for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{CurveFile, CurveGrid, CurveRecord, PumpData, PumpFit, QuantityKind};
use crate::error::AppError;
use crate::math::sample_curve;

/// Write a curve JSON file.
pub fn write_curve_json(
    path: &Path,
    data: &PumpData,
    fit: &PumpFit,
    grid_points: usize,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create curve JSON '{}': {e}", path.display()),
        )
    })?;

    let head = sample_curve(&fit.head.coefficients, &data.flow, &data.head, grid_points);
    let efficiency = sample_curve(
        &fit.efficiency.coefficients,
        &data.flow,
        &data.efficiency,
        grid_points,
    );

    let curve = CurveFile {
        tool: "pump".to_string(),
        pump_name: data.name.clone(),
        flow_units: data.flow_units.clone(),
        head_units: data.head_units.clone(),
        degree: fit.degree,
        curves: vec![
            CurveRecord {
                quantity: QuantityKind::Head,
                fit: fit.head.clone(),
                grid: CurveGrid {
                    flow: head.xs,
                    y: head.ys,
                },
            },
            CurveRecord {
                quantity: QuantityKind::Efficiency,
                fit: fit.efficiency.clone(),
                grid: CurveGrid {
                    flow: efficiency.xs,
                    y: efficiency.ys,
                },
            },
        ],
    };

    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open curve JSON '{}': {e}", path.display()),
        )
    })?;
    let curve: CurveFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CurveFile;

    #[test]
    fn curve_file_round_trips_through_json() {
        let original = CurveFile {
            tool: "pump".to_string(),
            pump_name: "Goulds 3196".to_string(),
            flow_units: "gpm".to_string(),
            head_units: "ft".to_string(),
            degree: 3,
            curves: vec![CurveRecord {
                quantity: QuantityKind::Head,
                fit: crate::domain::CurveFit {
                    coefficients: vec![-0.0002, 0.001, -0.05, 90.0],
                    quality: crate::domain::FitQuality {
                        r_squared: 0.998,
                        sse: 1.2,
                        rmse: 0.3,
                        n: 12,
                    },
                },
                grid: CurveGrid {
                    flow: vec![0.0, 30.0, 60.0],
                    y: vec![90.0, 88.0, 50.0],
                },
            }],
        };

        let json = serde_json::to_string(&original).unwrap();
        let back: CurveFile = serde_json::from_str(&json).unwrap();

        assert_eq!(back.pump_name, original.pump_name);
        assert_eq!(back.degree, 3);
        assert_eq!(back.curves.len(), 1);
        assert_eq!(back.curves[0].quantity, QuantityKind::Head);
        assert_eq!(back.curves[0].fit.coefficients, vec![-0.0002, 0.001, -0.05, 90.0]);
        assert_eq!(back.curves[0].grid.flow, vec![0.0, 30.0, 60.0]);
    }
}
