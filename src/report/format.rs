//! Residual computation and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for golden tests)

use crate::domain::{PointResidual, PumpData, PumpFit};
use crate::io::ingest::IngestedData;
use crate::math::evaluate;

/// Compute fitted values and residuals for each data point (both curves).
pub fn compute_residuals(data: &PumpData, fit: &PumpFit) -> Vec<PointResidual> {
    let mut out = Vec::with_capacity(data.n_points());
    for i in 0..data.n_points() {
        let flow = data.flow[i];
        let head_fit = evaluate(&fit.head.coefficients, flow);
        let eff_fit = evaluate(&fit.efficiency.coefficients, flow);
        out.push(PointResidual {
            flow,
            head_obs: data.head[i],
            head_fit,
            head_residual: data.head[i] - head_fit,
            eff_obs: data.efficiency[i],
            eff_fit,
            eff_residual: data.efficiency[i] - eff_fit,
        });
    }
    out
}

/// Render a coefficient sequence for read-only display.
///
/// Highest power first, fixed precision, comma-joined — e.g.
/// `a3=-0.000002, a2=0.000841, a1=-0.135115, a0=92.216185`.
pub fn fmt_coefficients(coefficients: &[f64]) -> String {
    let degree = coefficients.len().saturating_sub(1);
    let parts: Vec<String> = coefficients
        .iter()
        .enumerate()
        .map(|(i, c)| format!("a{}={c:.6}", degree - i))
        .collect();
    parts.join(", ")
}

/// Format the full run summary (dataset stats + both fits).
pub fn format_run_summary(ingest: &IngestedData, fit: &PumpFit) -> String {
    let data = &ingest.data;
    let mut out = String::new();

    out.push_str("=== pump - Pump Performance Curve Fit ===\n");
    out.push_str(&format!("Pump: {}\n", data.name));
    out.push_str(&format!(
        "Units: flow={} head={} efficiency=%\n",
        data.flow_units, data.head_units
    ));
    out.push_str(&format!(
        "Points: n={} (read={} skipped={}) | flow=[{:.2}, {:.2}]\n",
        ingest.stats.n_points,
        ingest.rows_read,
        ingest.rows_skipped,
        ingest.stats.flow_min,
        ingest.stats.flow_max
    ));

    out.push_str(&format!("\nDegree-{} least-squares fits:\n", fit.degree));
    out.push_str(&format_curve_lines("Head", &ingest.data.head_units, &fit.head));
    out.push_str(&format_curve_lines("Efficiency", "%", &fit.efficiency));

    out
}

fn format_curve_lines(label: &str, units: &str, fit: &crate::domain::CurveFit) -> String {
    let mut out = String::new();
    out.push_str(&format!("- {label} ({units})\n"));
    out.push_str(&format!("  coefficients: {}\n", fmt_coefficients(&fit.coefficients)));
    out.push_str(&format!(
        "  R²={} | SSE={:.4} | RMSE={:.4}\n",
        fmt_r_squared(fit.quality.r_squared),
        fit.quality.sse,
        fit.quality.rmse
    ));
    out
}

/// Format R² for display; the NaN sentinel (no variance to explain, see the
/// fit engine) renders as `n/a`.
pub fn fmt_r_squared(r_squared: f64) -> String {
    if r_squared.is_nan() {
        "n/a".to_string()
    } else {
        format!("{r_squared:.4}")
    }
}

/// Format the per-point residual table.
pub fn format_residual_table(residuals: &[PointResidual]) -> String {
    let mut out = String::new();

    out.push_str(
        format!(
            "{:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
            "flow", "head", "head_fit", "head_res", "eff", "eff_fit", "eff_res"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<10} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in residuals {
        out.push_str(
            format!(
                "{:>10.2} {:>10.2} {:>10.2} {:>10.3} {:>10.2} {:>10.2} {:>10.3}\n",
                r.flow, r.head_obs, r.head_fit, r.head_residual, r.eff_obs, r.eff_fit, r.eff_residual
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveFit, FitQuality, PumpFit};

    fn constant_fit(value: f64, n: usize) -> CurveFit {
        CurveFit {
            coefficients: vec![value],
            quality: FitQuality {
                r_squared: 1.0,
                sse: 0.0,
                rmse: 0.0,
                n,
            },
        }
    }

    #[test]
    fn compute_residuals_basic() {
        let data = PumpData {
            name: "P".to_string(),
            flow_units: "gpm".to_string(),
            head_units: "ft".to_string(),
            flow: vec![0.0, 1.0],
            head: vec![10.0, 11.0],
            efficiency: vec![50.0, 50.0],
        };
        let fit = PumpFit {
            degree: 0,
            head: constant_fit(10.0, 2),
            efficiency: constant_fit(50.0, 2),
        };

        let residuals = compute_residuals(&data, &fit);
        assert_eq!(residuals.len(), 2);
        assert!((residuals[0].head_residual - 0.0).abs() < 1e-12);
        assert!((residuals[1].head_residual - 1.0).abs() < 1e-12);
        assert!((residuals[1].eff_residual - 0.0).abs() < 1e-12);
    }

    #[test]
    fn coefficient_string_is_highest_power_first() {
        let s = fmt_coefficients(&[2.0, -1.0, 0.5]);
        assert_eq!(s, "a2=2.000000, a1=-1.000000, a0=0.500000");
    }

    #[test]
    fn nan_r_squared_renders_as_na() {
        assert_eq!(fmt_r_squared(f64::NAN), "n/a");
        assert_eq!(fmt_r_squared(0.9876543), "0.9877");
    }
}
