//! Fitting routines for pump curves.
//!
//! Given a `SampleSet` and a degree we produce a `CurveFit`: coefficients
//! (highest power first) plus quality diagnostics (R², SSE, RMSE). The two
//! pump curves — head vs flow and efficiency vs flow — are independent
//! problems over the same abscissas, so `fit_pump` solves them in parallel
//! with independently owned inputs and outputs.

use rayon::join;

use crate::domain::{CurveFit, FitQuality, PumpData, PumpFit, SampleSet};
use crate::error::FitError;
use crate::math::{evaluate, fit, r_squared};

/// Fit one sample set and compute quality diagnostics.
pub fn fit_samples(samples: &SampleSet, degree: usize) -> Result<CurveFit, FitError> {
    let coefficients = fit(&samples.x, &samples.y, degree)?;

    let n = samples.len();
    let mut sse = 0.0;
    for (&xi, &yi) in samples.x.iter().zip(samples.y.iter()) {
        let r = yi - evaluate(&coefficients, xi);
        sse += r * r;
    }
    let rmse = (sse / n as f64).sqrt();

    let quality = FitQuality {
        r_squared: r_squared(&coefficients, &samples.x, &samples.y),
        sse,
        rmse,
        n,
    };

    Ok(CurveFit {
        coefficients,
        quality,
    })
}

/// Fit both pump curves.
///
/// Head and efficiency share the flow abscissas but nothing else; each fit
/// owns its own `SampleSet` copy, so the parallel split has no shared mutable
/// state. A failure on either side fails the whole pump fit (head reported
/// first when both fail).
pub fn fit_pump(data: &PumpData, degree: usize) -> Result<PumpFit, FitError> {
    let head_set = data.head_samples();
    let eff_set = data.efficiency_samples();

    let (head, efficiency) = join(
        || fit_samples(&head_set, degree),
        || fit_samples(&eff_set, degree),
    );

    Ok(PumpFit {
        degree,
        head: head?,
        efficiency: efficiency?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::evaluate;

    fn synthetic_pump(n: usize) -> PumpData {
        // Exact cubics so the fits should be near-perfect.
        let head_coeffs = [-0.0002, 0.001, -0.05, 90.0];
        let eff_coeffs = [-0.0004, 0.002, 1.1, 10.0];

        let flow: Vec<f64> = (0..n).map(|i| i as f64 * 60.0 / (n - 1) as f64).collect();
        let head: Vec<f64> = flow.iter().map(|&q| evaluate(&head_coeffs, q)).collect();
        let efficiency: Vec<f64> = flow.iter().map(|&q| evaluate(&eff_coeffs, q)).collect();

        PumpData {
            name: "Test Pump".to_string(),
            flow_units: "gpm".to_string(),
            head_units: "ft".to_string(),
            flow,
            head,
            efficiency,
        }
    }

    #[test]
    fn fit_pump_recovers_both_cubics() {
        let data = synthetic_pump(12);
        let fit = fit_pump(&data, 3).unwrap();

        assert_eq!(fit.head.coefficients.len(), 4);
        assert_eq!(fit.efficiency.coefficients.len(), 4);
        assert!((fit.head.quality.r_squared - 1.0).abs() < 1e-6);
        assert!((fit.efficiency.quality.r_squared - 1.0).abs() < 1e-6);
        assert!(fit.head.quality.sse < 1e-6);
        assert!(fit.efficiency.quality.rmse < 1e-6);
    }

    #[test]
    fn refit_replaces_rather_than_mutates() {
        let data = synthetic_pump(12);
        let first = fit_pump(&data, 3).unwrap();
        let second = fit_pump(&data, 2).unwrap();

        // The first result is untouched by the second fit.
        assert_eq!(first.head.coefficients.len(), 4);
        assert_eq!(second.head.coefficients.len(), 3);
    }

    #[test]
    fn fit_pump_fails_on_too_few_points() {
        let data = PumpData {
            name: "Tiny".to_string(),
            flow_units: "gpm".to_string(),
            head_units: "ft".to_string(),
            flow: vec![0.0, 1.0, 2.0],
            head: vec![10.0, 9.0, 7.0],
            efficiency: vec![20.0, 30.0, 35.0],
        };

        let err = fit_pump(&data, 3).unwrap_err();
        assert_eq!(err, FitError::InsufficientData { needed: 4, got: 3 });
    }
}
