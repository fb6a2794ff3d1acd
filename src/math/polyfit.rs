//! Polynomial least-squares fitting.
//!
//! The operations here are pure, stateless transforms:
//!
//! - [`fit`]: sample arrays + degree → coefficients (highest power first)
//! - [`evaluate`]: coefficients + abscissa → ordinate (Horner)
//! - [`r_squared`]: coefficients + original samples → goodness of fit
//! - [`sample_curve`]: coefficients + original samples → dense plot points
//!
//! Coefficient ordering follows the usual polynomial convention: for degree
//! `n` the result is `[a_n, ..., a_1, a_0]`, so the constant term is last.
//!
//! Numerical notes:
//! - The solve goes through SVD (see `math::solve`), which handles tall
//!   Vandermonde systems without forming `AᵀA` explicitly.
//! - Distinct-abscissa counting uses exact equality. A Vandermonde matrix has
//!   full column rank iff the abscissas include at least `degree + 1` distinct
//!   nodes, so this check is the authoritative rank guard.

use nalgebra::{DMatrix, DVector};

use crate::domain::CurveSamples;
use crate::error::FitError;
use crate::math::solve::solve_least_squares;

/// Threshold below which a sum of squares is treated as zero when deciding
/// the degenerate R² case.
const SS_EPS: f64 = 1e-12;

/// Fit a degree-`degree` polynomial to `(x, y)` by least squares.
///
/// Returns `degree + 1` coefficients, highest power first.
///
/// Fails fast with [`FitError::InsufficientData`] when there are fewer than
/// `degree + 1` points, and with [`FitError::SingularSystem`] when `x` has
/// fewer than `degree + 1` distinct values (rank-deficient design matrix).
/// Inputs are never mutated; a failed fit never yields partial coefficients.
pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Vec<f64>, FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }

    let needed = degree + 1;
    if x.len() < needed {
        return Err(FitError::InsufficientData {
            needed,
            got: x.len(),
        });
    }

    let distinct = count_distinct(x);
    if distinct < needed {
        return Err(FitError::SingularSystem { distinct, needed });
    }

    // Vandermonde design matrix: row i is [1, x_i, x_i^2, ..., x_i^degree].
    let n = x.len();
    let mut design = DMatrix::<f64>::zeros(n, needed);
    for (i, &xi) in x.iter().enumerate() {
        let mut p = 1.0;
        for j in 0..needed {
            design[(i, j)] = p;
            p *= xi;
        }
    }
    let rhs = DVector::from_column_slice(y);

    let c =
        solve_least_squares(&design, &rhs).ok_or(FitError::SingularSystem { distinct, needed })?;

    // The solver returns coefficients in ascending-power (column) order.
    let mut coefficients: Vec<f64> = c.iter().copied().collect();
    coefficients.reverse();
    Ok(coefficients)
}

/// Evaluate a polynomial at `t`.
///
/// Coefficients are highest power first; evaluation uses Horner's method
/// (O(degree), numerically stable).
pub fn evaluate(coefficients: &[f64], t: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * t + c)
}

/// Coefficient of determination of a fit against the original samples.
///
/// `R² = 1 - SS_res / SS_tot`. When all `y` are identical (`SS_tot ≈ 0`),
/// returns `1.0` if the residuals are also ≈ 0, else `NaN` — the fit neither
/// explains nor fails to explain variance that does not exist.
pub fn r_squared(coefficients: &[f64], x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || x.len() != y.len() {
        return f64::NAN;
    }

    let mean = y.iter().sum::<f64>() / y.len() as f64;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let r = yi - evaluate(coefficients, xi);
        ss_res += r * r;
        let d = yi - mean;
        ss_tot += d * d;
    }

    if ss_tot <= SS_EPS {
        if ss_res <= SS_EPS {
            return 1.0;
        }
        return f64::NAN;
    }

    1.0 - ss_res / ss_tot
}

/// Densely sample the fitted polynomial over the span of the original data.
///
/// Produces `n` evenly spaced abscissas covering `[min(x), max(x)]` inclusive
/// (endpoints exact), the polynomial evaluated at each, and the R² of the fit
/// against `(x, y)`. `n` is clamped to at least 2.
pub fn sample_curve(coefficients: &[f64], x: &[f64], y: &[f64], n: usize) -> CurveSamples {
    let n = n.max(2);
    let (x_min, x_max) = span(x);

    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        // Lerp form keeps both endpoints bit-exact.
        let t = x_min * (1.0 - u) + x_max * u;
        xs.push(t);
        ys.push(evaluate(coefficients, t));
    }

    CurveSamples {
        xs,
        ys,
        r_squared: r_squared(coefficients, x, y),
    }
}

fn count_distinct(x: &[f64]) -> usize {
    let mut sorted = x.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted.dedup();
    sorted.len()
}

fn span(x: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in x {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        (0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-8;

    #[test]
    fn exact_quadratic_is_recovered() {
        // y = x^2 + x + 1 sampled exactly.
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 2.0, 5.0, 10.0];

        let c = fit(&x, &y, 2).unwrap();
        assert_eq!(c.len(), 3);
        assert!((c[0] - 1.0).abs() < TOL);
        assert!((c[1] - 1.0).abs() < TOL);
        assert!((c[2] - 1.0).abs() < TOL);

        let r2 = r_squared(&c, &x, &y);
        assert!((r2 - 1.0).abs() < TOL);
    }

    #[test]
    fn exact_cubic_reproduces_samples() {
        // y = 2x^3 - x^2 + 0.5x - 3 at each sample point.
        let coeffs_true = [2.0, -1.0, 0.5, -3.0];
        let x: Vec<f64> = (0..8).map(|i| i as f64 * 0.75).collect();
        let y: Vec<f64> = x.iter().map(|&xi| evaluate(&coeffs_true, xi)).collect();

        let c = fit(&x, &y, 3).unwrap();
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            assert!((evaluate(&c, xi) - yi).abs() < 1e-6);
        }
    }

    #[test]
    fn fit_is_deterministic() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [1.3, 0.9, 2.8, 7.1, 12.9];

        let a = fit(&x, &y, 2).unwrap();
        let b = fit(&x, &y, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn degree_zero_fits_mean() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];

        let c = fit(&x, &y, 0).unwrap();
        assert_eq!(c.len(), 1);
        assert!((c[0] - 5.0).abs() < TOL);
    }

    #[test]
    fn r_squared_bounded_above_by_one() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [0.2, 1.1, 3.9, 9.3, 15.8, 25.1];

        for degree in 0..4 {
            let c = fit(&x, &y, degree).unwrap();
            let r2 = r_squared(&c, &x, &y);
            assert!(r2 <= 1.0 + TOL, "degree {degree}: R² = {r2}");
        }
    }

    #[test]
    fn r_squared_degenerate_constant_data() {
        let x = [1.0, 2.0, 3.0];
        let y = [5.0, 5.0, 5.0];

        // A constant fit of constant data explains everything.
        let c = fit(&x, &y, 0).unwrap();
        assert!((r_squared(&c, &x, &y) - 1.0).abs() < TOL);

        // A wrong constant leaves residuals but no variance to explain.
        assert!(r_squared(&[7.0], &x, &y).is_nan());
    }

    #[test]
    fn insufficient_data_fails_fast() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 2.0, 3.0];

        let err = fit(&x, &y, 3).unwrap_err();
        assert_eq!(err, FitError::InsufficientData { needed: 4, got: 3 });
    }

    #[test]
    fn repeated_abscissas_are_singular() {
        // Plenty of points, but only two distinct x values for a cubic.
        let x = [1.0, 1.0, 1.0, 2.0, 2.0];
        let y = [3.0, 3.1, 2.9, 5.0, 5.2];

        let err = fit(&x, &y, 3).unwrap_err();
        assert_eq!(
            err,
            FitError::SingularSystem {
                distinct: 2,
                needed: 4
            }
        );
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = fit(&[1.0, 2.0], &[1.0], 0).unwrap_err();
        assert_eq!(err, FitError::LengthMismatch { x_len: 2, y_len: 1 });
    }

    #[test]
    fn horner_matches_naive_evaluation() {
        let c = [1.5, -2.0, 0.25, 4.0];
        for &t in &[-3.0, -0.5, 0.0, 0.1, 2.0, 10.0] {
            let naive = c[0] * t * t * t + c[1] * t * t + c[2] * t + c[3];
            assert!((evaluate(&c, t) - naive).abs() < 1e-9);
        }
    }

    #[test]
    fn sample_curve_endpoints_exact() {
        let x = [3.0, 1.0, 2.0, 7.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        let c = fit(&x, &y, 1).unwrap();

        let samples = sample_curve(&c, &x, &y, 2);
        assert_eq!(samples.xs, vec![1.0, 7.0]);
        assert_eq!(samples.ys.len(), 2);
    }

    #[test]
    fn sample_curve_is_evenly_spaced() {
        let x = [0.0, 10.0];
        let y = [0.0, 5.0];
        let c = fit(&x, &y, 1).unwrap();

        let samples = sample_curve(&c, &x, &y, 5);
        assert_eq!(samples.xs.len(), 5);
        for w in samples.xs.windows(2) {
            assert!((w[1] - w[0] - 2.5).abs() < 1e-12);
        }
        assert!((samples.r_squared - 1.0).abs() < TOL);
    }
}

