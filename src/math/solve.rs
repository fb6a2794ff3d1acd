//! Least squares solver.
//!
//! The fit engine reduces polynomial fitting to one linear regression:
//!
//! ```text
//! minimize Σ (y_i - v_i^T c)^2
//! ```
//!
//! where `v_i` is the Vandermonde row of the i-th abscissa.
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Pump curve fits have a tiny parameter dimension (4 columns for a cubic),
//!   so SVD performance is a non-issue.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(design: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    // Vandermonde columns become nearly collinear for clustered abscissas or
    // high degrees, so we try progressively looser tolerances before giving up.
    let svd = design.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(c) = svd.solve(y, tol) {
            if c.iter().all(|v| v.is_finite()) {
                return Some(c);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let design = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let c = solve_least_squares(&design, &y).unwrap();
        assert!((c[0] - 2.0).abs() < 1e-10);
        assert!((c[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_handles_tall_system() {
        // Overdetermined: y = 1 + 2x plus noise orthogonal to both design
        // columns, so the least-squares line is unchanged.
        let design = DMatrix::from_row_slice(
            4,
            2,
            &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0],
        );
        let y = DVector::from_row_slice(&[1.1, 2.9, 4.9, 7.1]);

        let c = solve_least_squares(&design, &y).unwrap();
        assert!((c[0] - 1.0).abs() < 1e-9);
        assert!((c[1] - 2.0).abs() < 1e-9);
    }
}
