//! Least squares and simple linear regression.
//!
//! The growth-rate estimate is an ordinary least squares problem:
//!
//! ```text
//! minimize Σ (ln X_i - (c + mu * t_i))^2
//! ```
//!
//! Implementation choices:
//! - We build the `[1, t]` design matrix and solve it with SVD, which stays
//!   robust for tall systems and tolerates nearly collinear columns.
//! - The correlation coefficient is computed separately from centred sums so
//!   it matches the textbook Pearson definition.

use nalgebra::{DMatrix, DVector};

use crate::error::{CoreResult, KineticsError};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Straight-line fit `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation; 0 when `y` has no variance.
    pub r: f64,
}

impl LinearFit {
    pub fn r_squared(&self) -> f64 {
        self.r * self.r
    }
}

/// Fit a straight line through `(x_i, y_i)`.
pub fn linear_regression(x: &[f64], y: &[f64]) -> CoreResult<LinearFit> {
    if x.len() != y.len() {
        return Err(KineticsError::InvalidParameter {
            name: "regression",
            reason: format!("x has {} values but y has {}", x.len(), y.len()),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(KineticsError::InsufficientData {
            what: "linear regression",
            needed: 2,
            got: n,
        });
    }

    let design = DMatrix::from_fn(n, 2, |row, col| if col == 0 { 1.0 } else { x[row] });
    let rhs = DVector::from_column_slice(y);
    let beta = solve_least_squares(&design, &rhs).ok_or(KineticsError::DivisionByZero {
        what: "regression slope (all times identical)",
    })?;

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return Err(KineticsError::DivisionByZero {
            what: "regression slope (all times identical)",
        });
    }

    // Flat data: report an exact zero slope rather than SVD round-off.
    if syy == 0.0 {
        return Ok(LinearFit {
            slope: 0.0,
            intercept: mean_y,
            r: 0.0,
        });
    }

    Ok(LinearFit {
        slope: beta[1],
        intercept: beta[0],
        r: (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn regression_recovers_exact_line() {
        let x = [0.0, 4.0, 8.0, 12.0];
        let y: Vec<f64> = x.iter().map(|t| -1.5 + 0.25 * t).collect();
        let fit = linear_regression(&x, &y).unwrap();
        assert!((fit.slope - 0.25).abs() < 1e-12);
        assert!((fit.intercept + 1.5).abs() < 1e-12);
        assert!((fit.r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn regression_on_flat_data_has_zero_correlation() {
        let fit = linear_regression(&[0.0, 1.0, 2.0], &[3.0, 3.0, 3.0]).unwrap();
        assert!(fit.slope.abs() < 1e-12);
        assert_eq!(fit.r, 0.0);
    }

    #[test]
    fn regression_matches_reference_values() {
        // ln of the demo biomass over the first three samples.
        let x = [0.0, 4.0, 8.0];
        let y: Vec<f64> = [0.26567_f64, 2.3, 5.5333].iter().map(|v| v.ln()).collect();
        let fit = linear_regression(&x, &y).unwrap();
        assert!((fit.slope - 0.3795355905583949).abs() < 1e-10);
        assert!((fit.intercept + 1.1120779743576934).abs() < 1e-10);
        assert!((fit.r_squared() - 0.9440291955322782).abs() < 1e-10);
    }

    #[test]
    fn regression_needs_two_points() {
        let err = linear_regression(&[1.0], &[1.0]).unwrap_err();
        assert!(matches!(err, KineticsError::InsufficientData { needed: 2, got: 1, .. }));
    }
}
