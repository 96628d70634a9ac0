//! Adaptive Dormand–Prince 5(4) integrator with output on a fixed grid.
//!
//! The solver takes as many internal steps as the error controller asks for
//! and records the state exactly at each requested grid time (steps are
//! clipped to land on grid points, no interpolation). The embedded 4th-order
//! solution is only used for the local error estimate; the 5th-order solution
//! advances the state. Every accepted state goes through
//! [`OdeSystem::check_state`], so a run cannot silently step across a
//! singularity of the right-hand side.

use crate::error::{CoreResult, KineticsError};
use crate::sim::model::{OdeSystem, State};

/// Tolerances and step budget.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    pub rtol: f64,
    pub atol: f64,
    pub h_min: f64,
    /// Total internal steps (accepted + rejected) over the whole grid.
    pub max_steps: usize,
}

impl Default for SolverOptions {
    /// Matches the classic LSODA defaults (`rtol = atol ≈ 1.49e-8`).
    fn default() -> Self {
        Self {
            rtol: 1.49012e-8,
            atol: 1.49012e-8,
            h_min: 1e-12,
            max_steps: 200_000,
        }
    }
}

impl SolverOptions {
    fn validate(&self) -> CoreResult<()> {
        for (name, value) in [("rtol", self.rtol), ("atol", self.atol), ("h_min", self.h_min)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(KineticsError::InvalidParameter {
                    name,
                    reason: format!("must be finite and > 0, got {value}"),
                });
            }
        }
        if self.max_steps == 0 {
            return Err(KineticsError::InvalidParameter {
                name: "max_steps",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

// Dormand–Prince tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights (advance).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// 4th-order weights (error estimate only).
const BS1: f64 = 5179.0 / 57600.0;
const BS3: f64 = 7571.0 / 16695.0;
const BS4: f64 = 393.0 / 640.0;
const BS5: f64 = -92097.0 / 339200.0;
const BS6: f64 = 187.0 / 2100.0;
const BS7: f64 = 1.0 / 40.0;

const E1: f64 = B1 - BS1;
const E3: f64 = B3 - BS3;
const E4: f64 = B4 - BS4;
const E5: f64 = B5 - BS5;
const E6: f64 = B6 - BS6;
const E7: f64 = -BS7;

/// Integrate `sys` from `(grid[0], y0)` and return the state at every grid time.
///
/// `grid` must be non-decreasing. The first output is `y0` itself.
pub fn integrate<S: OdeSystem>(sys: &S, y0: State, grid: &[f64], opts: &SolverOptions) -> CoreResult<Vec<State>> {
    opts.validate()?;
    let mut out = Vec::with_capacity(grid.len());
    let Some(&t0) = grid.first() else {
        return Ok(out);
    };
    if !t0.is_finite() {
        return Err(KineticsError::NonFinite { what: "initial time", value: t0 });
    }
    if let Some((i, _)) = y0.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(KineticsError::NonFinite { what: "initial state", value: y0[i] });
    }

    sys.check_state(t0, &y0)?;
    out.push(y0);

    let span = grid[grid.len() - 1] - t0;
    let mut h = (span * 1e-3).max(opts.h_min);
    let mut t = t0;
    let mut y = y0;
    let mut k1 = sys.derivative(t, &y);
    let mut steps = 0usize;

    for &t_next in &grid[1..] {
        if !(t_next >= t) {
            return Err(KineticsError::InvalidParameter {
                name: "time grid",
                reason: format!("must be non-decreasing (got {t_next} after {t})"),
            });
        }

        while t < t_next {
            if steps >= opts.max_steps {
                return Err(KineticsError::SolverFailure(format!(
                    "exceeded {} steps at t={t:.6e} before reaching t={t_next:.6e}",
                    opts.max_steps
                )));
            }
            steps += 1;

            let remaining = t_next - t;
            let clipped = h >= remaining;
            let h_try = if clipped { remaining } else { h };

            let k2 = sys.derivative(t + C2 * h_try, &(y + k1 * (h_try * A21)));
            let k3 = sys.derivative(t + C3 * h_try, &(y + (k1 * A31 + k2 * A32) * h_try));
            let k4 = sys.derivative(t + C4 * h_try, &(y + (k1 * A41 + k2 * A42 + k3 * A43) * h_try));
            let k5 = sys.derivative(
                t + C5 * h_try,
                &(y + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h_try),
            );
            let k6 = sys.derivative(
                t + h_try,
                &(y + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h_try),
            );
            let y_new = y + (k1 * B1 + k3 * B3 + k4 * B4 + k5 * B5 + k6 * B6) * h_try;
            let k7 = sys.derivative(t + h_try, &y_new);

            let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h_try;
            let err_norm = error_norm(&err, &y, &y_new, opts);

            let accepted = err_norm <= 1.0;
            if accepted {
                t = if clipped { t_next } else { t + h_try };
                sys.check_state(t, &y_new)?;
                y = y_new;
                k1 = k7; // FSAL
            } else if h_try <= opts.h_min {
                sys.check_state(t + h_try, &y_new)?;
                return Err(KineticsError::SolverFailure(format!(
                    "step size fell below {:e} at t={t:.6e}",
                    opts.h_min
                )));
            }

            let factor = if err_norm == 0.0 {
                5.0
            } else {
                (0.9 * err_norm.powf(-0.2)).clamp(0.2, 5.0)
            };
            let proposed = (h_try * factor).max(opts.h_min);
            // A step shortened to hit a grid point says nothing about the
            // usable step size; keep the larger of the two.
            h = if clipped && accepted { h.max(proposed) } else { proposed };
        }

        out.push(y);
    }

    Ok(out)
}

fn error_norm(err: &State, y: &State, y_new: &State, opts: &SolverOptions) -> f64 {
    let mut acc = 0.0;
    for i in 0..err.len() {
        let scale = opts.atol + opts.rtol * y[i].abs().max(y_new[i].abs());
        let r = err[i] / scale;
        acc += r * r;
    }
    let norm = (acc / err.len() as f64).sqrt();
    if norm.is_finite() { norm } else { f64::INFINITY }
}
