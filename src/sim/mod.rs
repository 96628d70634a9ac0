//! Batch fermentation simulation.
//!
//! - `model`: the ODE right-hand side
//! - `solver`: adaptive integrator sampling on a fixed grid

pub mod model;
pub mod solver;

pub use model::{BatchModel, OdeSystem, State, initial_vector};
pub use solver::{SolverOptions, integrate};

use tracing::{debug, warn};

use crate::domain::{SimulationRequest, Trajectory};
use crate::error::{CoreResult, KineticsError};
use crate::math::linspace;

/// Simulate a batch run with default solver tolerances.
pub fn simulate(request: &SimulationRequest) -> CoreResult<Trajectory> {
    simulate_with(request, &SolverOptions::default())
}

pub fn simulate_with(request: &SimulationRequest, options: &SolverOptions) -> CoreResult<Trajectory> {
    if !(request.final_time.is_finite() && request.final_time > 0.0) {
        return Err(KineticsError::InvalidParameter {
            name: "final_time",
            reason: format!("must be finite and > 0, got {}", request.final_time),
        });
    }
    if request.grid_points < 2 {
        return Err(KineticsError::InvalidParameter {
            name: "grid_points",
            reason: format!("need at least 2, got {}", request.grid_points),
        });
    }

    let model = BatchModel::new(request.params)?;
    let grid = linspace(0.0, request.final_time, request.grid_points);
    let states = integrate(&model, initial_vector(&request.initial), &grid, options)?;

    let mut trajectory = Trajectory::with_capacity(grid.len());
    for (t, y) in grid.iter().zip(&states) {
        trajectory.time.push(*t);
        trajectory.biomass.push(y[0]);
        trajectory.substrate.push(y[1]);
        trajectory.product.push(y[2]);
        trajectory.oxygen.push(y[3]);
    }

    for (name, values) in [
        ("biomass", &trajectory.biomass),
        ("substrate", &trajectory.substrate),
        ("product", &trajectory.product),
        ("oxygen", &trajectory.oxygen),
    ] {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        if min < 0.0 {
            warn!(state = name, min, "simulated concentration went negative");
        }
    }

    debug!(
        points = trajectory.len(),
        final_biomass = trajectory.biomass.last().copied().unwrap_or(f64::NAN),
        final_substrate = trajectory.substrate.last().copied().unwrap_or(f64::NAN),
        "batch simulation finished"
    );

    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BatchParams, DEFAULT_GRID_POINTS, InitialState};

    #[test]
    fn default_run_has_requested_grid() {
        let traj = simulate(&SimulationRequest::default()).unwrap();
        assert_eq!(traj.len(), DEFAULT_GRID_POINTS);
        assert_eq!(traj.time[0], 0.0);
        assert!((traj.time[DEFAULT_GRID_POINTS - 1] - 72.0).abs() < 1e-12);
        assert_eq!(traj.biomass[0], 0.1);
        assert_eq!(traj.substrate[0], 10.0);
    }

    #[test]
    fn biomass_grows_to_yield_limit() {
        let traj = simulate(&SimulationRequest::default()).unwrap();
        for pair in traj.biomass.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-6, "{} -> {}", pair[0], pair[1]);
        }
        // All substrate converted: X_end ≈ X0 + Yxs · S0.
        let x_end = *traj.biomass.last().unwrap();
        assert!((x_end - 5.1).abs() < 1e-2, "x_end={x_end}");
        let s_end = *traj.substrate.last().unwrap();
        assert!(s_end.abs() < 1e-2, "s_end={s_end}");
    }

    #[test]
    fn mass_balance_holds_along_trajectory() {
        let traj = simulate(&SimulationRequest::default()).unwrap();
        // X + Yxs · S is invariant for this model.
        for (x, s) in traj.biomass.iter().zip(&traj.substrate) {
            assert!((x + 0.5 * s - 5.1).abs() < 1e-5);
        }
    }

    #[test]
    fn no_growth_keeps_biomass_constant() {
        let request = SimulationRequest {
            params: BatchParams {
                mu_max: 0.0,
                ..BatchParams::default()
            },
            ..SimulationRequest::default()
        };
        let traj = simulate(&request).unwrap();
        assert!(traj.biomass.iter().all(|&x| (x - 0.1).abs() < 1e-12));
        assert!(traj.substrate.iter().all(|&s| (s - 10.0).abs() < 1e-12));
    }

    #[test]
    fn zero_initial_biomass_stays_zero() {
        let request = SimulationRequest {
            initial: InitialState {
                x0: 0.0,
                ..InitialState::default()
            },
            ..SimulationRequest::default()
        };
        let traj = simulate(&request).unwrap();
        assert!(traj.biomass.iter().all(|&x| x == 0.0));
        // Oxygen relaxes towards saturation.
        assert!((traj.oxygen.last().unwrap() - 8.0).abs() < 1e-6);
    }

    fn oxygen_limited(kla: f64, q_o2: f64) -> SimulationRequest {
        SimulationRequest {
            params: BatchParams {
                kla,
                q_o2,
                ..BatchParams::default()
            },
            ..SimulationRequest::default()
        }
    }

    #[test]
    fn negative_oxygen_is_reported_unclamped() {
        let traj = simulate(&oxygen_limited(1.0, 2.0)).unwrap();
        let min_o2 = traj.oxygen.iter().copied().fold(f64::INFINITY, f64::min);
        assert!(min_o2 < 0.0, "min_o2={min_o2}");
        // Above the pole at -Ko.
        assert!(min_o2 > -0.1, "min_o2={min_o2}");
    }

    #[test]
    fn unaerated_run_stops_at_oxygen_pole() {
        for q_o2 in [0.1, 0.5] {
            let err = simulate(&oxygen_limited(0.0, q_o2)).unwrap_err();
            assert!(
                matches!(err, KineticsError::Singularity { what, t } if what.contains("O2") && t > 0.0 && t < 72.0),
                "q_o2={q_o2}: {err:?}"
            );
            assert_eq!(err.exit_code(), 4);
        }
    }

    #[test]
    fn rejects_degenerate_requests() {
        let bad_time = SimulationRequest {
            final_time: 0.0,
            ..SimulationRequest::default()
        };
        assert!(matches!(
            simulate(&bad_time).unwrap_err(),
            KineticsError::InvalidParameter { name: "final_time", .. }
        ));

        let bad_grid = SimulationRequest {
            grid_points: 1,
            ..SimulationRequest::default()
        };
        assert!(matches!(
            simulate(&bad_grid).unwrap_err(),
            KineticsError::InvalidParameter { name: "grid_points", .. }
        ));
    }
}
