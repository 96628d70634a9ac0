//! Batch fermentation model: double Monod growth with Luedeking–Piret product
//! formation and a dissolved-oxygen balance.
//!
//! State `y = (X, S, P, O2)`:
//!
//! ```text
//! mu     = mu_max · S/(Ks + S) · O2/(Ko + O2)
//! dX/dt  = mu · X
//! dS/dt  = -(1/Yxs) · mu · X
//! dP/dt  = alpha · mu · X + beta · X
//! dO2/dt = kLa · (O2_sat - O2) - qO2 · X
//! ```
//!
//! Concentrations are not clamped; aggressive parameters may drive a state
//! slightly negative and that is reported as-is. The Monod terms have poles at
//! `S = -Ks` and `O2 = -Ko`; a state that reaches either one is an error.

use nalgebra::Vector4;

use crate::domain::{BatchParams, InitialState};
use crate::error::{CoreResult, KineticsError};

pub type State = Vector4<f64>;

/// Distance to a Monod pole, relative to `max(K, 1)`, treated as reaching it.
const POLE_MARGIN: f64 = 1e-6;

/// Right-hand side of an ODE system `dy/dt = f(t, y)`.
pub trait OdeSystem {
    fn derivative(&self, t: f64, y: &State) -> State;

    /// Reject states where `derivative` is undefined.
    fn check_state(&self, _t: f64, _y: &State) -> CoreResult<()> {
        Ok(())
    }
}

/// The batch model with a fixed parameter set.
#[derive(Debug, Clone, Copy)]
pub struct BatchModel {
    params: BatchParams,
}

impl BatchModel {
    /// Wrap `params`, rejecting sets whose derivative is undefined everywhere.
    pub fn new(params: BatchParams) -> CoreResult<Self> {
        if params.yield_xs == 0.0 {
            return Err(KineticsError::DivisionByZero { what: "substrate uptake (Yxs = 0)" });
        }
        let fields = [
            ("mu_max", params.mu_max),
            ("ks", params.ks),
            ("ko", params.ko),
            ("yield_xs", params.yield_xs),
            ("alpha", params.alpha),
            ("beta", params.beta),
            ("kla", params.kla),
            ("o2_sat", params.o2_sat),
            ("q_o2", params.q_o2),
        ];
        for (what, value) in fields {
            if !value.is_finite() {
                return Err(KineticsError::NonFinite { what, value });
            }
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &BatchParams {
        &self.params
    }

    /// Specific growth rate at the given substrate and oxygen levels.
    pub fn growth_rate(&self, s: f64, o2: f64) -> f64 {
        let p = &self.params;
        p.mu_max * (s / (p.ks + s)) * (o2 / (p.ko + o2))
    }
}

impl OdeSystem for BatchModel {
    fn derivative(&self, _t: f64, y: &State) -> State {
        let p = &self.params;
        let (x, s, o2) = (y[0], y[1], y[3]);
        let mu = self.growth_rate(s, o2);
        State::new(
            mu * x,
            -(1.0 / p.yield_xs) * mu * x,
            p.alpha * mu * x + p.beta * x,
            p.kla * (p.o2_sat - o2) - p.q_o2 * x,
        )
    }

    fn check_state(&self, t: f64, y: &State) -> CoreResult<()> {
        let p = &self.params;
        if at_pole(p.ks, y[1]) {
            return Err(KineticsError::Singularity {
                what: "substrate Monod term (S reached -Ks)",
                t,
            });
        }
        if at_pole(p.ko, y[3]) {
            return Err(KineticsError::Singularity {
                what: "oxygen Monod term (O2 reached -Ko)",
                t,
            });
        }
        Ok(())
    }
}

fn at_pole(k: f64, c: f64) -> bool {
    k + c <= POLE_MARGIN * k.abs().max(1.0)
}

pub fn initial_vector(initial: &InitialState) -> State {
    State::new(initial.x0, initial.s0, initial.p0, initial.o2_0)
}
