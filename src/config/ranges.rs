//! Runtime parameter ranges.
//!
//! Every user-adjustable number has a documented minimum, maximum and default.
//! The table is plain data so front-ends can list it and tests can check it
//! without running any computation.
//!
//! Reactor geometry is expressed in lab units here (cm, L); the kLa
//! correlation itself works in SI and the conversion happens when the CLI
//! builds [`ReactorConditions`](crate::domain::ReactorConditions).

use crate::domain::SimulationRequest;
use crate::error::{CoreResult, KineticsError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub unit: &'static str,
}

impl ParamRange {
    const fn new(name: &'static str, min: f64, max: f64, default: f64, unit: &'static str) -> Self {
        Self {
            name,
            min,
            max,
            default,
            unit,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Return `value` unchanged when it lies inside the range.
    pub fn check(&self, value: f64) -> CoreResult<f64> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(KineticsError::ParameterOutOfRange {
                name: self.name,
                value,
                min: self.min,
                max: self.max,
                unit: self.unit,
            })
        }
    }
}

pub const RPM: ParamRange = ParamRange::new("rpm", 100.0, 1000.0, 450.0, "rpm");
pub const AERATION_VVM: ParamRange = ParamRange::new("aeration", 0.1, 5.0, 3.0, "vvm");
pub const IMPELLER_DIAMETER_CM: ParamRange = ParamRange::new("impeller_diameter", 1.0, 10.0, 3.0, "cm");
pub const VOLUME_L: ParamRange = ParamRange::new("volume", 0.1, 10.0, 1.5, "L");

pub const MU_MAX: ParamRange = ParamRange::new("mu_max", 0.1, 1.0, 0.4, "1/h");
pub const KS: ParamRange = ParamRange::new("ks", 0.1, 5.0, 0.5, "g/L");
pub const KO: ParamRange = ParamRange::new("ko", 0.01, 1.0, 0.1, "mg/L");
pub const YIELD_XS: ParamRange = ParamRange::new("yield_xs", 0.1, 1.0, 0.5, "gX/gS");
pub const ALPHA: ParamRange = ParamRange::new("alpha", 0.0, 1.0, 0.1, "mgP/gX");
pub const BETA: ParamRange = ParamRange::new("beta", 0.0, 0.1, 0.02, "mgP/gX/h");
// Upper bound and default are a deliberate choice; the historical slider for
// this parameter was declared with inconsistent integer bounds.
pub const KLA: ParamRange = ParamRange::new("kla", 0.0, 10.0, 10.0, "1/h");
pub const O2_SAT: ParamRange = ParamRange::new("o2_sat", 5.0, 10.0, 8.0, "mg/L");
pub const Q_O2: ParamRange = ParamRange::new("q_o2", 0.1, 2.0, 0.5, "mgO2/gX/h");

pub const X0: ParamRange = ParamRange::new("x0", 0.01, 10.0, 0.1, "g/L");
pub const S0: ParamRange = ParamRange::new("s0", 0.1, 50.0, 10.0, "g/L");
pub const P0: ParamRange = ParamRange::new("p0", 0.0, 100.0, 0.0, "mg/L");
pub const O2_0: ParamRange = ParamRange::new("o2_0", 0.0, 10.0, 7.5, "mg/L");
pub const FINAL_TIME: ParamRange = ParamRange::new("final_time", 12.0, 200.0, 72.0, "h");

/// The whole table, in display order.
pub const ALL: [ParamRange; 18] = [
    RPM,
    AERATION_VVM,
    IMPELLER_DIAMETER_CM,
    VOLUME_L,
    MU_MAX,
    KS,
    KO,
    YIELD_XS,
    ALPHA,
    BETA,
    KLA,
    O2_SAT,
    Q_O2,
    X0,
    S0,
    P0,
    O2_0,
    FINAL_TIME,
];

/// Check reactor inputs given in lab units (rpm, vvm, cm, L).
pub fn check_reactor(rpm: f64, aeration_vvm: f64, diameter_cm: f64, volume_l: f64) -> CoreResult<()> {
    RPM.check(rpm)?;
    AERATION_VVM.check(aeration_vvm)?;
    IMPELLER_DIAMETER_CM.check(diameter_cm)?;
    VOLUME_L.check(volume_l)?;
    Ok(())
}

/// Check every kinetic constant, initial concentration and the horizon.
pub fn check_simulation(request: &SimulationRequest) -> CoreResult<()> {
    let p = &request.params;
    let s = &request.initial;
    let checks = [
        (MU_MAX, p.mu_max),
        (KS, p.ks),
        (KO, p.ko),
        (YIELD_XS, p.yield_xs),
        (ALPHA, p.alpha),
        (BETA, p.beta),
        (KLA, p.kla),
        (O2_SAT, p.o2_sat),
        (Q_O2, p.q_o2),
        (X0, s.x0),
        (S0, s.s0),
        (P0, s.p0),
        (O2_0, s.o2_0),
        (FINAL_TIME, request.final_time),
    ];
    for (range, value) in checks {
        range.check(value)?;
    }
    Ok(())
}
