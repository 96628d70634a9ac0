//! Volumetric oxygen transfer coefficient (kLa) estimate.
//!
//! Empirical power law for a sparged, mechanically stirred vessel:
//!
//! ```text
//! N    = rpm / 60                      impeller speed (1/s)
//! Q    = vvm · V / 60                  gas flow
//! vs   = Q / (π · d_sparger² / 4)      superficial gas velocity
//! Pg/V = N³ · D⁵ / V                   specific power proxy
//! kLa  = k · (Pg/V)^alpha · vs^beta · N^gamma
//! ```
//!
//! This is a calibration curve, not a derivation; the constants live in
//! [`TransferCorrelation`] so they can be refitted without touching the formula.

use std::f64::consts::PI;

use crate::domain::{ReactorConditions, TransferCorrelation};
use crate::error::{CoreResult, KineticsError, ensure_finite};

/// Estimate kLa (1/h) for the given operating point.
pub fn estimate_kla(conditions: &ReactorConditions, correlation: &TransferCorrelation) -> CoreResult<f64> {
    if conditions.volume_m3 == 0.0 {
        return Err(KineticsError::DivisionByZero { what: "specific power (zero volume)" });
    }
    if conditions.volume_m3 < 0.0 {
        return Err(KineticsError::InvalidParameter {
            name: "volume",
            reason: format!("must be positive, got {}", conditions.volume_m3),
        });
    }

    let area = sparger_area(correlation.sparger_diameter_m)?;

    let n = conditions.rpm / 60.0;
    let q = conditions.aeration_vvm * conditions.volume_m3 / 60.0;
    let vs = q / area;
    let pg_v = n.powi(3) * conditions.impeller_diameter_m.powi(5) / conditions.volume_m3;

    let kla = correlation.k * pg_v.powf(correlation.alpha) * vs.powf(correlation.beta) * n.powf(correlation.gamma);
    ensure_finite(kla, "kLa")
}

fn sparger_area(diameter_m: f64) -> CoreResult<f64> {
    let area = PI * diameter_m * diameter_m / 4.0;
    if area == 0.0 {
        return Err(KineticsError::DivisionByZero { what: "superficial gas velocity (zero sparger area)" });
    }
    Ok(area)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_conditions() -> ReactorConditions {
        ReactorConditions {
            rpm: 450.0,
            aeration_vvm: 3.0,
            impeller_diameter_m: 0.03,
            volume_m3: 0.0015,
        }
    }

    #[test]
    fn golden_value() {
        let kla = estimate_kla(&reference_conditions(), &TransferCorrelation::default()).unwrap();
        assert!((kla - 3.911265913711215e-5).abs() < 1e-15, "kla={kla:e}");
    }

    #[test]
    fn zero_volume_is_explicit() {
        let mut c = reference_conditions();
        c.volume_m3 = 0.0;
        let err = estimate_kla(&c, &TransferCorrelation::default()).unwrap_err();
        assert!(matches!(err, KineticsError::DivisionByZero { .. }));
    }

    #[test]
    fn zero_sparger_diameter_is_explicit() {
        let corr = TransferCorrelation {
            sparger_diameter_m: 0.0,
            ..TransferCorrelation::default()
        };
        let err = estimate_kla(&reference_conditions(), &corr).unwrap_err();
        assert!(matches!(err, KineticsError::DivisionByZero { .. }));
    }

    #[test]
    fn negative_rpm_is_non_finite() {
        let mut c = reference_conditions();
        c.rpm = -100.0;
        let err = estimate_kla(&c, &TransferCorrelation::default()).unwrap_err();
        assert!(matches!(err, KineticsError::NonFinite { .. }));
    }

    #[test]
    fn constants_are_configurable() {
        let doubled = TransferCorrelation {
            k: 0.004,
            ..TransferCorrelation::default()
        };
        let base = estimate_kla(&reference_conditions(), &TransferCorrelation::default()).unwrap();
        let scaled = estimate_kla(&reference_conditions(), &doubled).unwrap();
        assert!((scaled / base - 2.0).abs() < 1e-12);
    }
}
