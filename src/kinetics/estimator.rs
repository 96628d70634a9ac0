//! Growth kinetics from an exponential-phase window.
//!
//! Given a validated series and a window:
//!
//! 1. `mu` is the slope of `ln(X)` vs `t` over the window (OLS)
//! 2. `td = ln 2 / mu`
//! 3. `Yxs = (X[last] - X[first]) / (S[first] - S[last])` over two fixed
//!    samples of the *full* series ([`YieldSamples`])
//! 4. `qs = mu / Yxs`
//!
//! A zero substrate change makes `Yxs` (and then `qs`) 0 with
//! `yield_degenerate` set; a zero `mu` is an error because `td` is undefined.

use std::f64::consts::LN_2;

use tracing::{debug, warn};

use crate::domain::{GrowthKinetics, PhaseWindow, TimeSeries, YieldSamples};
use crate::error::{CoreResult, KineticsError};
use crate::kinetics::phase::select_phase;
use crate::math::{LinearFit, linear_regression};

/// Run the full estimator on a series.
pub fn estimate_kinetics(
    series: &TimeSeries,
    window: PhaseWindow,
    yield_samples: YieldSamples,
) -> CoreResult<GrowthKinetics> {
    ensure_yield_samples(series.len(), yield_samples)?;

    let indices = select_phase(series.time(), window)?;
    let range = indices.range();
    let fit = fit_growth_rate(&series.time()[range.clone()], &series.biomass()[range])?;
    let doubling_time = doubling_time(fit.slope)?;

    let (yield_xs, yield_degenerate) = biomass_yield(series.biomass(), series.substrate(), yield_samples)?;
    if yield_degenerate {
        warn!(
            first = yield_samples.first,
            last = yield_samples.last,
            "no substrate consumed between yield samples; Yxs and qs reported as 0"
        );
    }
    let qs = specific_consumption(fit.slope, yield_xs);

    debug!(
        mu = fit.slope,
        r_squared = fit.r_squared(),
        doubling_time,
        yield_xs,
        qs,
        "kinetics estimated"
    );

    Ok(GrowthKinetics {
        mu: fit.slope,
        intercept: fit.intercept,
        r: fit.r,
        r_squared: fit.r_squared(),
        doubling_time,
        yield_xs,
        qs,
        yield_degenerate,
        window,
        indices,
        yield_samples,
    })
}

/// Regress `ln(biomass)` on `time` over an already-windowed slice.
pub fn fit_growth_rate(time: &[f64], biomass: &[f64]) -> CoreResult<LinearFit> {
    let mut ln_biomass = Vec::with_capacity(biomass.len());
    for (index, &value) in biomass.iter().enumerate() {
        if value <= 0.0 {
            return Err(KineticsError::Domain { index, value });
        }
        ln_biomass.push(value.ln());
    }
    linear_regression(time, &ln_biomass)
}

/// `ln 2 / mu`; undefined for `mu == 0`.
///
/// A negative `mu` (declining culture) gives a negative doubling time, i.e.
/// the magnitude is a halving time.
pub fn doubling_time(mu: f64) -> CoreResult<f64> {
    if mu == 0.0 {
        return Err(KineticsError::DivisionByZero { what: "doubling time" });
    }
    Ok(LN_2 / mu)
}

/// Biomass/substrate yield between two fixed samples.
///
/// Returns `(yield, degenerate)`; `degenerate` is set when the substrate did
/// not change and the yield is reported as 0.
pub fn biomass_yield(biomass: &[f64], substrate: &[f64], samples: YieldSamples) -> CoreResult<(f64, bool)> {
    ensure_yield_samples(biomass.len().min(substrate.len()), samples)?;

    let delta_x = biomass[samples.last] - biomass[samples.first];
    let delta_s = substrate[samples.first] - substrate[samples.last];
    if delta_s == 0.0 {
        return Ok((0.0, true));
    }
    Ok((delta_x / delta_s, false))
}

/// `mu / Yxs`, or 0 when the yield is 0.
pub fn specific_consumption(mu: f64, yield_xs: f64) -> f64 {
    if yield_xs == 0.0 { 0.0 } else { mu / yield_xs }
}

fn ensure_yield_samples(len: usize, samples: YieldSamples) -> CoreResult<()> {
    let needed = samples.first.max(samples.last) + 1;
    if len < needed {
        return Err(KineticsError::InsufficientData {
            what: "yield calculation",
            needed,
            got: len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::demo_series;

    fn series(time: &[f64], biomass: &[f64], substrate: &[f64]) -> TimeSeries {
        TimeSeries::new(
            time.to_vec(),
            biomass.to_vec(),
            substrate.to_vec(),
            vec![100.0; time.len()],
        )
        .unwrap()
    }

    #[test]
    fn doubling_example() {
        let fit = fit_growth_rate(&[0.0, 4.0, 8.0], &[1.0, 2.0, 4.0]).unwrap();
        let expected = 4.0_f64.ln() / 8.0;
        assert!((fit.slope - expected).abs() < 1e-12);
        let td = doubling_time(fit.slope).unwrap();
        assert!((td - 4.0).abs() < 1e-10);
    }

    #[test]
    fn demo_data_reference_values() {
        let ts = demo_series().unwrap();
        let k = estimate_kinetics(&ts, ts.default_window(), YieldSamples::default()).unwrap();
        assert!((k.mu - 0.3795355905583949).abs() < 1e-10);
        assert!((k.doubling_time - 1.8263035082958798).abs() < 1e-9);
        assert!((k.yield_xs - 0.518103).abs() < 1e-12);
        assert!((k.qs - 0.7325485290731668).abs() < 1e-9);
        assert!((k.r_squared - 0.9440291955322782).abs() < 1e-10);
        assert!(!k.yield_degenerate);
        assert_eq!(k.indices.end, 2);
    }

    #[test]
    fn non_positive_biomass_in_window_is_domain_error() {
        let err = fit_growth_rate(&[0.0, 1.0, 2.0], &[1.0, 0.0, 2.0]).unwrap_err();
        assert!(matches!(err, KineticsError::Domain { index: 1, .. }));
    }

    #[test]
    fn zero_growth_rate_is_division_by_zero() {
        let time = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ts = series(&time, &[2.0; 7], &[10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0]);
        let err = estimate_kinetics(&ts, PhaseWindow { start: 0.0, end: 3.0 }, YieldSamples::default())
            .unwrap_err();
        assert!(matches!(err, KineticsError::DivisionByZero { what: "doubling time" }));
    }

    #[test]
    fn unchanged_substrate_gives_degenerate_zero_yield() {
        let time = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let biomass = [1.0, 2.0, 4.0, 8.0, 9.0, 9.5, 10.0];
        let ts = series(&time, &biomass, &[5.0, 4.0, 3.0, 2.0, 1.0, 3.0, 5.0]);
        let k = estimate_kinetics(&ts, PhaseWindow { start: 0.0, end: 3.0 }, YieldSamples::default()).unwrap();
        assert_eq!(k.yield_xs, 0.0);
        assert_eq!(k.qs, 0.0);
        assert!(k.yield_degenerate);
    }

    #[test]
    fn short_series_is_insufficient_for_yield() {
        let ts = series(&[0.0, 4.0, 8.0], &[1.0, 2.0, 4.0], &[10.0, 8.0, 6.0]);
        let err = estimate_kinetics(&ts, PhaseWindow { start: 0.0, end: 8.0 }, YieldSamples::default())
            .unwrap_err();
        assert!(matches!(err, KineticsError::InsufficientData { needed: 7, got: 3, .. }));
    }

    #[test]
    fn yield_samples_are_overridable() {
        let ts = series(&[0.0, 4.0, 8.0], &[1.0, 2.0, 4.0], &[10.0, 8.0, 6.0]);
        let samples = YieldSamples { first: 0, last: 2 };
        let k = estimate_kinetics(&ts, PhaseWindow { start: 0.0, end: 8.0 }, samples).unwrap();
        assert!((k.yield_xs - 0.75).abs() < 1e-12);
        assert!((k.qs - k.mu / 0.75).abs() < 1e-12);
    }

    #[test]
    fn yield_ignores_the_phase_window() {
        let ts = demo_series().unwrap();
        let a = estimate_kinetics(&ts, PhaseWindow { start: 0.0, end: 8.0 }, YieldSamples::default()).unwrap();
        let b = estimate_kinetics(&ts, PhaseWindow { start: 4.0, end: 12.0 }, YieldSamples::default()).unwrap();
        assert_eq!(a.yield_xs, b.yield_xs);
        assert_ne!(a.mu, b.mu);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn recovers_noise_free_growth(mu in -1.0_f64..1.0, c in -3.0_f64..3.0, n in 2usize..20) {
            let time: Vec<f64> = (0..n).map(|i| i as f64 * 1.5).collect();
            let biomass: Vec<f64> = time.iter().map(|t| (mu * t + c).exp()).collect();
            let fit = fit_growth_rate(&time, &biomass).unwrap();
            prop_assert!((fit.slope - mu).abs() < 1e-8);
            prop_assert!((fit.intercept - c).abs() < 1e-8);
        }

        #[test]
        fn doubling_time_times_mu_is_ln2(magnitude in 1e-6_f64..1e3, negative in any::<bool>()) {
            let mu = if negative { -magnitude } else { magnitude };
            let td = doubling_time(mu).unwrap();
            prop_assert!((td * mu - LN_2).abs() < 1e-12);
        }
    }
}
