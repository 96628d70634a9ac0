//! Steepest observed rates, by forward differences over the full series.

use crate::domain::{RateSummary, TimeSeries};
use crate::error::{CoreResult, KineticsError};
use crate::math::slopes;

/// Maximum growth, substrate consumption and oxygen uptake rates.
///
/// Consumption and uptake are reported as positive numbers (the negated
/// steepest decline); a series that never declines gives a negative value.
pub fn max_rates(series: &TimeSeries) -> CoreResult<RateSummary> {
    if series.len() < 2 {
        return Err(KineticsError::InsufficientData {
            what: "rate summary",
            needed: 2,
            got: series.len(),
        });
    }

    let t = series.time();
    Ok(RateSummary {
        max_growth_rate: max_of(&slopes(t, series.biomass())),
        max_substrate_rate: -min_of(&slopes(t, series.substrate())),
        max_oxygen_uptake_rate: -min_of(&slopes(t, series.oxygen())),
    })
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}
