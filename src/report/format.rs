//! Formatted terminal output for analysis, kLa and simulation runs.
//!
//! All formatting lives here so the numerical modules stay free of
//! presentation concerns and output changes stay localized.

use crate::domain::{
    GrowthKinetics, Interpretation, RateSummary, ReactorConditions, Severity, SimulationRequest, TimeSeries,
    Trajectory,
};

/// Format the analysis summary (data set + window + kinetic parameters + rates).
pub fn format_analysis_summary(
    source_label: &str,
    series: &TimeSeries,
    kinetics: &GrowthKinetics,
    rates: &RateSummary,
    kla: f64,
) -> String {
    let mut out = String::new();

    out.push_str("=== kin - Batch Kinetics Analysis ===\n");
    out.push_str(&format!("Source: {source_label}\n"));
    let time = series.time();
    out.push_str(&format!(
        "Samples: n={} | t=[{:.2}, {:.2}] h\n",
        series.len(),
        time.first().copied().unwrap_or(f64::NAN),
        time.last().copied().unwrap_or(f64::NAN),
    ));
    out.push_str(&format!(
        "Exponential window: [{:.2}, {:.2}] h (samples {}..={}, n={})\n",
        kinetics.window.start,
        kinetics.window.end,
        kinetics.indices.start,
        kinetics.indices.end,
        kinetics.indices.len(),
    ));
    out.push_str(&format!(
        "Yield samples: {} -> {}\n",
        kinetics.yield_samples.first, kinetics.yield_samples.last
    ));

    out.push_str("\nKinetic parameters:\n");
    push_row(&mut out, "mu", kinetics.mu, "1/h");
    push_row(&mut out, "td", kinetics.doubling_time, "h");
    push_row(&mut out, "Yxs", kinetics.yield_xs, "gX/gS");
    push_row(&mut out, "qs", kinetics.qs, "gS/gX/h");
    push_row(&mut out, "kLa", kla, "1/h");
    push_row(&mut out, "R2", kinetics.r_squared, "");
    push_row(&mut out, "t_start", kinetics.window.start, "h");
    push_row(&mut out, "t_end", kinetics.window.end, "h");

    out.push_str("\nMaximum rates:\n");
    push_row(&mut out, "dX/dt max", rates.max_growth_rate, "g/L/h");
    push_row(&mut out, "-dS/dt max", rates.max_substrate_rate, "g/L/h");
    push_row(&mut out, "OUR max", rates.max_oxygen_uptake_rate, "%/h");

    out
}

/// Format interpretation messages with severity markers.
pub fn format_interpretations(items: &[Interpretation]) -> String {
    let mut out = String::new();
    out.push_str("Interpretation:\n");
    for item in items {
        out.push_str(&format!(
            "  {:<4} {:<5} {}\n",
            severity_marker(item.severity),
            item.metric.display_name(),
            item.message
        ));
    }
    out
}

/// Format a kLa-only run.
pub fn format_kla_summary(conditions: &ReactorConditions, kla: f64, interpretation: Option<&Interpretation>) -> String {
    let mut out = String::new();
    out.push_str("=== kin - Oxygen Transfer (kLa) ===\n");
    out.push_str(&format!(
        "Agitation: {:.0} rpm | Aeration: {:.2} vvm\n",
        conditions.rpm, conditions.aeration_vvm
    ));
    out.push_str(&format!(
        "Impeller: {:.2} cm | Volume: {:.3} L\n",
        conditions.impeller_diameter_m * 100.0,
        conditions.volume_m3 * 1000.0
    ));
    out.push('\n');
    push_row(&mut out, "kLa", kla, "1/h");
    if let Some(item) = interpretation {
        out.push_str(&format!("  {:<4} {}\n", severity_marker(item.severity), item.message));
    }
    out
}

/// Format a simulation run: parameters, then initial/final/min/max per state.
pub fn format_simulation_summary(request: &SimulationRequest, trajectory: &Trajectory) -> String {
    let mut out = String::new();
    let p = &request.params;

    out.push_str("=== kin - Batch Fermentation Simulation ===\n");
    out.push_str(&format!(
        "Horizon: [0, {:.2}] h | points={}\n",
        request.final_time,
        trajectory.len()
    ));
    out.push_str(&format!(
        "Growth: mu_max={} 1/h, Ks={} g/L, Ko={} mg/L, Yxs={} gX/gS\n",
        p.mu_max, p.ks, p.ko, p.yield_xs
    ));
    out.push_str(&format!("Product: alpha={}, beta={} 1/h\n", p.alpha, p.beta));
    out.push_str(&format!(
        "Oxygen: kLa={} 1/h, O2_sat={} mg/L, qO2={} mgO2/gX/h\n",
        p.kla, p.o2_sat, p.q_o2
    ));

    out.push_str(&format!(
        "\n{:<16} {:>12} {:>12} {:>12} {:>12}\n",
        "state", "initial", "final", "min", "max"
    ));
    for (label, values) in [
        ("X (g/L)", &trajectory.biomass),
        ("S (g/L)", &trajectory.substrate),
        ("P (mg/L)", &trajectory.product),
        ("O2 (mg/L)", &trajectory.oxygen),
    ] {
        let (min, max) = min_max(values);
        out.push_str(&format!(
            "{:<16} {:>12} {:>12} {:>12} {:>12}\n",
            label,
            fmt_num(values.first().copied().unwrap_or(f64::NAN)),
            fmt_num(values.last().copied().unwrap_or(f64::NAN)),
            fmt_num(min),
            fmt_num(max),
        ));
    }

    match depletion_time(trajectory, request.initial.s0) {
        Some(t) => out.push_str(&format!("\nSubstrate depleted (< 1% of S0) at t={t:.2} h\n")),
        None => out.push_str("\nSubstrate not depleted within the horizon\n"),
    }

    out
}

/// First grid time where substrate falls below 1% of its initial value.
pub fn depletion_time(trajectory: &Trajectory, s0: f64) -> Option<f64> {
    if s0 <= 0.0 {
        return None;
    }
    let threshold = 0.01 * s0;
    trajectory
        .time
        .iter()
        .zip(&trajectory.substrate)
        .find(|(_, s)| **s < threshold)
        .map(|(t, _)| *t)
}

pub fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Normal => "[ok]",
        Severity::Warning => "[!]",
    }
}

fn push_row(out: &mut String, label: &str, value: f64, unit: &str) {
    let line = format!("  {label:<12} {:>14} {unit}", fmt_num(value));
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Fixed notation for ordinary magnitudes, scientific for very small/large ones.
fn fmt_num(v: f64) -> String {
    let a = v.abs();
    if v != 0.0 && a.is_finite() && !(1e-3..1e6).contains(&a) {
        format!("{v:.6e}")
    } else {
        format!("{v:.6}")
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IndexWindow, Level, Metric, PhaseWindow, YieldSamples};

    fn kinetics() -> GrowthKinetics {
        GrowthKinetics {
            mu: 0.3795355905583949,
            intercept: -1.1120779743576934,
            r: 0.9716,
            r_squared: 0.9440291955322782,
            doubling_time: 1.8263035082958798,
            yield_xs: 0.518103,
            qs: 0.7325485290731668,
            yield_degenerate: false,
            window: PhaseWindow { start: 0.0, end: 8.0 },
            indices: IndexWindow { start: 0, end: 2 },
            yield_samples: YieldSamples::default(),
        }
    }

    #[test]
    fn fmt_num_switches_notation() {
        assert_eq!(fmt_num(0.0), "0.000000");
        assert_eq!(fmt_num(0.379536), "0.379536");
        assert_eq!(fmt_num(3.911265913711215e-5), "3.911266e-5");
        assert_eq!(fmt_num(-0.5), "-0.500000");
    }

    #[test]
    fn analysis_summary_lists_parameters() {
        let series = TimeSeries::new(vec![0.0, 4.0, 8.0], vec![1.0, 2.0, 4.0], vec![3.0; 3], vec![100.0; 3]).unwrap();
        let rates = RateSummary {
            max_growth_rate: 0.5,
            max_substrate_rate: 0.0,
            max_oxygen_uptake_rate: 0.0,
        };
        let txt = format_analysis_summary("demo data set", &series, &kinetics(), &rates, 3.911265913711215e-5);

        assert!(txt.starts_with("=== kin - Batch Kinetics Analysis ===\nSource: demo data set\n"));
        assert!(txt.contains("Samples: n=3 | t=[0.00, 8.00] h\n"));
        assert!(txt.contains("Exponential window: [0.00, 8.00] h (samples 0..=2, n=3)\n"));
        assert!(txt.contains("  mu                 0.379536 1/h\n"));
        assert!(txt.contains("  kLa             3.911266e-5 1/h\n"));
        assert!(txt.contains("  R2                 0.944029\n"));
    }

    #[test]
    fn interpretations_carry_markers() {
        let items = vec![
            Interpretation {
                metric: Metric::GrowthRate,
                level: Level::Moderate,
                message: "Moderate".to_string(),
                severity: Severity::Normal,
            },
            Interpretation {
                metric: Metric::OxygenTransfer,
                level: Level::Insufficient,
                message: "Possible oxygen limitation".to_string(),
                severity: Severity::Warning,
            },
        ];
        let txt = format_interpretations(&items);
        let expected = concat!(
            "Interpretation:\n",
            "  [ok] mu    Moderate\n",
            "  [!]  kLa   Possible oxygen limitation\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn depletion_time_finds_first_crossing() {
        let traj = Trajectory {
            time: vec![0.0, 1.0, 2.0, 3.0],
            biomass: vec![0.1; 4],
            substrate: vec![10.0, 5.0, 0.05, 0.0],
            product: vec![0.0; 4],
            oxygen: vec![7.5; 4],
        };
        assert_eq!(depletion_time(&traj, 10.0), Some(2.0));
        assert_eq!(depletion_time(&traj, 0.0), None);
    }
}
