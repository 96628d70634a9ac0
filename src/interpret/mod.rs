//! Qualitative interpretation of kinetic results.
//!
//! Classification is table-driven: [`RULES`] lists, per metric, the bands in
//! evaluation order and the first band whose threshold matches wins. Severity
//! is not stored in the table; it is derived from the message text against
//! [`WARNING_KEYWORDS`], so rewording a message is enough to change how it is
//! flagged.

use crate::domain::{GrowthKinetics, Interpretation, Level, Metric, Severity};

/// Band boundary, evaluated against the metric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// Strictly greater than.
    Above(f64),
    /// Strictly less than.
    Below(f64),
    /// Always matches; closes a metric's band list.
    Otherwise,
}

impl Threshold {
    pub fn matches(self, value: f64) -> bool {
        match self {
            Threshold::Above(bound) => value > bound,
            Threshold::Below(bound) => value < bound,
            Threshold::Otherwise => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub metric: Metric,
    pub threshold: Threshold,
    pub level: Level,
    pub message: &'static str,
}

const fn rule(metric: Metric, threshold: Threshold, level: Level, message: &'static str) -> Rule {
    Rule {
        metric,
        threshold,
        level,
        message,
    }
}

pub const RULES: &[Rule] = &[
    rule(Metric::GrowthRate, Threshold::Above(0.4), Level::High, "High specific growth rate (mu > 0.4 1/h)"),
    rule(
        Metric::GrowthRate,
        Threshold::Above(0.1),
        Level::Moderate,
        "Moderate specific growth rate (mu between 0.1 and 0.4 1/h)",
    ),
    rule(Metric::GrowthRate, Threshold::Otherwise, Level::Low, "Low specific growth rate (mu <= 0.1 1/h)"),
    rule(
        Metric::Yield,
        Threshold::Above(0.6),
        Level::High,
        "High substrate-to-biomass conversion efficiency (Yxs > 0.6)",
    ),
    rule(Metric::Yield, Threshold::Above(0.3), Level::Moderate, "Moderate substrate conversion (Yxs between 0.3 and 0.6)"),
    rule(
        Metric::Yield,
        Threshold::Otherwise,
        Level::Low,
        "Low conversion efficiency of substrate (Yxs <= 0.3), possible cellular stress",
    ),
    rule(
        Metric::SubstrateUptake,
        Threshold::Below(0.1),
        Level::Low,
        "Slow or efficient substrate consumption relative to biomass",
    ),
    rule(Metric::SubstrateUptake, Threshold::Below(1.0), Level::Moderate, "Proportional substrate consumption (moderate qs)"),
    rule(
        Metric::SubstrateUptake,
        Threshold::Otherwise,
        Level::High,
        "High substrate consumption, check for possible waste or unbalanced metabolism",
    ),
    rule(
        Metric::OxygenTransfer,
        Threshold::Below(0.01),
        Level::Insufficient,
        "Low oxygen transfer coefficient (kLa < 0.01 1/h), possible oxygen limitation",
    ),
    rule(Metric::OxygenTransfer, Threshold::Otherwise, Level::Adequate, "Adequate oxygen transfer (kLa >= 0.01 1/h)"),
];

/// Lowercase fragments that mark a message as a warning.
pub const WARNING_KEYWORDS: &[&str] = &[
    "limitation",
    "stress",
    "high substrate consumption",
    "waste",
    "low conversion efficiency",
    "low growth",
    "undefined",
];

pub fn severity_of(message: &str) -> Severity {
    let lower = message.to_lowercase();
    if WARNING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Severity::Warning
    } else {
        Severity::Normal
    }
}

fn tagged(metric: Metric, level: Level, message: String) -> Interpretation {
    let severity = severity_of(&message);
    Interpretation {
        metric,
        level,
        message,
        severity,
    }
}

/// Classify one scalar against the rule table.
///
/// Returns `None` only for metrics without table entries (e.g. phase duration).
pub fn classify(metric: Metric, value: f64) -> Option<Interpretation> {
    RULES
        .iter()
        .filter(|r| r.metric == metric)
        .find(|r| r.threshold.matches(value))
        .map(|r| tagged(metric, r.level, r.message.to_string()))
}

/// Full interpretation list for an analysis run, in display order.
pub fn interpret(kinetics: &GrowthKinetics, kla: f64) -> Vec<Interpretation> {
    let mut out: Vec<Interpretation> = [
        (Metric::GrowthRate, kinetics.mu),
        (Metric::Yield, kinetics.yield_xs),
        (Metric::SubstrateUptake, kinetics.qs),
        (Metric::OxygenTransfer, kla),
    ]
    .into_iter()
    .filter_map(|(metric, value)| classify(metric, value))
    .collect();

    if kinetics.yield_degenerate {
        out.push(tagged(
            Metric::Yield,
            Level::Undefined,
            format!(
                "Yxs undefined: substrate did not change between samples {} and {}, so Yxs and qs are reported as 0",
                kinetics.yield_samples.first, kinetics.yield_samples.last
            ),
        ));
    }

    let w = kinetics.window;
    out.push(tagged(
        Metric::PhaseDuration,
        Level::Info,
        format!(
            "The exponential phase lasted {:.1} h (from {:.1} h to {:.1} h)",
            w.duration(),
            w.start,
            w.end
        ),
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IndexWindow, PhaseWindow, YieldSamples};

    fn kinetics(mu: f64, yield_xs: f64, qs: f64) -> GrowthKinetics {
        GrowthKinetics {
            mu,
            intercept: 0.0,
            r: 1.0,
            r_squared: 1.0,
            doubling_time: std::f64::consts::LN_2 / mu,
            yield_xs,
            qs,
            yield_degenerate: false,
            window: PhaseWindow { start: 0.0, end: 8.0 },
            indices: IndexWindow { start: 0, end: 2 },
            yield_samples: YieldSamples::default(),
        }
    }

    #[test]
    fn every_metric_band_list_ends_with_otherwise() {
        for metric in [Metric::GrowthRate, Metric::Yield, Metric::SubstrateUptake, Metric::OxygenTransfer] {
            let last = RULES.iter().filter(|r| r.metric == metric).last().unwrap();
            assert_eq!(last.threshold, Threshold::Otherwise, "{metric:?}");
        }
    }

    #[test]
    fn growth_rate_bands_and_boundaries() {
        assert_eq!(classify(Metric::GrowthRate, 0.5).unwrap().level, Level::High);
        assert_eq!(classify(Metric::GrowthRate, 0.4).unwrap().level, Level::Moderate);
        assert_eq!(classify(Metric::GrowthRate, 0.1).unwrap().level, Level::Low);
        assert_eq!(classify(Metric::GrowthRate, -0.2).unwrap().level, Level::Low);
    }

    #[test]
    fn yield_and_uptake_bands() {
        assert_eq!(classify(Metric::Yield, 0.61).unwrap().level, Level::High);
        assert_eq!(classify(Metric::Yield, 0.6).unwrap().level, Level::Moderate);
        assert_eq!(classify(Metric::Yield, 0.3).unwrap().level, Level::Low);

        assert_eq!(classify(Metric::SubstrateUptake, 0.05).unwrap().level, Level::Low);
        assert_eq!(classify(Metric::SubstrateUptake, 0.1).unwrap().level, Level::Moderate);
        assert_eq!(classify(Metric::SubstrateUptake, 1.0).unwrap().level, Level::High);
    }

    #[test]
    fn kla_bands() {
        let low = classify(Metric::OxygenTransfer, 3.9e-5).unwrap();
        assert_eq!(low.level, Level::Insufficient);
        assert_eq!(low.severity, Severity::Warning);

        let ok = classify(Metric::OxygenTransfer, 0.01).unwrap();
        assert_eq!(ok.level, Level::Adequate);
        assert_eq!(ok.severity, Severity::Normal);
    }

    #[test]
    fn severity_follows_keywords() {
        assert_eq!(classify(Metric::Yield, 0.1).unwrap().severity, Severity::Warning);
        assert_eq!(classify(Metric::SubstrateUptake, 2.0).unwrap().severity, Severity::Warning);
        // Low mu is informational; its message carries no warning keyword.
        assert_eq!(classify(Metric::GrowthRate, 0.05).unwrap().severity, Severity::Normal);
        assert_eq!(severity_of("Possible OXYGEN LIMITATION"), Severity::Warning);
    }

    #[test]
    fn interpret_lists_metrics_then_duration() {
        let out = interpret(&kinetics(0.38, 0.52, 0.73), 3.9e-5);
        let metrics: Vec<Metric> = out.iter().map(|i| i.metric).collect();
        assert_eq!(
            metrics,
            vec![
                Metric::GrowthRate,
                Metric::Yield,
                Metric::SubstrateUptake,
                Metric::OxygenTransfer,
                Metric::PhaseDuration
            ]
        );
        assert_eq!(out[4].message, "The exponential phase lasted 8.0 h (from 0.0 h to 8.0 h)");
        assert_eq!(out[4].severity, Severity::Normal);
    }

    #[test]
    fn phase_duration_uses_one_decimal() {
        let mut k = kinetics(0.38, 0.52, 0.73);
        k.window = PhaseWindow { start: 1.5, end: 4.0 };
        let out = interpret(&k, 1.0);
        let duration = out.last().unwrap();
        assert_eq!(duration.metric, Metric::PhaseDuration);
        assert_eq!(duration.message, "The exponential phase lasted 2.5 h (from 1.5 h to 4.0 h)");
    }

    #[test]
    fn degenerate_yield_adds_warning() {
        let mut k = kinetics(0.38, 0.0, 0.0);
        k.yield_degenerate = true;
        let out = interpret(&k, 1.0);
        let note = out.iter().find(|i| i.level == Level::Undefined).unwrap();
        assert_eq!(note.severity, Severity::Warning);
        assert!(note.message.contains("samples 0 and 6"));
    }
}
