//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during estimation and simulation
//! - exported to JSON/CSV
//! - printed by the report module without any re-derivation
//!
//! `TimeSeries` is the exception: it is only built through
//! [`TimeSeries::new`], which enforces its invariants.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ranges;
use crate::error::{CoreResult, KineticsError};

/// Four parallel experimental series sampled at the same instants.
///
/// Units follow the usual lab sheet: time in h, biomass and substrate in g/L,
/// dissolved oxygen in % saturation. Nothing here depends on the units.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    time: Vec<f64>,
    biomass: Vec<f64>,
    substrate: Vec<f64>,
    oxygen: Vec<f64>,
}

impl TimeSeries {
    /// Build a validated series.
    ///
    /// Fails when lengths differ, the series is empty, any value is non-finite,
    /// or time is not strictly increasing.
    pub fn new(
        time: Vec<f64>,
        biomass: Vec<f64>,
        substrate: Vec<f64>,
        oxygen: Vec<f64>,
    ) -> CoreResult<Self> {
        let n = time.len();
        if biomass.len() != n || substrate.len() != n || oxygen.len() != n {
            return Err(KineticsError::ShapeMismatch {
                time: n,
                biomass: biomass.len(),
                substrate: substrate.len(),
                oxygen: oxygen.len(),
            });
        }
        if n == 0 {
            return Err(KineticsError::EmptySeries);
        }

        for (what, values) in [
            ("time", &time),
            ("biomass", &biomass),
            ("substrate", &substrate),
            ("oxygen", &oxygen),
        ] {
            if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
                return Err(KineticsError::NonFinite { what, value: bad });
            }
        }

        for i in 1..n {
            if time[i] <= time[i - 1] {
                return Err(KineticsError::NonIncreasingTime {
                    index: i,
                    value: time[i],
                });
            }
        }

        Ok(Self {
            time,
            biomass,
            substrate,
            oxygen,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn biomass(&self) -> &[f64] {
        &self.biomass
    }

    pub fn substrate(&self) -> &[f64] {
        &self.substrate
    }

    pub fn oxygen(&self) -> &[f64] {
        &self.oxygen
    }

    /// The window used when the user has not picked one: first sample to the
    /// third sample (or the last one for shorter series).
    pub fn default_window(&self) -> PhaseWindow {
        let last = self.len().saturating_sub(1);
        PhaseWindow {
            start: self.time[0],
            end: self.time[2.min(last)],
        }
    }
}

/// Exponential-phase boundaries, expressed as sampled time values (h).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseWindow {
    pub start: f64,
    pub end: f64,
}

impl PhaseWindow {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Inclusive index range `[start, end]` into a [`TimeSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexWindow {
    pub start: usize,
    pub end: usize,
}

impl IndexWindow {
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn range(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Absolute sample indices used for the biomass/substrate yield.
///
/// The yield is taken between two fixed samples of the *full* series and is
/// independent of the exponential window. Defaults to samples 0 and 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldSamples {
    pub first: usize,
    pub last: usize,
}

impl Default for YieldSamples {
    fn default() -> Self {
        Self { first: 0, last: 6 }
    }
}

/// Output of the kinetics estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthKinetics {
    /// Specific growth rate (1/h): slope of ln(X) vs t over the window.
    pub mu: f64,
    /// Intercept of the ln(X) regression.
    pub intercept: f64,
    /// Pearson correlation of the ln(X) regression.
    pub r: f64,
    pub r_squared: f64,
    /// Doubling time (h).
    pub doubling_time: f64,
    /// Biomass/substrate yield (g/g).
    pub yield_xs: f64,
    /// Specific substrate consumption rate (g/g·h).
    pub qs: f64,
    /// Set when no substrate was consumed between the yield samples; `yield_xs`
    /// and `qs` are then reported as 0.
    pub yield_degenerate: bool,
    pub window: PhaseWindow,
    pub indices: IndexWindow,
    pub yield_samples: YieldSamples,
}

/// Steepest finite-difference rates over the full series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateSummary {
    /// max(ΔX/Δt), g/L·h.
    pub max_growth_rate: f64,
    /// -min(ΔS/Δt), g/L·h.
    pub max_substrate_rate: f64,
    /// -min(ΔO2/Δt), %/h.
    pub max_oxygen_uptake_rate: f64,
}

/// Stirred-tank operating point used by the kLa correlation (SI units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactorConditions {
    pub rpm: f64,
    /// Gas volume per liquid volume per minute.
    pub aeration_vvm: f64,
    pub impeller_diameter_m: f64,
    pub volume_m3: f64,
}

impl Default for ReactorConditions {
    fn default() -> Self {
        Self {
            rpm: ranges::RPM.default,
            aeration_vvm: ranges::AERATION_VVM.default,
            impeller_diameter_m: ranges::IMPELLER_DIAMETER_CM.default / 100.0,
            volume_m3: ranges::VOLUME_L.default / 1000.0,
        }
    }
}

/// Empirical constants of the kLa power law.
///
/// `kLa = k · (Pg/V)^alpha · vs^beta · N^gamma`, with `vs` computed over the
/// sparger cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferCorrelation {
    pub k: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub sparger_diameter_m: f64,
}

impl Default for TransferCorrelation {
    fn default() -> Self {
        Self {
            k: 0.002,
            alpha: 0.7,
            beta: 0.4,
            gamma: 0.5,
            sparger_diameter_m: 0.06,
        }
    }
}

/// Kinetic constants of the batch model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchParams {
    pub mu_max: f64,
    pub ks: f64,
    pub ko: f64,
    pub yield_xs: f64,
    /// Growth-associated product coefficient.
    pub alpha: f64,
    /// Non-growth-associated product coefficient (1/h).
    pub beta: f64,
    pub kla: f64,
    pub o2_sat: f64,
    pub q_o2: f64,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self {
            mu_max: ranges::MU_MAX.default,
            ks: ranges::KS.default,
            ko: ranges::KO.default,
            yield_xs: ranges::YIELD_XS.default,
            alpha: ranges::ALPHA.default,
            beta: ranges::BETA.default,
            kla: ranges::KLA.default,
            o2_sat: ranges::O2_SAT.default,
            q_o2: ranges::Q_O2.default,
        }
    }
}

/// Initial concentrations of the batch model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialState {
    pub x0: f64,
    pub s0: f64,
    pub p0: f64,
    pub o2_0: f64,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            x0: ranges::X0.default,
            s0: ranges::S0.default,
            p0: ranges::P0.default,
            o2_0: ranges::O2_0.default,
        }
    }
}

/// One simulation run: parameters, initial state and output grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationRequest {
    pub params: BatchParams,
    pub initial: InitialState,
    /// End of the simulated horizon (h); the grid always starts at 0.
    pub final_time: f64,
    pub grid_points: usize,
}

/// Number of output samples of a batch simulation.
pub const DEFAULT_GRID_POINTS: usize = 500;

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            params: BatchParams::default(),
            initial: InitialState::default(),
            final_time: ranges::FINAL_TIME.default,
            grid_points: DEFAULT_GRID_POINTS,
        }
    }
}

/// Simulated state trajectories on a uniform time grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    pub time: Vec<f64>,
    pub biomass: Vec<f64>,
    pub substrate: Vec<f64>,
    pub product: Vec<f64>,
    pub oxygen: Vec<f64>,
}

impl Trajectory {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            time: Vec::with_capacity(n),
            biomass: Vec::with_capacity(n),
            substrate: Vec::with_capacity(n),
            product: Vec::with_capacity(n),
            oxygen: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Which scalar an interpretation talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    GrowthRate,
    Yield,
    SubstrateUptake,
    OxygenTransfer,
    PhaseDuration,
}

impl Metric {
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::GrowthRate => "mu",
            Metric::Yield => "Yxs",
            Metric::SubstrateUptake => "qs",
            Metric::OxygenTransfer => "kLa",
            Metric::PhaseDuration => "phase",
        }
    }
}

/// Qualitative band assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Moderate,
    Low,
    Adequate,
    Insufficient,
    Undefined,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
}

/// A classified, human-readable statement about one result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub metric: Metric,
    pub level: Level,
    pub message: String,
    pub severity: Severity,
}

/// Where the experimental series come from.
#[derive(Debug, Clone)]
pub enum SeriesSource {
    /// Free-form delimited text, one string per series.
    Text {
        time: String,
        biomass: String,
        substrate: String,
        oxygen: String,
    },
    /// CSV file with `tiempo,biomasa,sustrato,oxigeno` columns.
    Csv(PathBuf),
    /// Built-in reference data set.
    Demo,
}

/// A full analysis run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub source: SeriesSource,
    /// `None` selects [`TimeSeries::default_window`].
    pub window: Option<PhaseWindow>,
    pub yield_samples: YieldSamples,
    pub reactor: ReactorConditions,
    pub correlation: TransferCorrelation,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_json: Option<PathBuf>,
}

/// A simulation run's configuration as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub request: SimulationRequest,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_csv: Option<PathBuf>,
}
