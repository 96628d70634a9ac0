//! Shared analysis/simulation workflow.
//!
//! Keeping this in one place keeps the handlers in `app` focused on
//! presentation:
//! ingest -> window -> kinetics -> rates -> kLa -> interpretations
//!
//! Every stage is a pure function; a failing stage stops the run and nothing
//! partial is returned.

use tracing::{debug, info};

use crate::domain::{
    AnalysisConfig, GrowthKinetics, Interpretation, RateSummary, SeriesSource, SimulationConfig, TimeSeries,
    Trajectory,
};
use crate::error::CoreResult;
use crate::interpret::interpret;
use crate::io::ingest::load_series;
use crate::kinetics::{estimate_kinetics, estimate_kla, max_rates};
use crate::sim::simulate;

/// All computed outputs of a single `kin analyze` run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub source_label: String,
    pub series: TimeSeries,
    pub kinetics: GrowthKinetics,
    pub rates: RateSummary,
    pub kla: f64,
    pub interpretations: Vec<Interpretation>,
}

/// Execute the full analysis pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> CoreResult<AnalysisOutput> {
    // 1) Ingest.
    let series = load_series(&config.source)?;
    let source_label = source_label(&config.source);
    info!(source = %source_label, samples = series.len(), "series loaded");

    // 2) Window: explicit, or the first three samples.
    let window = config.window.unwrap_or_else(|| series.default_window());
    debug!(start = window.start, end = window.end, "exponential window");

    // 3) Kinetics + full-series rates.
    let kinetics = estimate_kinetics(&series, window, config.yield_samples)?;
    let rates = max_rates(&series)?;

    // 4) Oxygen transfer.
    let kla = estimate_kla(&config.reactor, &config.correlation)?;
    debug!(kla, "kLa estimated");

    // 5) Qualitative reading.
    let interpretations = interpret(&kinetics, kla);

    Ok(AnalysisOutput {
        source_label,
        series,
        kinetics,
        rates,
        kla,
        interpretations,
    })
}

/// Execute a batch simulation.
pub fn run_simulation(config: &SimulationConfig) -> CoreResult<Trajectory> {
    info!(
        final_time = config.request.final_time,
        points = config.request.grid_points,
        "simulating batch"
    );
    simulate(&config.request)
}

/// Human-readable description of a series source.
pub fn source_label(source: &SeriesSource) -> String {
    match source {
        SeriesSource::Text { .. } => "text input".to_string(),
        SeriesSource::Csv(path) => format!("CSV {}", path.display()),
        SeriesSource::Demo => "demo data set".to_string(),
    }
}
