//! Export analysis results to JSON and simulated trajectories to CSV.
//!
//! Both formats are meant to be easy to consume from spreadsheets or
//! downstream scripts. The JSON schema is [`AnalysisReport`].

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{GrowthKinetics, Interpretation, RateSummary, ReactorConditions, TimeSeries, Trajectory};
use crate::error::{CoreResult, KineticsError};

pub const TOOL_NAME: &str = "kin";

/// Header of the trajectory CSV.
pub const TRAJECTORY_COLUMNS: [&str; 5] = ["time_h", "biomass", "substrate", "product", "oxygen"];

/// Where the analysed data came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSummary {
    pub source: String,
    pub samples: usize,
    pub time_start_h: f64,
    pub time_end_h: f64,
}

/// Portable record of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub tool: String,
    pub version: String,
    /// RFC 3339 local time.
    pub generated_at: String,
    pub input: InputSummary,
    pub reactor: ReactorConditions,
    pub kinetics: GrowthKinetics,
    pub rates: RateSummary,
    pub kla: f64,
    pub interpretations: Vec<Interpretation>,
}

impl AnalysisReport {
    pub fn new(
        source_label: &str,
        series: &TimeSeries,
        kinetics: &GrowthKinetics,
        rates: &RateSummary,
        reactor: &ReactorConditions,
        kla: f64,
        interpretations: &[Interpretation],
    ) -> Self {
        let time = series.time();
        Self {
            tool: TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Local::now().to_rfc3339(),
            input: InputSummary {
                source: source_label.to_string(),
                samples: series.len(),
                time_start_h: time.first().copied().unwrap_or(0.0),
                time_end_h: time.last().copied().unwrap_or(0.0),
            },
            reactor: *reactor,
            kinetics: kinetics.clone(),
            rates: *rates,
            kla,
            interpretations: interpretations.to_vec(),
        }
    }
}

/// Write an analysis report as pretty-printed JSON.
pub fn write_analysis_json(path: &Path, report: &AnalysisReport) -> CoreResult<()> {
    let mut file = create(path)?;
    serde_json::to_writer_pretty(&mut file, report)?;
    file.write_all(b"\n").map_err(|source| io_error(path, source))?;
    info!(path = %path.display(), "wrote analysis JSON");
    Ok(())
}

/// Read an analysis report JSON file.
pub fn read_analysis_json(path: &Path) -> CoreResult<AnalysisReport> {
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    Ok(serde_json::from_reader(file)?)
}

/// Write one CSV row per grid point.
pub fn write_trajectory_csv(path: &Path, trajectory: &Trajectory) -> CoreResult<()> {
    let file = create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(TRAJECTORY_COLUMNS)?;
    for i in 0..trajectory.len() {
        writer.write_record([
            trajectory.time[i].to_string(),
            trajectory.biomass[i].to_string(),
            trajectory.substrate[i].to_string(),
            trajectory.product[i].to_string(),
            trajectory.oxygen[i].to_string(),
        ])?;
    }
    writer.flush().map_err(|source| io_error(path, source))?;
    info!(path = %path.display(), rows = trajectory.len(), "wrote trajectory CSV");
    Ok(())
}

fn create(path: &Path) -> CoreResult<File> {
    File::create(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> KineticsError {
    KineticsError::Io {
        path: path.display().to_string(),
        source,
    }
}
