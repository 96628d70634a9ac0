//! JSON simulation parameter files.
//!
//! A parameter file is a partial [`SimulationRequest`]; anything left out takes
//! the range-table default. Example:
//!
//! ```text
//! {
//!   "params": { "mu_max": 0.6, "kla": 4.0 },
//!   "initial": { "s0": 20.0 },
//!   "final_time": 96.0
//! }
//! ```

use std::fs::File;
use std::path::Path;

use crate::domain::SimulationRequest;
use crate::error::{CoreResult, KineticsError};

/// Read a simulation request from a JSON file.
pub fn read_simulation_request(path: &Path) -> CoreResult<SimulationRequest> {
    let file = File::open(path).map_err(|source| KineticsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let request: SimulationRequest = serde_json::from_reader(file)?;
    Ok(request)
}

/// Parse a simulation request from a JSON string.
pub fn parse_simulation_request(text: &str) -> CoreResult<SimulationRequest> {
    Ok(serde_json::from_str(text)?)
}
