//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - validated experimental input (`TimeSeries`, `PhaseWindow`, `YieldSamples`)
//! - estimator and simulator outputs (`GrowthKinetics`, `RateSummary`, `Trajectory`)
//! - reactor / model parameters and run configuration

pub mod types;

pub use types::*;
