//! Command-line parsing for the batch kinetics toolkit.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the numerical code. Arguments are converted into plain config
//! structs by `app::*_config_from_args`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ranges;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "kin", version, about = "Microbial growth kinetics and batch fermentation simulator")]
pub struct Cli {
    /// Log pipeline stages to stderr (debug level).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate mu, td, Yxs, qs, maximum rates and kLa from experimental data.
    Analyze(AnalyzeArgs),
    /// Estimate kLa for a stirred-tank operating point.
    Kla(KlaArgs),
    /// Simulate a batch fermentation (Monod growth, Luedeking-Piret product, oxygen balance).
    Simulate(SimulateArgs),
}

/// Where the experimental series come from.
#[derive(Debug, Args, Clone, Default)]
pub struct SeriesArgs {
    /// Sampling times (h), newline- or comma-separated.
    #[arg(long, requires_all = ["biomass", "substrate", "oxygen"], conflicts_with_all = ["csv", "demo"])]
    pub time: Option<String>,

    /// Biomass concentrations (g/L).
    #[arg(long, requires = "time")]
    pub biomass: Option<String>,

    /// Substrate concentrations (g/L).
    #[arg(long, requires = "time")]
    pub substrate: Option<String>,

    /// Dissolved oxygen (%).
    #[arg(long, requires = "time")]
    pub oxygen: Option<String>,

    /// CSV file with tiempo,biomasa,sustrato,oxigeno (or time,biomass,substrate,oxygen) columns.
    #[arg(long, value_name = "CSV", conflicts_with = "demo")]
    pub csv: Option<PathBuf>,

    /// Use the built-in reference data set.
    #[arg(long)]
    pub demo: bool,
}

/// Stirred-tank operating point, in lab units.
#[derive(Debug, Args, Clone)]
pub struct ReactorArgs {
    /// Agitation speed (rpm).
    #[arg(long, default_value_t = ranges::RPM.default)]
    pub rpm: f64,

    /// Aeration rate (vvm).
    #[arg(long, default_value_t = ranges::AERATION_VVM.default)]
    pub vvm: f64,

    /// Impeller diameter (cm).
    #[arg(long = "impeller-cm", default_value_t = ranges::IMPELLER_DIAMETER_CM.default)]
    pub impeller_cm: f64,

    /// Working volume (L).
    #[arg(long = "volume-l", default_value_t = ranges::VOLUME_L.default)]
    pub volume_l: f64,

    /// Skip the parameter range table (physical sanity checks still apply).
    #[arg(long)]
    pub no_range_check: bool,
}

/// Terminal chart options.
#[derive(Debug, Args, Clone)]
pub struct PlotOptions {
    /// Render ASCII charts in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for `kin analyze`.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Start of the exponential phase (h); must match a sampling time exactly.
    #[arg(long, requires = "end")]
    pub start: Option<f64>,

    /// End of the exponential phase (h); must match a sampling time exactly.
    #[arg(long, requires = "start")]
    pub end: Option<f64>,

    /// Sample index used as the "before" point of the yield.
    #[arg(long, default_value_t = 0)]
    pub yield_first: usize,

    /// Sample index used as the "after" point of the yield.
    #[arg(long, default_value_t = 6)]
    pub yield_last: usize,

    #[command(flatten)]
    pub reactor: ReactorArgs,

    #[command(flatten)]
    pub plot: PlotOptions,

    /// Export the analysis (kinetics, rates, kLa, interpretations) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for `kin kla`.
#[derive(Debug, Parser, Clone)]
pub struct KlaArgs {
    #[command(flatten)]
    pub reactor: ReactorArgs,
}

/// Options for `kin simulate`.
///
/// Every parameter is optional; unset values come from `--params` when given,
/// otherwise from the range table defaults.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    /// JSON file with `params`, `initial`, `final_time`, `grid_points` (all optional).
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,

    /// Maximum specific growth rate (1/h).
    #[arg(long)]
    pub mu_max: Option<f64>,

    /// Substrate half-saturation constant (g/L).
    #[arg(long)]
    pub ks: Option<f64>,

    /// Oxygen half-saturation constant (mg/L).
    #[arg(long)]
    pub ko: Option<f64>,

    /// Biomass/substrate yield (gX/gS).
    #[arg(long)]
    pub yxs: Option<f64>,

    /// Growth-associated product coefficient.
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Non-growth-associated product coefficient (1/h).
    #[arg(long)]
    pub beta: Option<f64>,

    /// Oxygen transfer coefficient (1/h).
    #[arg(long)]
    pub kla: Option<f64>,

    /// Oxygen saturation concentration (mg/L).
    #[arg(long)]
    pub o2_sat: Option<f64>,

    /// Specific oxygen uptake (mgO2/gX/h).
    #[arg(long)]
    pub q_o2: Option<f64>,

    /// Initial biomass (g/L).
    #[arg(long)]
    pub x0: Option<f64>,

    /// Initial substrate (g/L).
    #[arg(long)]
    pub s0: Option<f64>,

    /// Initial product (mg/L).
    #[arg(long)]
    pub p0: Option<f64>,

    /// Initial dissolved oxygen (mg/L).
    #[arg(long = "o2-0")]
    pub o2_0: Option<f64>,

    /// Simulated horizon (h).
    #[arg(long)]
    pub final_time: Option<f64>,

    /// Output grid size (500 unless set here or in `--params`).
    #[arg(long, value_name = "N")]
    pub points: Option<usize>,

    /// Skip the parameter range table (physical sanity checks still apply).
    #[arg(long)]
    pub no_range_check: bool,

    #[command(flatten)]
    pub plot: PlotOptions,

    /// Export the trajectory to CSV (time_h,biomass,substrate,product,oxygen).
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}
