//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - converts arguments into validated run configs
//! - runs the analysis / kLa / simulation pipelines
//! - prints reports and charts
//! - writes optional exports

use clap::Parser;
use tracing::Level;

use crate::cli::{AnalyzeArgs, Command, KlaArgs, PlotOptions, ReactorArgs, SeriesArgs, SimulateArgs};
use crate::config::{check_reactor, check_simulation, read_simulation_request};
use crate::domain::{
    AnalysisConfig, Metric, PhaseWindow, ReactorConditions, SeriesSource, SimulationConfig, SimulationRequest,
    TransferCorrelation, YieldSamples,
};
use crate::error::{AppError, CoreResult, KineticsError};
use crate::io::export::{AnalysisReport, write_analysis_json, write_trajectory_csv};

pub mod pipeline;

/// Entry point for the `kin` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Kla(args) => handle_kla(args),
        Command::Simulate(args) => handle_simulate(args),
    }
}

/// Install the stderr log subscriber: WARN by default, DEBUG with `-v`.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args)?;
    let run = pipeline::run_analysis(&config)?;

    println!(
        "{}",
        crate::report::format_analysis_summary(&run.source_label, &run.series, &run.kinetics, &run.rates, run.kla)
    );
    println!("{}", crate::report::format_interpretations(&run.interpretations));

    if config.plot {
        let (w, h) = (config.plot_width, config.plot_height);
        println!("{}", crate::plot::render_biomass_chart(&run.series, run.kinetics.window, w, h));
        println!("{}", crate::plot::render_substrate_chart(&run.series, w, h));
        println!("{}", crate::plot::render_oxygen_chart(&run.series, w, h));
    }

    if let Some(path) = &config.export_json {
        let report = AnalysisReport::new(
            &run.source_label,
            &run.series,
            &run.kinetics,
            &run.rates,
            &config.reactor,
            run.kla,
            &run.interpretations,
        );
        write_analysis_json(path, &report)?;
    }

    Ok(())
}

fn handle_kla(args: KlaArgs) -> Result<(), AppError> {
    let conditions = reactor_from_args(&args.reactor)?;
    let kla = crate::kinetics::estimate_kla(&conditions, &TransferCorrelation::default())?;
    let note = crate::interpret::classify(Metric::OxygenTransfer, kla);
    println!("{}", crate::report::format_kla_summary(&conditions, kla, note.as_ref()));
    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let config = simulation_config_from_args(&args)?;
    let trajectory = pipeline::run_simulation(&config)?;

    println!("{}", crate::report::format_simulation_summary(&config.request, &trajectory));

    if config.plot {
        println!(
            "{}",
            crate::plot::render_trajectory_chart(&trajectory, config.plot_width, config.plot_height)
        );
    }

    if let Some(path) = &config.export_csv {
        write_trajectory_csv(path, &trajectory)?;
    }

    Ok(())
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> CoreResult<AnalysisConfig> {
    let window = match (args.start, args.end) {
        (Some(start), Some(end)) => Some(PhaseWindow { start, end }),
        (None, None) => None,
        _ => {
            return Err(KineticsError::InvalidParameter {
                name: "window",
                reason: "--start and --end must be given together".to_string(),
            });
        }
    };

    Ok(AnalysisConfig {
        source: series_source_from_args(&args.series)?,
        window,
        yield_samples: YieldSamples {
            first: args.yield_first,
            last: args.yield_last,
        },
        reactor: reactor_from_args(&args.reactor)?,
        correlation: TransferCorrelation::default(),
        plot: plot_enabled(&args.plot),
        plot_width: args.plot.width,
        plot_height: args.plot.height,
        export_json: args.export_json.clone(),
    })
}

pub fn simulation_config_from_args(args: &SimulateArgs) -> CoreResult<SimulationConfig> {
    let mut request = match &args.params {
        Some(path) => read_simulation_request(path)?,
        None => SimulationRequest::default(),
    };

    let p = &mut request.params;
    set(&mut p.mu_max, args.mu_max);
    set(&mut p.ks, args.ks);
    set(&mut p.ko, args.ko);
    set(&mut p.yield_xs, args.yxs);
    set(&mut p.alpha, args.alpha);
    set(&mut p.beta, args.beta);
    set(&mut p.kla, args.kla);
    set(&mut p.o2_sat, args.o2_sat);
    set(&mut p.q_o2, args.q_o2);

    let s = &mut request.initial;
    set(&mut s.x0, args.x0);
    set(&mut s.s0, args.s0);
    set(&mut s.p0, args.p0);
    set(&mut s.o2_0, args.o2_0);

    set(&mut request.final_time, args.final_time);
    if let Some(points) = args.points {
        request.grid_points = points;
    }

    if !args.no_range_check {
        check_simulation(&request)?;
    }

    Ok(SimulationConfig {
        request,
        plot: plot_enabled(&args.plot),
        plot_width: args.plot.width,
        plot_height: args.plot.height,
        export_csv: args.export_csv.clone(),
    })
}

fn series_source_from_args(args: &SeriesArgs) -> CoreResult<SeriesSource> {
    if args.demo {
        return Ok(SeriesSource::Demo);
    }
    if let Some(path) = &args.csv {
        return Ok(SeriesSource::Csv(path.clone()));
    }
    match (&args.time, &args.biomass, &args.substrate, &args.oxygen) {
        (Some(time), Some(biomass), Some(substrate), Some(oxygen)) => Ok(SeriesSource::Text {
            time: time.clone(),
            biomass: biomass.clone(),
            substrate: substrate.clone(),
            oxygen: oxygen.clone(),
        }),
        _ => Err(KineticsError::NoInput),
    }
}

/// Range-check lab units, then convert to SI.
fn reactor_from_args(args: &ReactorArgs) -> CoreResult<ReactorConditions> {
    if !args.no_range_check {
        check_reactor(args.rpm, args.vvm, args.impeller_cm, args.volume_l)?;
    }
    Ok(ReactorConditions {
        rpm: args.rpm,
        aeration_vvm: args.vvm,
        impeller_diameter_m: args.impeller_cm / 100.0,
        volume_m3: args.volume_l / 1000.0,
    })
}

fn plot_enabled(args: &PlotOptions) -> bool {
    args.plot && !args.no_plot
}

fn set(slot: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *slot = v;
    }
}
