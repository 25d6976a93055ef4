use anyhow::Context;
use clap::Parser;
use lapsim::core::constants::SimConstants;
use lapsim::core::handle_session::handle_session;
use lapsim::core::lap_simulator::Scenario;
use lapsim::core::mistakes::{MistakeSource, NoMistakes, RandomMistakes};
use lapsim::core::strategy::StrategyAnalyzer;
use lapsim::post::lap_result::LapResult;
use lapsim::post::report::{Analysis, LapStatistics};
use lapsim::pre::read_sim_pars::{read_sim_constants, RefData, SIM_CONSTANTS_FILE};
use lapsim::pre::sim_opts::SimOpts;
use rayon::prelude::*;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// init_logging installs the log subscriber. RUST_LOG overrides the default level.
fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn print_catalog(ref_data: &RefData) {
    println!("Circuits:");
    for circuit in ref_data.circuits().iter() {
        println!(
            "  {:<12} {} ({}), {:.3}km, {} corners, DRS in sectors {:?}",
            circuit.id,
            circuit.name,
            circuit.country,
            circuit.length_km,
            circuit.total_corners(),
            circuit.drs_sectors()
        );
    }
    println!("Tire compounds:");
    for compound in ref_data.compounds().iter() {
        println!(
            "  {:<12} grip {:.3}, degradation {:.4}/lap, life {} laps, window {:.0}-{:.0}°C{}",
            compound.id.to_string(),
            compound.base_grip,
            compound.degradation_rate,
            compound.nominal_life_laps,
            compound.optimal_temp_window[0],
            compound.optimal_temp_window[1],
            if compound.wet_suitable { ", wet suitable" } else { "" }
        );
    }
    println!("Weather conditions:");
    for weather in ref_data.weather_conditions().iter() {
        println!(
            "  {:<12} grip {:.2}, mistake probability {:.2}, {} tires or wetter",
            weather.id.to_string(),
            weather.grip_multiplier,
            weather.mistake_probability,
            weather.min_tire_suitability
        );
    }
}

/// run_monte_carlo simulates the same lap with a different mistake seed per run. The runs are
/// independent, so they are executed in parallel.
fn run_monte_carlo(
    ref_data: &RefData,
    sim_consts: &SimConstants,
    scenario: &Scenario,
    lap_number: u32,
    no_sim_runs: u32,
    seed: u64,
) -> anyhow::Result<Vec<LapResult>> {
    let analyzer = StrategyAnalyzer::new(ref_data, sim_consts, scenario)?;

    let results = (0..no_sim_runs as u64)
        .into_par_iter()
        .map(|i| analyzer.single_lap(lap_number, &mut RandomMistakes::seeded(seed.wrapping_add(i))))
        .collect::<Result<Vec<LapResult>, _>>()?;
    Ok(results)
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();
    init_logging(sim_opts.debug);

    // get reference data and simulation constants
    info!("Reading parameters from {}", sim_opts.parameter_dir.display());
    let ref_data = RefData::load(&sim_opts.parameter_dir)?;
    let sim_consts = read_sim_constants(&sim_opts.parameter_dir.join(SIM_CONSTANTS_FILE))?;

    if sim_opts.list {
        print_catalog(&ref_data);
        return Ok(());
    }

    let scenario = sim_opts
        .scenario()
        .context("Circuit, tire, fuel and weather must be set!")?;
    let analysis = sim_opts.analysis();

    // EXECUTION -----------------------------------------------------------------------------------
    let t_start = Instant::now();

    match &analysis {
        Analysis::Lap(lap_number) if sim_opts.no_sim_runs > 1 => {
            if sim_opts.no_mistakes {
                anyhow::bail!("Multiple simulation runs require driver mistakes!");
            }
            let seed = sim_opts.seed.unwrap_or_else(rand::random);
            info!(
                "Running {} simulation runs of lap {} (seeds from {})",
                sim_opts.no_sim_runs, lap_number, seed
            );
            let results = run_monte_carlo(
                &ref_data,
                &sim_consts,
                &scenario,
                *lap_number,
                sim_opts.no_sim_runs,
                seed,
            )?;
            info!("Execution time: {}ms", t_start.elapsed().as_millis());

            if let Some(stats) = LapStatistics::new(&results) {
                stats.print_statistics();
            }
        }
        _ => {
            let mut mistakes: Box<dyn MistakeSource> = if sim_opts.no_mistakes {
                Box::new(NoMistakes)
            } else {
                match sim_opts.seed {
                    Some(seed) => Box::new(RandomMistakes::seeded(seed)),
                    None => Box::new(RandomMistakes::from_entropy()),
                }
            };

            let report = handle_session(
                &ref_data,
                &sim_consts,
                &scenario,
                &analysis,
                mistakes.as_mut(),
            )?;
            info!("Execution time: {}ms", t_start.elapsed().as_millis());

            // POST-PROCESSING -------------------------------------------------------------------------
            report.print_report(sim_opts.output_level())?;

            if let Some(output) = &sim_opts.output {
                report.write_csv(output)?;
                info!("Report written to {}", output.display());
            }
        }
    }

    Ok(())
}
