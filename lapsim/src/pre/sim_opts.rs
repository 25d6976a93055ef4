use crate::core::car::{CarSetup, EngineMode, ErsMode};
use crate::core::driver::DriverPars;
use crate::core::lap_simulator::Scenario;
use crate::core::tireset::TireCompoundId;
use crate::core::weather::{TrackConditionId, WeatherId};
use crate::post::report::{Analysis, OutputLevel};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "lapsim",
    about = "A simplified physics lap time estimator for F1 circuits",
    allow_negative_numbers = true,
    group = ArgGroup::new("analysis").multiple(false)
)]
pub struct SimOpts {
    // POSITIONALS ---------------------------------------------------------------------------------
    /// Circuit id, e.g. spa
    #[clap(required_unless_present = "list")]
    pub circuit: Option<String>,

    /// Tire compound (soft, medium, hard, intermediate, wet)
    #[clap(required_unless_present = "list")]
    pub tire: Option<TireCompoundId>,

    /// Fuel load in kg (0-110)
    #[clap(required_unless_present = "list")]
    pub fuel: Option<f64>,

    /// Weather condition (dry, damp, light_rain, heavy_rain, extreme_wet)
    #[clap(required_unless_present = "list")]
    pub weather: Option<WeatherId>,

    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging (RUST_LOG overrides the level)
    #[clap(short, long)]
    pub debug: bool,

    /// List the circuits, tire compounds and weather conditions of the reference data
    #[clap(long)]
    pub list: bool,

    /// Do not use DRS in the DRS zones
    #[clap(long)]
    pub no_drs: bool,

    /// Simulate without driver mistakes
    #[clap(long)]
    pub no_mistakes: bool,

    /// Compare all tire compounds on a fresh set
    #[clap(long, group = "analysis")]
    pub compare_tires: bool,

    /// Search downforce and engine mode for the fastest lap
    #[clap(long, group = "analysis")]
    pub suggestions: bool,

    /// Print only the lap times
    #[clap(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the time loss breakdown of every lap
    #[clap(short, long)]
    pub verbose: bool,

    /// Burn fuel during a stint according to the engine mode
    #[clap(long, requires = "stint")]
    pub burn_fuel: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Downforce level (1-10)
    #[clap(long, default_value = "5")]
    pub downforce: u8,

    /// Engine mode (quali, race, conservation)
    #[clap(long, default_value = "race")]
    pub engine_mode: EngineMode,

    /// ERS deployment (auto, aggressive, conservative)
    #[clap(long, default_value = "auto")]
    pub ers: ErsMode,

    /// Driver aggression (0.0-1.0)
    #[clap(short, long, default_value = "0.5")]
    pub aggression: f64,

    /// Track condition (green, rubbered_in, dusty)
    #[clap(long, default_value = "rubbered_in")]
    pub track_condition: TrackConditionId,

    /// Lap number of a single lap simulation (tires have run lap - 1 laps)
    #[clap(short, long, default_value = "1")]
    pub lap: u32,

    /// Fuel loads in kg to compare, in the given order
    #[clap(long, multiple_values = true, group = "analysis")]
    pub fuel_strategy: Vec<f64>,

    /// Number of laps of a stint simulation
    #[clap(long, group = "analysis")]
    pub stint: Option<u32>,

    /// Seed of the driver mistakes (random if not set)
    #[clap(long)]
    pub seed: Option<u64>,

    /// Number of single lap simulation runs with different mistake seeds
    #[clap(short, long, default_value = "1")]
    pub no_sim_runs: u32,

    /// Set path to the directory containing the reference data and simulation constants
    #[clap(short, long, default_value = "input/parameters")]
    pub parameter_dir: PathBuf,

    /// Write the report to a CSV file
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

impl SimOpts {
    /// scenario returns the simulation inputs of the options or None if a positional argument
    /// is missing (only allowed together with --list).
    pub fn scenario(&self) -> Option<Scenario> {
        Some(Scenario {
            circuit_id: self.circuit.to_owned()?,
            weather: self.weather?,
            track_condition: self.track_condition,
            setup: CarSetup {
                downforce: self.downforce,
                engine_mode: self.engine_mode,
                ers_mode: self.ers,
                fuel_kg: self.fuel?,
                compound: self.tire?,
            },
            driver_pars: DriverPars {
                aggression: self.aggression,
                use_drs: !self.no_drs,
            },
        })
    }

    /// analysis returns the requested analysis, a single lap if none was requested.
    pub fn analysis(&self) -> Analysis {
        if self.compare_tires {
            Analysis::CompareTires
        } else if !self.fuel_strategy.is_empty() {
            Analysis::FuelStrategy(self.fuel_strategy.to_owned())
        } else if let Some(no_laps) = self.stint {
            Analysis::Stint {
                no_laps,
                burn_fuel: self.burn_fuel,
            }
        } else if self.suggestions {
            Analysis::Suggestions
        } else {
            Analysis::Lap(self.lap)
        }
    }

    pub fn output_level(&self) -> OutputLevel {
        if self.quiet {
            OutputLevel::Quiet
        } else if self.verbose {
            OutputLevel::Verbose
        } else {
            OutputLevel::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positionals_and_options() {
        let opts = SimOpts::try_parse_from([
            "lapsim", "spa", "medium", "50", "dry", "--downforce", "6", "-a", "0.7", "--seed", "3",
        ])
        .unwrap();
        let scenario = opts.scenario().unwrap();

        assert_eq!(scenario.circuit_id, "spa");
        assert_eq!(scenario.setup.compound, TireCompoundId::Medium);
        assert_eq!(scenario.setup.downforce, 6);
        assert_eq!(scenario.weather, WeatherId::Dry);
        assert!(scenario.driver_pars.use_drs);
        assert_eq!(opts.analysis(), Analysis::Lap(1));
        assert_eq!(opts.seed, Some(3));
    }

    #[test]
    fn parses_fuel_strategy_in_order() {
        let opts = SimOpts::try_parse_from([
            "lapsim", "monza", "soft", "30", "dry", "--fuel-strategy", "80", "20", "50",
        ])
        .unwrap();
        assert_eq!(opts.analysis(), Analysis::FuelStrategy(vec![80.0, 20.0, 50.0]));
    }

    #[test]
    fn rejects_conflicting_analyses() {
        assert!(SimOpts::try_parse_from([
            "lapsim", "spa", "soft", "30", "dry", "--compare-tires", "--suggestions",
        ])
        .is_err());
    }

    #[test]
    fn output_level_flags() {
        let level = |args: &[&str]| {
            let mut argv = vec!["lapsim", "spa", "soft", "30", "dry"];
            argv.extend_from_slice(args);
            SimOpts::try_parse_from(argv).map(|opts| opts.output_level())
        };
        assert_eq!(level(&[]).unwrap(), OutputLevel::Normal);
        assert_eq!(level(&["-q"]).unwrap(), OutputLevel::Quiet);
        assert_eq!(level(&["--verbose"]).unwrap(), OutputLevel::Verbose);
        assert!(level(&["--quiet", "--verbose"]).is_err());
    }

    #[test]
    fn list_needs_no_positionals() {
        let opts = SimOpts::try_parse_from(["lapsim", "--list"]).unwrap();
        assert!(opts.list);
        assert!(opts.scenario().is_none());
    }

    #[test]
    fn negative_fuel_reaches_validation() {
        let opts = SimOpts::try_parse_from(["lapsim", "spa", "soft", "-5", "dry"]).unwrap();
        assert_eq!(opts.fuel, Some(-5.0));
    }
}
