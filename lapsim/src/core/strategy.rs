use crate::core::car::{validate_fuel, CarSetup, EngineMode, MAX_DOWNFORCE, MIN_DOWNFORCE};
use crate::core::constants::SimConstants;
use crate::core::errors::{SimError, ValidationError};
use crate::core::lap_simulator::{LapSimulator, Scenario};
use crate::core::mistakes::{MistakeSource, NoMistakes};
use crate::post::lap_result::{LapResult, SectorBests};
use crate::pre::read_sim_pars::RefData;
use serde::Serialize;
use tracing::info;

/// A labelled lap result of a comparison report.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub label: String,
    pub result: LapResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SetupEvaluation {
    pub downforce: u8,
    pub engine_mode: EngineMode,
    pub lap_time: f64,
}

/// Best combination of the setup search and every combination that was evaluated, in search
/// order.
#[derive(Debug, Clone, Serialize)]
pub struct SetupSuggestion {
    pub best: SetupEvaluation,
    pub evaluations: Vec<SetupEvaluation>,
}

impl SetupSuggestion {
    /// The scenario setup with the suggested downforce and engine mode applied.
    pub fn apply(&self, setup: &CarSetup) -> CarSetup {
        CarSetup {
            downforce: self.best.downforce,
            engine_mode: self.best.engine_mode,
            ..*setup
        }
    }
}

/// StrategyAnalyzer runs batches of lap simulations around a base scenario. Every analysis
/// starts from its own tire state and sector bests, so analyses never influence each other.
#[derive(Debug, Clone)]
pub struct StrategyAnalyzer<'a> {
    sim: LapSimulator<'a>,
    ref_data: &'a RefData,
}

impl<'a> StrategyAnalyzer<'a> {
    pub fn new(
        ref_data: &'a RefData,
        sim_consts: &'a SimConstants,
        scenario: &Scenario,
    ) -> Result<StrategyAnalyzer<'a>, SimError> {
        Ok(StrategyAnalyzer {
            sim: LapSimulator::new(ref_data, sim_consts, scenario)?,
            ref_data,
        })
    }

    pub fn simulator(&self) -> &LapSimulator<'a> {
        &self.sim
    }

    /// single_lap simulates lap `lap_number` of a stint on the scenario setup, i.e. with a tire
    /// set that has already completed `lap_number - 1` laps.
    pub fn single_lap(
        &self,
        lap_number: u32,
        mistakes: &mut dyn MistakeSource,
    ) -> Result<LapResult, SimError> {
        let tire_state = self.sim.tire_state_after(lap_number.saturating_sub(1));
        let outcome =
            self.sim
                .simulate_full_lap(lap_number, &tire_state, &mut SectorBests::new(), mistakes)?;
        Ok(outcome.result)
    }

    /// Lap 1 on a fresh set of the given setup.
    fn fresh_lap(
        sim: &LapSimulator,
        mistakes: &mut dyn MistakeSource,
    ) -> Result<LapResult, SimError> {
        let outcome = sim.simulate_full_lap(
            1,
            &sim.initial_tire_state(),
            &mut SectorBests::new(),
            mistakes,
        )?;
        Ok(outcome.result)
    }

    /// compare_tires simulates a lap on a fresh set of every compound of the tire catalog. The
    /// report is ordered by compound id.
    pub fn compare_tires(
        &self,
        mistakes: &mut dyn MistakeSource,
    ) -> Result<Vec<Comparison>, SimError> {
        info!(circuit = %self.sim.circuit().id, "comparing tire compounds");
        let mut report = Vec::with_capacity(self.ref_data.compounds().len());

        for compound in self.ref_data.compounds().iter() {
            let sim = self.sim.with_setup(CarSetup {
                compound: compound.id,
                ..*self.sim.setup()
            })?;
            report.push(Comparison {
                label: compound.id.to_string(),
                result: StrategyAnalyzer::fresh_lap(&sim, mistakes)?,
            });
        }
        Ok(report)
    }

    /// fuel_sweep simulates a lap for every fuel load. All fuel loads are validated before the
    /// first lap is simulated and the report keeps the input order.
    pub fn fuel_sweep(
        &self,
        fuel_loads: &[f64],
        mistakes: &mut dyn MistakeSource,
    ) -> Result<Vec<Comparison>, SimError> {
        for &fuel_kg in fuel_loads.iter() {
            validate_fuel(fuel_kg)?;
        }
        info!(no_loads = fuel_loads.len(), "running fuel strategy sweep");

        fuel_loads
            .iter()
            .map(|&fuel_kg| {
                let sim = self.sim.with_fuel(fuel_kg)?;
                Ok(Comparison {
                    label: format!("{:.1} kg", fuel_kg),
                    result: StrategyAnalyzer::fresh_lap(&sim, mistakes)?,
                })
            })
            .collect()
    }

    /// stint simulates `no_laps` consecutive laps on one tire set. With `burn_fuel` the fuel
    /// load drops by the consumption of the engine mode after every lap.
    pub fn stint(
        &self,
        no_laps: u32,
        burn_fuel: bool,
        mistakes: &mut dyn MistakeSource,
    ) -> Result<Vec<LapResult>, SimError> {
        if no_laps < 1 {
            return Err(ValidationError::new("stint_laps", no_laps as f64, "at least 1").into());
        }
        info!(no_laps, burn_fuel, "simulating stint");

        let mut sim = self.sim.clone();
        let mut tire_state = sim.initial_tire_state();
        let mut bests = SectorBests::new();
        let mut results = Vec::with_capacity(no_laps as usize);

        for lap_number in 1..=no_laps {
            let outcome = sim.simulate_full_lap(lap_number, &tire_state, &mut bests, mistakes)?;
            tire_state = outcome.tire_state;
            results.push(outcome.result);

            if burn_fuel {
                let fuel_kg = sim.setup().fuel_after_lap(&sim.sim_consts().car);
                sim = sim.with_fuel(fuel_kg)?;
            }
        }
        Ok(results)
    }

    /// suggest_setup searches downforce 1-10 and every engine mode for the fastest mistake-free
    /// lap on a fresh set. Ties keep the first combination in search order (ascending
    /// downforce, then quali, race, conservation).
    pub fn suggest_setup(&self) -> Result<SetupSuggestion, SimError> {
        let mut evaluations =
            Vec::with_capacity((MAX_DOWNFORCE - MIN_DOWNFORCE + 1) as usize * EngineMode::ALL.len());
        let mut best = SetupEvaluation {
            downforce: self.sim.setup().downforce,
            engine_mode: self.sim.setup().engine_mode,
            lap_time: f64::INFINITY,
        };

        for downforce in MIN_DOWNFORCE..=MAX_DOWNFORCE {
            for &engine_mode in EngineMode::ALL.iter() {
                let sim = self.sim.with_setup(CarSetup {
                    downforce,
                    engine_mode,
                    ..*self.sim.setup()
                })?;
                let evaluation = SetupEvaluation {
                    downforce,
                    engine_mode,
                    lap_time: StrategyAnalyzer::fresh_lap(&sim, &mut NoMistakes)?.total_time,
                };

                if evaluation.lap_time < best.lap_time {
                    best = evaluation;
                }
                evaluations.push(evaluation);
            }
        }

        info!(
            downforce = best.downforce,
            engine_mode = %best.engine_mode,
            lap_time = best.lap_time,
            "setup suggestion found"
        );

        Ok(SetupSuggestion { best, evaluations })
    }

    /// compare_setups simulates a lap on a fresh set for every labelled setup. The report is
    /// sorted by lap time, fastest first.
    pub fn compare_setups(
        &self,
        setups: &[(String, CarSetup)],
        mistakes: &mut dyn MistakeSource,
    ) -> Result<Vec<Comparison>, SimError> {
        let sims = setups
            .iter()
            .map(|(label, setup)| Ok((label, self.sim.with_setup(*setup)?)))
            .collect::<Result<Vec<_>, SimError>>()?;

        let mut report = Vec::with_capacity(sims.len());
        for (label, sim) in sims.iter() {
            report.push(Comparison {
                label: label.to_string(),
                result: StrategyAnalyzer::fresh_lap(sim, mistakes)?,
            });
        }
        report.sort_by(|a, b| a.result.total_time.total_cmp(&b.result.total_time));
        Ok(report)
    }
}
