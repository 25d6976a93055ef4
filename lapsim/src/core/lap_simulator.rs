use crate::core::car::{CarSetup, PerformanceFactors};
use crate::core::constants::SimConstants;
use crate::core::driver::DriverPars;
use crate::core::errors::{SimError, ValidationError};
use crate::core::mistakes::MistakeSource;
use crate::core::tireset::{TireCompound, TireDegradation, TireState};
use crate::core::track::{Circuit, Sector, SectorKind, NO_SECTORS};
use crate::core::weather::{TrackCondition, TrackConditionId, WeatherCondition, WeatherId};
use crate::post::lap_result::{LapResult, SectorBests, TimeLossBreakdown};
use crate::pre::read_sim_pars::RefData;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Scenario bundles the caller inputs of a simulation. The ids are resolved against the
/// reference data when a simulator is created.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Scenario {
    pub circuit_id: String,
    pub weather: WeatherId,
    #[serde(default)]
    pub track_condition: TrackConditionId,
    #[serde(default)]
    pub setup: CarSetup,
    #[serde(default)]
    pub driver_pars: DriverPars,
}

/// LapOutcome is the result of a lap together with the tire state at its end.
#[derive(Debug, Clone)]
pub struct LapOutcome {
    pub result: LapResult,
    pub tire_state: TireState,
}

/// LapSimulator computes sector and lap times for one fixed combination of circuit, setup,
/// weather and driver. It does not keep any state between laps: tire state and sector bests are
/// passed in by the caller.
#[derive(Debug, Clone)]
pub struct LapSimulator<'a> {
    ref_data: &'a RefData,
    sim_consts: &'a SimConstants,
    circuit: &'a Circuit,
    compound: &'a TireCompound,
    weather: &'a WeatherCondition,
    track_condition: &'a TrackCondition,
    setup: CarSetup,
    driver_pars: DriverPars,
    factors: PerformanceFactors,
    suitability_factor: f64,
    warnings: Vec<String>,
}

impl<'a> LapSimulator<'a> {
    /// new resolves the ids of the scenario and validates setup and driver parameters before any
    /// lap is simulated.
    pub fn new(
        ref_data: &'a RefData,
        sim_consts: &'a SimConstants,
        scenario: &Scenario,
    ) -> Result<LapSimulator<'a>, SimError> {
        scenario.setup.validate()?;
        scenario.driver_pars.validate()?;

        let circuit = ref_data.circuit(&scenario.circuit_id)?;
        let compound = ref_data.compound(scenario.setup.compound)?;
        let weather = ref_data.weather(scenario.weather)?;
        let track_condition = ref_data.track_condition(scenario.track_condition)?;

        let factors = PerformanceFactors::compute(
            circuit,
            compound,
            &scenario.setup,
            scenario.driver_pars.aggression,
            &sim_consts.car,
            &sim_consts.lap,
        );

        // tire category vs. the least water-clearing category the weather allows
        let steps = compound.id.category().level() - weather.min_tire_suitability.level();
        let mut warnings = vec![];
        let suitability_factor = match steps.cmp(&0) {
            Ordering::Less => {
                let msg = format!(
                    "{} tires are not suited for {} conditions ({} tires or wetter recommended)",
                    compound.id, weather.id, weather.min_tire_suitability
                );
                warn!("{}", msg);
                warnings.push(msg);
                1.0 + sim_consts.lap.tire_under_penalty * (-steps) as f64
            }
            Ordering::Greater => {
                let msg = format!(
                    "{} tires overheat in {} conditions ({} tires recommended)",
                    compound.id, weather.id, weather.min_tire_suitability
                );
                warn!("{}", msg);
                warnings.push(msg);
                1.0 + sim_consts.lap.tire_over_penalty * steps as f64
            }
            Ordering::Equal => 1.0,
        };

        debug!(
            circuit = %circuit.id,
            compound = %compound.id,
            weather = %weather.id,
            corner_factor = factors.corner_factor,
            straight_factor = factors.straight_factor,
            fuel_penalty_s = factors.fuel_penalty_s,
            wear_multiplier = factors.wear_multiplier,
            "lap simulator created"
        );

        Ok(LapSimulator {
            ref_data,
            sim_consts,
            circuit,
            compound,
            weather,
            track_condition,
            setup: scenario.setup,
            driver_pars: scenario.driver_pars,
            factors,
            suitability_factor,
            warnings,
        })
    }

    /// with_setup returns a simulator for the same circuit, weather and driver but another setup.
    pub fn with_setup(&self, setup: CarSetup) -> Result<LapSimulator<'a>, SimError> {
        LapSimulator::new(
            self.ref_data,
            self.sim_consts,
            &Scenario {
                circuit_id: self.circuit.id.to_owned(),
                weather: self.weather.id,
                track_condition: self.track_condition.id,
                setup,
                driver_pars: self.driver_pars,
            },
        )
    }

    /// with_fuel returns a simulator that only differs in its fuel load.
    pub fn with_fuel(&self, fuel_kg: f64) -> Result<LapSimulator<'a>, SimError> {
        let mut setup = self.setup;
        setup.fuel_kg = fuel_kg;
        setup.validate()?;

        let mut sim = self.clone();
        sim.factors = PerformanceFactors::compute(
            self.circuit,
            self.compound,
            &setup,
            self.driver_pars.aggression,
            &self.sim_consts.car,
            &self.sim_consts.lap,
        );
        sim.setup = setup;
        Ok(sim)
    }

    pub fn sim_consts(&self) -> &'a SimConstants {
        self.sim_consts
    }

    pub fn circuit(&self) -> &Circuit {
        self.circuit
    }

    pub fn setup(&self) -> &CarSetup {
        &self.setup
    }

    fn degradation(&self) -> TireDegradation<'a> {
        TireDegradation::new(&self.sim_consts.tires)
    }

    /// Tire state of a fresh set of the mounted compound in the current conditions.
    pub fn initial_tire_state(&self) -> TireState {
        self.tire_state_after(0)
    }

    /// Tire state of the mounted compound after the given number of laps on the same set.
    pub fn tire_state_after(&self, laps_completed: u32) -> TireState {
        self.degradation().degrade(
            &TireState::fresh(self.compound.id),
            self.compound,
            self.circuit,
            self.weather,
            self.factors.wear_multiplier,
            laps_completed,
        )
    }

    /// Grip of the weather and the track surface together.
    fn track_grip(&self) -> f64 {
        self.weather.grip_multiplier * self.track_condition.grip_modifier
    }

    /// sector_time returns the mistake-free time of a sector with the given tire grip factor,
    /// together with the time lost to tire grip, fuel, weather and tire suitability.
    fn sector_time(&self, sector: &Sector, tire_grip: f64) -> (f64, TimeLossBreakdown) {
        let lap_consts = &self.sim_consts.lap;

        // reference speed of the sector type, reduced by the severity of its corners
        let (v_base, grip_share) = match sector.kind {
            SectorKind::CornerDense => (lap_consts.corner_speed_kmh, lap_consts.grip_share_corner_dense),
            SectorKind::StraightDominated => (
                lap_consts.straight_speed_kmh,
                lap_consts.grip_share_straight_dominated,
            ),
        };
        let v_ref = v_base
            * (1.0 - lap_consts.severity_speed_loss * sector.corner_severity * (1.0 - sector.straight_fraction));

        let mut t = sector.length_km / v_ref * 3600.0;
        t *= 1.0 + lap_consts.elevation_time_per_m * sector.elevation_delta.abs();
        t *= (1.0 - sector.straight_fraction) / self.factors.corner_factor
            + sector.straight_fraction / self.factors.straight_factor;

        // only the grip-limited share of the sector reacts to weather and tire grip
        let t_grip_limited = |grip: f64| t * (1.0 - grip_share) + t * grip_share / grip;
        let t_tires = t_grip_limited(tire_grip);
        let t_weather = t_grip_limited(self.track_grip() * tire_grip);
        let t_suited = t_weather * self.suitability_factor;
        let fuel = self.factors.fuel_penalty_s * sector.length_frac;

        // DRS and aggression scale the whole sector, every loss included
        let mut scale = 1.0 - lap_consts.aggression_time_bonus * self.driver_pars.aggression;
        if self.driver_pars.use_drs && sector.drs_enabled {
            scale *= 1.0 - lap_consts.drs_time_fraction;
        }

        let breakdown = TimeLossBreakdown {
            tire_degradation: (t_tires - t) * scale,
            fuel_weight: fuel * scale,
            weather: (t_weather - t_tires) * scale,
            tire_suitability: (t_suited - t_weather) * scale,
            mistakes: 0.0,
        };
        ((t_suited + fuel) * scale, breakdown)
    }

    /// Probability of a driver mistake in a single sector.
    pub fn mistake_probability(&self) -> f64 {
        (self.weather.mistake_probability
            + self.sim_consts.lap.aggression_mistake_rate * self.driver_pars.aggression)
            .clamp(0.0, 1.0)
    }

    /// simulate_full_lap simulates one lap with the given tire state at the start of the lap.
    /// The sector times are recorded in `bests`, so the theoretical best of the result includes
    /// this lap. A tire state of another compound is treated as a fresh set of the mounted
    /// compound.
    pub fn simulate_full_lap(
        &self,
        lap_number: u32,
        tire_state: &TireState,
        bests: &mut SectorBests,
        mistakes: &mut dyn MistakeSource,
    ) -> Result<LapOutcome, SimError> {
        if lap_number < 1 {
            return Err(ValidationError::new("lap_number", lap_number as f64, "at least 1").into());
        }

        let tire_state = if tire_state.compound == self.compound.id {
            *tire_state
        } else {
            self.initial_tire_state()
        };

        let lap_consts = &self.sim_consts.lap;
        let mistake_prob = self.mistake_probability();
        let mut sector_times = [0.0; NO_SECTORS];
        let mut no_mistakes = 0;
        let mut breakdown = TimeLossBreakdown::default();

        for (sector, t_sector) in self.circuit.sectors.iter().zip(sector_times.iter_mut()) {
            let (mut t, sector_breakdown) = self.sector_time(sector, tire_state.grip_factor);
            breakdown += sector_breakdown;

            if let Some(loss) = mistakes.draw(
                mistake_prob,
                (lap_consts.mistake_loss_min, lap_consts.mistake_loss_max),
            ) {
                debug!(lap_number, sector = sector.number, loss, "driver mistake");
                breakdown.mistakes += t * loss;
                t *= 1.0 + loss;
                no_mistakes += 1;
            }

            *t_sector = t;
        }

        bests.record(&sector_times);

        let tire_state_end = self.degradation().degrade(
            &tire_state,
            self.compound,
            self.circuit,
            self.weather,
            self.factors.wear_multiplier,
            tire_state.laps_run.saturating_add(1),
        );

        let result = LapResult::new(
            lap_number,
            self.compound.id,
            self.setup.fuel_kg,
            self.setup.fuel_after_lap(&self.sim_consts.car),
            sector_times,
            bests,
            tire_state_end.life_remaining_pct(),
            no_mistakes,
            breakdown,
            self.warnings.to_owned(),
        );

        debug!(
            lap_number,
            total_time = result.total_time,
            grip_factor = tire_state.grip_factor,
            "lap simulated"
        );

        Ok(LapOutcome {
            result,
            tire_state: tire_state_end,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::car::EngineMode;
    use crate::core::mistakes::{NoMistakes, RandomMistakes};
    use crate::core::tireset::tests::{compound, weather};
    use crate::core::tireset::TireCompoundId;
    use crate::core::track::tests::test_circuit_pars;
    use crate::pre::read_sim_pars::{CircuitsFile, TiresFile, WeatherFile};
    use approx::assert_relative_eq;

    pub(crate) fn test_ref_data() -> RefData {
        let mut damp = weather(WeatherId::Damp, 0.85);
        damp.mistake_probability = 0.04;
        let mut heavy_rain = weather(WeatherId::HeavyRain, 0.5);
        heavy_rain.min_tire_suitability = crate::core::tireset::TireCategory::Wet;

        RefData::new(
            &CircuitsFile {
                circuits: vec![test_circuit_pars()],
            },
            &TiresFile {
                compounds: TireCompoundId::ALL.iter().map(|&id| compound(id)).collect(),
            },
            &WeatherFile {
                conditions: vec![weather(WeatherId::Dry, 1.0), damp, heavy_rain],
                track_conditions: vec![
                    TrackCondition {
                        id: TrackConditionId::RubberedIn,
                        grip_modifier: 1.0,
                    },
                    TrackCondition {
                        id: TrackConditionId::Green,
                        grip_modifier: 0.95,
                    },
                ],
            },
        )
        .unwrap()
    }

    pub(crate) fn test_scenario() -> Scenario {
        Scenario {
            circuit_id: "test".to_owned(),
            weather: WeatherId::Dry,
            track_condition: TrackConditionId::RubberedIn,
            setup: CarSetup::default(),
            driver_pars: DriverPars::default(),
        }
    }

    fn lap_time(sim: &LapSimulator) -> LapResult {
        sim.simulate_full_lap(1, &sim.initial_tire_state(), &mut SectorBests::new(), &mut NoMistakes)
            .unwrap()
            .result
    }

    #[test]
    fn total_time_is_sum_of_sectors() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let sim = LapSimulator::new(&ref_data, &sim_consts, &test_scenario()).unwrap();
        let result = lap_time(&sim);

        assert!(result.sector_times.iter().all(|&t| t > 0.0));
        assert_relative_eq!(
            result.total_time,
            result.sector_times.iter().sum::<f64>(),
            epsilon = 1e-9
        );
        assert_relative_eq!(result.theoretical_best, result.total_time, epsilon = 1e-9);
        assert_relative_eq!(result.time_loss, 0.0, epsilon = 1e-9);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn more_fuel_is_slower() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let sim = LapSimulator::new(&ref_data, &sim_consts, &test_scenario()).unwrap();

        let light = lap_time(&sim.with_fuel(10.0).unwrap());
        let heavy = lap_time(&sim.with_fuel(90.0).unwrap());
        assert!(light.total_time < heavy.total_time);
        assert!(sim.with_fuel(-1.0).is_err());
    }

    #[test]
    fn drs_only_affects_drs_sectors() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let mut scenario = test_scenario();
        let with_drs = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());
        scenario.driver_pars.use_drs = false;
        let without_drs = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());

        assert!(without_drs.sector_times[0] > with_drs.sector_times[0]);
        assert_relative_eq!(without_drs.sector_times[1], with_drs.sector_times[1]);
        assert!(without_drs.sector_times[2] > with_drs.sector_times[2]);
    }

    #[test]
    fn wet_weather_and_green_track_are_slower() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let mut scenario = test_scenario();
        let dry = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());

        scenario.track_condition = TrackConditionId::Green;
        let green = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());
        assert!(green.total_time > dry.total_time);

        scenario.track_condition = TrackConditionId::RubberedIn;
        scenario.weather = WeatherId::Damp;
        let damp = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());
        assert!(damp.total_time > green.total_time);
    }

    #[test]
    fn unsuitable_tires_produce_warning_and_penalty() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let mut scenario = test_scenario();
        scenario.weather = WeatherId::HeavyRain;

        let slicks = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());
        scenario.setup.compound = TireCompoundId::Wet;
        let wets = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());

        assert_eq!(slicks.warnings.len(), 1);
        assert!(wets.warnings.is_empty());
        assert!(slicks.total_time > wets.total_time);
    }

    #[test]
    fn higher_engine_mode_is_faster_on_straights() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let mut scenario = test_scenario();
        scenario.setup.engine_mode = EngineMode::Conservation;
        let conservation = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());
        scenario.setup.engine_mode = EngineMode::Quali;
        let quali = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());

        assert!(quali.total_time < conservation.total_time);
    }

    #[test]
    fn tire_state_is_threaded_through_laps() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let sim = LapSimulator::new(&ref_data, &sim_consts, &test_scenario()).unwrap();
        let mut bests = SectorBests::new();

        let lap_1 = sim
            .simulate_full_lap(1, &sim.initial_tire_state(), &mut bests, &mut NoMistakes)
            .unwrap();
        let lap_2 = sim
            .simulate_full_lap(2, &lap_1.tire_state, &mut bests, &mut NoMistakes)
            .unwrap();

        assert_eq!(lap_1.tire_state.laps_run, 1);
        assert_eq!(lap_2.tire_state.laps_run, 2);
        assert!(lap_2.result.total_time > lap_1.result.total_time);
        assert!(lap_2.result.tire_life_pct < lap_1.result.tire_life_pct);
        assert_relative_eq!(lap_2.result.theoretical_best, lap_1.result.total_time, epsilon = 1e-9);
    }

    #[test]
    fn foreign_tire_state_counts_as_fresh_set() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let sim = LapSimulator::new(&ref_data, &sim_consts, &test_scenario()).unwrap();

        let mut worn_soft = TireState::fresh(TireCompoundId::Soft);
        worn_soft.laps_run = 30;
        worn_soft.grip_factor = 0.5;

        let outcome = sim
            .simulate_full_lap(1, &worn_soft, &mut SectorBests::new(), &mut NoMistakes)
            .unwrap();
        assert_eq!(outcome.tire_state.compound, TireCompoundId::Medium);
        assert_eq!(outcome.tire_state.laps_run, 1);
        assert_relative_eq!(outcome.result.total_time, lap_time(&sim).total_time, epsilon = 1e-9);
    }

    #[test]
    fn breakdown_explains_the_gap_to_an_ideal_lap() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let mut scenario = test_scenario();
        scenario.setup.fuel_kg = 0.0;
        let ideal = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());
        assert_relative_eq!(ideal.breakdown.total(), 0.0, epsilon = 1e-9);

        scenario.setup.fuel_kg = 80.0;
        scenario.weather = WeatherId::Damp;
        let sim = LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap();
        let loaded = sim
            .simulate_full_lap(11, &sim.tire_state_after(10), &mut SectorBests::new(), &mut NoMistakes)
            .unwrap()
            .result;

        let breakdown = loaded.breakdown;
        assert!(breakdown.tire_degradation > 0.0);
        assert!(breakdown.fuel_weight > 0.0);
        assert!(breakdown.weather > 0.0);
        assert_relative_eq!(breakdown.tire_suitability, 0.0, epsilon = 1e-9);
        assert_relative_eq!(breakdown.mistakes, 0.0);
        assert_relative_eq!(
            loaded.total_time - breakdown.total(),
            ideal.total_time,
            epsilon = 1e-9
        );

        scenario.weather = WeatherId::HeavyRain;
        let slicks = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());
        assert!(slicks.breakdown.tire_suitability > 0.0);
    }

    #[test]
    fn mistake_loss_is_recorded_in_breakdown() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let mut scenario = test_scenario();
        scenario.driver_pars.aggression = 1.0;
        let sim = LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap();
        let clean = lap_time(&sim);

        let mut mistakes = RandomMistakes::seeded(11);
        for lap in 1..=30 {
            let result = sim
                .simulate_full_lap(lap, &sim.initial_tire_state(), &mut SectorBests::new(), &mut mistakes)
                .unwrap()
                .result;
            assert_eq!(result.mistakes > 0, result.breakdown.mistakes > 0.0);
            assert_relative_eq!(
                result.total_time - result.breakdown.mistakes,
                clean.total_time,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn fuel_remaining_follows_engine_mode_consumption() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let mut scenario = test_scenario();
        scenario.setup.engine_mode = EngineMode::Quali;
        scenario.setup.fuel_kg = 2.0;
        let result = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());
        assert_relative_eq!(result.fuel_remaining_kg, 0.0);

        scenario.setup.fuel_kg = 50.0;
        let result = lap_time(&LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap());
        let burn = EngineMode::Quali.pars(&sim_consts.car).fuel_per_lap_kg;
        assert_relative_eq!(result.fuel_remaining_kg, 50.0 - burn);
    }

    #[test]
    fn worn_out_set_at_max_laps_does_not_overflow() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let sim = LapSimulator::new(&ref_data, &sim_consts, &test_scenario()).unwrap();

        let worn = sim.tire_state_after(u32::MAX);
        assert_eq!(worn.laps_run, u32::MAX);
        let outcome = sim
            .simulate_full_lap(1, &worn, &mut SectorBests::new(), &mut NoMistakes)
            .unwrap();

        assert_eq!(outcome.tire_state.laps_run, u32::MAX);
        assert_relative_eq!(outcome.tire_state.grip_factor, sim_consts.tires.grip_floor);
        assert!(outcome.result.total_time.is_finite());
        assert!(outcome.result.total_time > lap_time(&sim).total_time);
    }

    #[test]
    fn rejects_invalid_inputs() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();

        let mut scenario = test_scenario();
        scenario.setup.downforce = 11;
        assert!(matches!(
            LapSimulator::new(&ref_data, &sim_consts, &scenario),
            Err(SimError::Validation(ValidationError { field: "downforce", .. }))
        ));

        let mut scenario = test_scenario();
        scenario.driver_pars.aggression = 1.5;
        assert!(matches!(
            LapSimulator::new(&ref_data, &sim_consts, &scenario),
            Err(SimError::Validation(ValidationError { field: "aggression", .. }))
        ));

        let mut scenario = test_scenario();
        scenario.circuit_id = "imola".to_owned();
        assert!(matches!(
            LapSimulator::new(&ref_data, &sim_consts, &scenario),
            Err(SimError::Config(_))
        ));

        let sim = LapSimulator::new(&ref_data, &sim_consts, &test_scenario()).unwrap();
        assert!(sim
            .simulate_full_lap(0, &sim.initial_tire_state(), &mut SectorBests::new(), &mut NoMistakes)
            .is_err());
    }

    #[test]
    fn seeded_mistakes_are_reproducible() {
        let ref_data = test_ref_data();
        let sim_consts = SimConstants::default();
        let mut scenario = test_scenario();
        scenario.driver_pars.aggression = 1.0;
        let sim = LapSimulator::new(&ref_data, &sim_consts, &scenario).unwrap();

        let run = |seed: u64| -> Vec<f64> {
            let mut mistakes = RandomMistakes::seeded(seed);
            (1..=20)
                .map(|lap| {
                    sim.simulate_full_lap(
                        lap,
                        &sim.initial_tire_state(),
                        &mut SectorBests::new(),
                        &mut mistakes,
                    )
                    .unwrap()
                    .result
                    .total_time
                })
                .collect()
        };

        assert_eq!(run(42), run(42));
        // a mistake never makes a lap faster than the clean lap
        let clean = lap_time(&sim).total_time;
        assert!(run(7).iter().all(|&t| t >= clean - 1e-9));
    }
}
