use crate::core::constants::{CarConstants, EngineModePars, LapConstants};
use crate::core::errors::{check_range, ConfigError, ValidationError};
use crate::core::tireset::{TireCompound, TireCompoundId};
use crate::core::track::Circuit;
use helpers::general::lin_interp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_DOWNFORCE: u8 = 1;
pub const MAX_DOWNFORCE: u8 = 10;
pub const MAX_FUEL_KG: f64 = 110.0;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    Quali,
    Race,
    Conservation,
}

impl EngineMode {
    /// Search order of the setup suggestion.
    pub const ALL: [EngineMode; 3] = [EngineMode::Quali, EngineMode::Race, EngineMode::Conservation];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineMode::Quali => "quali",
            EngineMode::Race => "race",
            EngineMode::Conservation => "conservation",
        }
    }

    pub fn pars<'a>(&self, car_consts: &'a CarConstants) -> &'a EngineModePars {
        match self {
            EngineMode::Quali => &car_consts.engine_quali,
            EngineMode::Race => &car_consts.engine_race,
            EngineMode::Conservation => &car_consts.engine_conservation,
        }
    }
}

impl FromStr for EngineMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineMode::ALL
            .iter()
            .find(|m| m.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| ConfigError::UnknownId {
                kind: "engine mode",
                id: s.to_owned(),
            })
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErsMode {
    Auto,
    Aggressive,
    Conservative,
}

impl ErsMode {
    pub const ALL: [ErsMode; 3] = [ErsMode::Auto, ErsMode::Aggressive, ErsMode::Conservative];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErsMode::Auto => "auto",
            ErsMode::Aggressive => "aggressive",
            ErsMode::Conservative => "conservative",
        }
    }
}

impl FromStr for ErsMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErsMode::ALL
            .iter()
            .find(|m| m.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| ConfigError::UnknownId {
                kind: "ERS mode",
                id: s.to_owned(),
            })
    }
}

impl fmt::Display for ErsMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// * `downforce` - Downforce level 1 (Monza) to 10 (Monaco)
/// * `engine_mode` - Power unit mode
/// * `ers_mode` - ERS deployment strategy
/// * `fuel_kg` - (kg) Fuel load
/// * `compound` - Mounted tire compound
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct CarSetup {
    pub downforce: u8,
    pub engine_mode: EngineMode,
    pub ers_mode: ErsMode,
    pub fuel_kg: f64,
    pub compound: TireCompoundId,
}

impl Default for CarSetup {
    fn default() -> Self {
        CarSetup {
            downforce: 5,
            engine_mode: EngineMode::Race,
            ers_mode: ErsMode::Auto,
            fuel_kg: 50.0,
            compound: TireCompoundId::Medium,
        }
    }
}

impl CarSetup {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range(
            "downforce",
            self.downforce as f64,
            MIN_DOWNFORCE as f64,
            MAX_DOWNFORCE as f64,
            "an integer between 1 and 10",
        )?;
        validate_fuel(self.fuel_kg)
    }

    /// The method returns the fuel left after one lap in the current engine mode.
    pub fn fuel_after_lap(&self, car_consts: &CarConstants) -> f64 {
        (self.fuel_kg - self.engine_mode.pars(car_consts).fuel_per_lap_kg).max(0.0)
    }
}

pub fn validate_fuel(fuel_kg: f64) -> Result<(), ValidationError> {
    check_range("fuel_kg", fuel_kg, 0.0, MAX_FUEL_KG, "between 0 and 110 kg")
}

/// Performance factors derived from the setup on a given circuit.
///
/// * `corner_factor` - Cornering speed multiplier (> 1 is faster)
/// * `straight_factor` - Straight-line speed multiplier (> 1 is faster)
/// * `fuel_penalty_s` - (s) Additive time penalty of the fuel load over a full lap
/// * `wear_multiplier` - Tire wear multiplier of engine mode and ERS deployment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceFactors {
    pub corner_factor: f64,
    pub straight_factor: f64,
    pub fuel_penalty_s: f64,
    pub wear_multiplier: f64,
}

impl PerformanceFactors {
    /// compute derives the performance factors. The setup and aggression must already be
    /// validated (downforce 1-10, fuel >= 0, aggression 0-1).
    pub fn compute(
        circuit: &Circuit,
        compound: &TireCompound,
        setup: &CarSetup,
        aggression: f64,
        car_consts: &CarConstants,
        lap_consts: &LapConstants,
    ) -> PerformanceFactors {
        let downforce = setup.downforce as f64;
        let knee = car_consts.downforce_knee as f64;

        // downforce: diminishing cornering returns above the knee, drag grows with the straights
        let effective_level = downforce.min(knee)
            + (downforce - knee).max(0.0) * car_consts.corner_gain_above_knee
                / car_consts.corner_gain_per_level.max(f64::MIN_POSITIVE);
        let corner_factor =
            (1.0 + car_consts.corner_gain_per_level * effective_level) * compound.base_grip;
        let drag_penalty = 1.0 + car_consts.drag_per_level * downforce * circuit.straight_fraction();

        let engine = setup.engine_mode.pars(car_consts);
        let (ers_boost, ers_wear) = match setup.ers_mode {
            ErsMode::Aggressive => (car_consts.ers_aggressive.boost, car_consts.ers_aggressive.wear),
            ErsMode::Conservative => (
                car_consts.ers_conservative.boost,
                car_consts.ers_conservative.wear,
            ),
            ErsMode::Auto => (
                lin_interp(
                    aggression,
                    &[0.0, 1.0],
                    &[car_consts.ers_conservative.boost, car_consts.ers_aggressive.boost],
                ),
                lin_interp(
                    aggression,
                    &[0.0, 1.0],
                    &[car_consts.ers_conservative.wear, car_consts.ers_aggressive.wear],
                ),
            ),
        };
        let straight_factor = engine.power * (1.0 + ers_boost) / drag_penalty;

        PerformanceFactors {
            corner_factor,
            straight_factor,
            fuel_penalty_s: setup.fuel_kg * lap_consts.fuel_penalty_s_per_kg_km * circuit.length_km,
            wear_multiplier: engine.wear * ers_wear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tireset::tests::compound;
    use crate::core::track::tests::test_circuit_pars;
    use approx::assert_relative_eq;

    fn factors(setup: &CarSetup, aggression: f64) -> PerformanceFactors {
        let circuit = Circuit::new(&test_circuit_pars()).unwrap();
        PerformanceFactors::compute(
            &circuit,
            &compound(setup.compound),
            setup,
            aggression,
            &CarConstants::default(),
            &LapConstants::default(),
        )
    }

    #[test]
    fn validation_names_the_field() {
        let mut setup = CarSetup::default();
        setup.downforce = 11;
        assert_eq!(setup.validate().unwrap_err().field, "downforce");

        let mut setup = CarSetup::default();
        setup.fuel_kg = -1.0;
        assert_eq!(setup.validate().unwrap_err().field, "fuel_kg");

        setup.fuel_kg = f64::NAN;
        assert!(setup.validate().is_err());
    }

    #[test]
    fn downforce_has_diminishing_returns_above_the_knee() {
        let gain = |from: u8| {
            let lo = factors(&CarSetup { downforce: from, ..CarSetup::default() }, 0.5);
            let hi = factors(&CarSetup { downforce: from + 1, ..CarSetup::default() }, 0.5);
            assert!(hi.straight_factor < lo.straight_factor);
            hi.corner_factor - lo.corner_factor
        };
        assert!(gain(3) > 0.0);
        assert!(gain(8) > 0.0);
        assert!(gain(8) < gain(3));
    }

    #[test]
    fn engine_modes_are_ordered() {
        let pace = |engine_mode| {
            factors(&CarSetup { engine_mode, ..CarSetup::default() }, 0.5).straight_factor
        };
        assert!(pace(EngineMode::Quali) > pace(EngineMode::Race));
        assert!(pace(EngineMode::Race) > pace(EngineMode::Conservation));

        let wear = |engine_mode| {
            factors(&CarSetup { engine_mode, ..CarSetup::default() }, 0.5).wear_multiplier
        };
        assert!(wear(EngineMode::Conservation) < wear(EngineMode::Race));
    }

    #[test]
    fn auto_ers_interpolates_with_aggression() {
        let auto = CarSetup { ers_mode: ErsMode::Auto, ..CarSetup::default() };
        let aggressive = factors(&CarSetup { ers_mode: ErsMode::Aggressive, ..auto }, 0.3);
        let conservative = factors(&CarSetup { ers_mode: ErsMode::Conservative, ..auto }, 0.3);

        assert_relative_eq!(factors(&auto, 1.0).straight_factor, aggressive.straight_factor);
        assert_relative_eq!(factors(&auto, 0.0).straight_factor, conservative.straight_factor);
        assert_relative_eq!(conservative.wear_multiplier, 1.0);
        assert_relative_eq!(aggressive.wear_multiplier, 1.15);

        let mid = factors(&auto, 0.5);
        assert!(mid.straight_factor > conservative.straight_factor);
        assert!(mid.straight_factor < aggressive.straight_factor);
    }

    #[test]
    fn fuel_penalty_scales_with_mass_and_length() {
        let setup = CarSetup { fuel_kg: 40.0, ..CarSetup::default() };
        assert_relative_eq!(factors(&setup, 0.5).fuel_penalty_s, 40.0 * 0.035 * 6.0);
        assert_relative_eq!(factors(&CarSetup { fuel_kg: 0.0, ..setup }, 0.5).fuel_penalty_s, 0.0);
    }

    #[test]
    fn fuel_burn_never_goes_negative() {
        let setup = CarSetup { fuel_kg: 2.0, ..CarSetup::default() };
        assert_relative_eq!(setup.fuel_after_lap(&CarConstants::default()), 0.0);
    }
}
