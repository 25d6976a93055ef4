use crate::core::constants::TireConstants;
use crate::core::errors::{check_config_range, ConfigError};
use crate::core::track::Circuit;
use crate::core::weather::WeatherCondition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TireCompoundId {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
}

impl TireCompoundId {
    pub const ALL: [TireCompoundId; 5] = [
        TireCompoundId::Soft,
        TireCompoundId::Medium,
        TireCompoundId::Hard,
        TireCompoundId::Intermediate,
        TireCompoundId::Wet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TireCompoundId::Soft => "soft",
            TireCompoundId::Medium => "medium",
            TireCompoundId::Hard => "hard",
            TireCompoundId::Intermediate => "intermediate",
            TireCompoundId::Wet => "wet",
        }
    }

    pub fn category(&self) -> TireCategory {
        match self {
            TireCompoundId::Soft | TireCompoundId::Medium | TireCompoundId::Hard => {
                TireCategory::Slick
            }
            TireCompoundId::Intermediate => TireCategory::Intermediate,
            TireCompoundId::Wet => TireCategory::Wet,
        }
    }
}

impl FromStr for TireCompoundId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TireCompoundId::ALL
            .iter()
            .find(|id| id.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| ConfigError::UnknownId {
                kind: "tire compound",
                id: s.to_owned(),
            })
    }
}

impl fmt::Display for TireCompoundId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tread categories ordered by how much water they clear.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TireCategory {
    Slick,
    Intermediate,
    Wet,
}

impl TireCategory {
    pub fn level(&self) -> i32 {
        match self {
            TireCategory::Slick => 0,
            TireCategory::Intermediate => 1,
            TireCategory::Wet => 2,
        }
    }
}

impl fmt::Display for TireCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TireCategory::Slick => "slick",
            TireCategory::Intermediate => "intermediate",
            TireCategory::Wet => "wet",
        })
    }
}

/// * `id` - Compound id
/// * `base_grip` - Grip of a fresh set relative to the reference slick
/// * `degradation_rate` - Grip loss per lap on a circuit of abrasiveness 1
/// * `nominal_life_laps` - Laps after which the degradation rate increases (cliff)
/// * `optimal_temp_window` - (°C) Operating window of the compound
/// * `wet_suitable` - True if the compound keeps its operating window on a cold, wet track
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TireCompound {
    pub id: TireCompoundId,
    pub base_grip: f64,
    pub degradation_rate: f64,
    pub nominal_life_laps: u32,
    #[serde(default = "default_temp_window")]
    pub optimal_temp_window: [f64; 2],
    pub wet_suitable: bool,
}

fn default_temp_window() -> [f64; 2] {
    [80.0, 110.0]
}

impl TireCompound {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entity = format!("tire compound '{}'", self.id);
        check_config_range(&entity, "base_grip", self.base_grip, f64::MIN_POSITIVE, 2.0)?;
        check_config_range(&entity, "degradation_rate", self.degradation_rate, f64::MIN_POSITIVE, 1.0)?;
        check_config_range(
            &entity,
            "optimal_temp_window",
            self.optimal_temp_window[1] - self.optimal_temp_window[0],
            0.0,
            f64::MAX,
        )?;
        Ok(())
    }
}

/// TireState is owned by the caller and threaded from lap to lap. `laps_run` never decreases
/// and `grip_factor` never increases for the same set of tires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TireState {
    pub compound: TireCompoundId,
    pub laps_run: u32,
    pub grip_factor: f64,
    initial_grip: f64,
}

impl TireState {
    /// A new set of tires straight out of the blankets.
    pub fn fresh(compound: TireCompoundId) -> TireState {
        TireState {
            compound,
            laps_run: 0,
            grip_factor: 1.0,
            initial_grip: 1.0,
        }
    }

    /// Remaining tire life in percent of the grip the set had at lap 0.
    pub fn life_remaining_pct(&self) -> f64 {
        (self.grip_factor / self.initial_grip * 100.0).min(100.0)
    }
}

/// TireDegradation evolves a TireState over the laps of a stint.
#[derive(Debug, Clone, Copy)]
pub struct TireDegradation<'a> {
    tire_consts: &'a TireConstants,
}

impl<'a> TireDegradation<'a> {
    pub fn new(tire_consts: &'a TireConstants) -> TireDegradation<'a> {
        TireDegradation { tire_consts }
    }

    /// degrade returns the tire state after `laps_completed` laps on the current set.
    ///
    /// * wear: `degradation_rate * abrasiveness * wear_multiplier * effective_laps`, where laps
    ///   past the nominal life count `cliff_rate_multiplier` times
    /// * operating window: a flat grip penalty if the weather is colder/wetter than the
    ///   threshold and the compound is not wet-suited
    /// * the grip factor never drops below `grip_floor`
    ///
    /// A state of another compound is treated as a tire change and starts from a fresh set.
    /// `laps_completed` smaller than the laps already run is ignored.
    pub fn degrade(
        &self,
        tire_state: &TireState,
        compound: &TireCompound,
        circuit: &Circuit,
        weather: &WeatherCondition,
        wear_multiplier: f64,
        laps_completed: u32,
    ) -> TireState {
        let laps_run = if tire_state.compound == compound.id {
            laps_completed.max(tire_state.laps_run)
        } else {
            laps_completed
        };

        let initial_grip = self.window_grip(compound, weather);
        let grip_factor = (initial_grip - self.wear_loss(compound, circuit, wear_multiplier, laps_run))
            .max(self.tire_consts.grip_floor);

        debug!(
            compound = %compound.id,
            laps_run,
            grip_factor,
            "tire state updated"
        );

        TireState {
            compound: compound.id,
            laps_run,
            grip_factor,
            initial_grip,
        }
    }

    /// Grip of a fresh set in the given weather.
    fn window_grip(&self, compound: &TireCompound, weather: &WeatherCondition) -> f64 {
        if weather.grip_multiplier < self.tire_consts.cold_grip_threshold && !compound.wet_suitable {
            (1.0 - self.tire_consts.cold_grip_penalty).max(self.tire_consts.grip_floor)
        } else {
            1.0
        }
    }

    fn wear_loss(
        &self,
        compound: &TireCompound,
        circuit: &Circuit,
        wear_multiplier: f64,
        laps_run: u32,
    ) -> f64 {
        let laps = laps_run as f64;
        let life = compound.nominal_life_laps as f64;
        let effective_laps =
            laps.min(life) + self.tire_consts.cliff_rate_multiplier * (laps - life).max(0.0);

        compound.degradation_rate * circuit.abrasiveness(self.tire_consts) * wear_multiplier * effective_laps
    }
}
