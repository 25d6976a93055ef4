use crate::core::errors::{check_config_range, ConfigError};
use serde::{Deserialize, Serialize};

/// Calibration constants of the lap model. Every field has a default so that a constants file
/// only needs to contain the values that differ.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct SimConstants {
    pub lap: LapConstants,
    pub car: CarConstants,
    pub tires: TireConstants,
}

/// * `corner_speed_kmh` - (km/h) Reference speed of corner-dense sectors
/// * `straight_speed_kmh` - (km/h) Reference speed of straight-dominated sectors
/// * `severity_speed_loss` - Reference speed reduction at corner severity 1 on a corner-only sector
/// * `elevation_time_per_m` - Relative time added per metre of absolute elevation change
/// * `grip_share_corner_dense` - Grip-limited share of sector time in corner-dense sectors
/// * `grip_share_straight_dominated` - Grip-limited share of sector time in straight-dominated sectors
/// * `fuel_penalty_s_per_kg_km` - (s/kg/km) Time penalty of fuel mass
/// * `drs_time_fraction` - Sector time reduction when DRS is used
/// * `aggression_time_bonus` - Sector time reduction at aggression 1
/// * `aggression_mistake_rate` - Mistake probability added per sector at aggression 1
/// * `mistake_loss_min` / `mistake_loss_max` - Sector time fraction lost by a mistake
/// * `tire_under_penalty` - Sector time penalty per category step a tire is under-treaded
/// * `tire_over_penalty` - Sector time penalty per category step a tire is over-treaded
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LapConstants {
    pub corner_speed_kmh: f64,
    pub straight_speed_kmh: f64,
    pub severity_speed_loss: f64,
    pub elevation_time_per_m: f64,
    pub grip_share_corner_dense: f64,
    pub grip_share_straight_dominated: f64,
    pub fuel_penalty_s_per_kg_km: f64,
    pub drs_time_fraction: f64,
    pub aggression_time_bonus: f64,
    pub aggression_mistake_rate: f64,
    pub mistake_loss_min: f64,
    pub mistake_loss_max: f64,
    pub tire_under_penalty: f64,
    pub tire_over_penalty: f64,
}

impl Default for LapConstants {
    fn default() -> Self {
        LapConstants {
            corner_speed_kmh: 245.0,
            straight_speed_kmh: 315.0,
            severity_speed_loss: 0.35,
            elevation_time_per_m: 0.0002,
            grip_share_corner_dense: 0.7,
            grip_share_straight_dominated: 0.3,
            fuel_penalty_s_per_kg_km: 0.035,
            drs_time_fraction: 0.03,
            aggression_time_bonus: 0.02,
            aggression_mistake_rate: 0.03,
            mistake_loss_min: 0.05,
            mistake_loss_max: 0.15,
            tire_under_penalty: 0.15,
            tire_over_penalty: 0.05,
        }
    }
}

/// * `power` - Straight-line pace multiplier
/// * `wear` - Tire wear multiplier
/// * `fuel_per_lap_kg` - (kg) Fuel burned per lap
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct EngineModePars {
    pub power: f64,
    pub wear: f64,
    pub fuel_per_lap_kg: f64,
}

/// * `boost` - Relative straight-line pace gain
/// * `wear` - Tire wear multiplier
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct ErsPars {
    pub boost: f64,
    pub wear: f64,
}

/// * `corner_gain_per_level` - Cornering speed gain per downforce level up to the knee
/// * `corner_gain_above_knee` - Cornering speed gain per downforce level above the knee
/// * `downforce_knee` - Downforce level after which returns diminish
/// * `drag_per_level` - Straight-line drag penalty per downforce level at straight fraction 1
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CarConstants {
    pub corner_gain_per_level: f64,
    pub corner_gain_above_knee: f64,
    pub downforce_knee: u8,
    pub drag_per_level: f64,
    pub engine_quali: EngineModePars,
    pub engine_race: EngineModePars,
    pub engine_conservation: EngineModePars,
    pub ers_aggressive: ErsPars,
    pub ers_conservative: ErsPars,
}

impl Default for CarConstants {
    fn default() -> Self {
        CarConstants {
            corner_gain_per_level: 0.02,
            corner_gain_above_knee: 0.006,
            downforce_knee: 7,
            drag_per_level: 0.012,
            engine_quali: EngineModePars {
                power: 1.03,
                wear: 1.10,
                fuel_per_lap_kg: 3.5,
            },
            engine_race: EngineModePars {
                power: 1.0,
                wear: 1.0,
                fuel_per_lap_kg: 2.8,
            },
            engine_conservation: EngineModePars {
                power: 0.97,
                wear: 0.85,
                fuel_per_lap_kg: 2.3,
            },
            ers_aggressive: ErsPars {
                boost: 0.015,
                wear: 1.15,
            },
            ers_conservative: ErsPars {
                boost: 0.006,
                wear: 1.0,
            },
        }
    }
}

/// * `grip_floor` - Minimum grip factor of a worn tire
/// * `cliff_rate_multiplier` - Degradation rate multiplier past the nominal tire life
/// * `cold_grip_threshold` - Weather grip below which slicks leave their operating window
/// * `cold_grip_penalty` - Flat grip loss of a tire outside its operating window
/// * `abrasiveness_*` - Coefficients of the circuit abrasiveness estimate
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct TireConstants {
    pub grip_floor: f64,
    pub cliff_rate_multiplier: f64,
    pub cold_grip_threshold: f64,
    pub cold_grip_penalty: f64,
    pub abrasiveness_base: f64,
    pub abrasiveness_severity_weight: f64,
    pub abrasiveness_corner_density_weight: f64,
}

impl Default for TireConstants {
    fn default() -> Self {
        TireConstants {
            grip_floor: 0.3,
            cliff_rate_multiplier: 2.0,
            cold_grip_threshold: 0.85,
            cold_grip_penalty: 0.08,
            abrasiveness_base: 0.7,
            abrasiveness_severity_weight: 0.6,
            abrasiveness_corner_density_weight: 0.04,
        }
    }
}

impl SimConstants {
    /// The method checks that all constants lie in a range the lap model can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lap = &self.lap;
        let e = "sim constants";
        check_config_range(e, "corner_speed_kmh", lap.corner_speed_kmh, f64::MIN_POSITIVE, f64::MAX)?;
        check_config_range(e, "straight_speed_kmh", lap.straight_speed_kmh, f64::MIN_POSITIVE, f64::MAX)?;
        check_config_range(e, "severity_speed_loss", lap.severity_speed_loss, 0.0, 0.9)?;
        check_config_range(e, "elevation_time_per_m", lap.elevation_time_per_m, 0.0, 0.01)?;
        check_config_range(e, "grip_share_corner_dense", lap.grip_share_corner_dense, 0.0, 1.0)?;
        check_config_range(
            e,
            "grip_share_straight_dominated",
            lap.grip_share_straight_dominated,
            0.0,
            1.0,
        )?;
        check_config_range(e, "fuel_penalty_s_per_kg_km", lap.fuel_penalty_s_per_kg_km, 0.0, 1.0)?;
        check_config_range(e, "drs_time_fraction", lap.drs_time_fraction, 0.0, 0.5)?;
        check_config_range(e, "aggression_time_bonus", lap.aggression_time_bonus, 0.0, 0.5)?;
        check_config_range(e, "aggression_mistake_rate", lap.aggression_mistake_rate, 0.0, 1.0)?;
        check_config_range(e, "mistake_loss_min", lap.mistake_loss_min, 0.0, 1.0)?;
        check_config_range(e, "mistake_loss_max", lap.mistake_loss_max, lap.mistake_loss_min, 1.0)?;
        check_config_range(e, "tire_under_penalty", lap.tire_under_penalty, 0.0, 1.0)?;
        check_config_range(e, "tire_over_penalty", lap.tire_over_penalty, 0.0, 1.0)?;

        let car = &self.car;
        check_config_range(e, "corner_gain_per_level", car.corner_gain_per_level, 0.0, 0.1)?;
        check_config_range(e, "corner_gain_above_knee", car.corner_gain_above_knee, 0.0, 0.1)?;
        check_config_range(e, "downforce_knee", car.downforce_knee as f64, 1.0, 10.0)?;
        check_config_range(e, "drag_per_level", car.drag_per_level, 0.0, 0.1)?;
        for mode in [&car.engine_quali, &car.engine_race, &car.engine_conservation] {
            check_config_range(e, "engine power", mode.power, f64::MIN_POSITIVE, 2.0)?;
            check_config_range(e, "engine wear", mode.wear, 0.0, 5.0)?;
            check_config_range(e, "engine fuel_per_lap_kg", mode.fuel_per_lap_kg, 0.0, 10.0)?;
        }
        for ers in [&car.ers_aggressive, &car.ers_conservative] {
            check_config_range(e, "ers boost", ers.boost, 0.0, 0.5)?;
            check_config_range(e, "ers wear", ers.wear, 0.0, 5.0)?;
        }

        let tires = &self.tires;
        check_config_range(e, "grip_floor", tires.grip_floor, f64::MIN_POSITIVE, 1.0)?;
        check_config_range(e, "cliff_rate_multiplier", tires.cliff_rate_multiplier, 1.0, 10.0)?;
        check_config_range(e, "cold_grip_threshold", tires.cold_grip_threshold, 0.0, 1.0)?;
        check_config_range(e, "cold_grip_penalty", tires.cold_grip_penalty, 0.0, 1.0)?;
        check_config_range(e, "abrasiveness_base", tires.abrasiveness_base, 0.0, 5.0)?;
        check_config_range(e, "abrasiveness_severity_weight", tires.abrasiveness_severity_weight, 0.0, 5.0)?;
        check_config_range(
            e,
            "abrasiveness_corner_density_weight",
            tires.abrasiveness_corner_density_weight,
            0.0,
            1.0,
        )?;
        Ok(())
    }
}
