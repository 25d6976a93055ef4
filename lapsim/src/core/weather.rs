use crate::core::errors::{check_config_range, ConfigError};
use crate::core::tireset::TireCategory;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeatherId {
    Dry,
    Damp,
    LightRain,
    HeavyRain,
    ExtremeWet,
}

impl WeatherId {
    pub const ALL: [WeatherId; 5] = [
        WeatherId::Dry,
        WeatherId::Damp,
        WeatherId::LightRain,
        WeatherId::HeavyRain,
        WeatherId::ExtremeWet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherId::Dry => "dry",
            WeatherId::Damp => "damp",
            WeatherId::LightRain => "light_rain",
            WeatherId::HeavyRain => "heavy_rain",
            WeatherId::ExtremeWet => "extreme_wet",
        }
    }
}

impl FromStr for WeatherId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeatherId::ALL
            .iter()
            .find(|id| id.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| ConfigError::UnknownId {
                kind: "weather condition",
                id: s.to_owned(),
            })
    }
}

impl fmt::Display for WeatherId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrackConditionId {
    Green,
    RubberedIn,
    Dusty,
}

impl TrackConditionId {
    pub const ALL: [TrackConditionId; 3] = [
        TrackConditionId::Green,
        TrackConditionId::RubberedIn,
        TrackConditionId::Dusty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackConditionId::Green => "green",
            TrackConditionId::RubberedIn => "rubbered_in",
            TrackConditionId::Dusty => "dusty",
        }
    }
}

impl Default for TrackConditionId {
    fn default() -> Self {
        TrackConditionId::RubberedIn
    }
}

impl FromStr for TrackConditionId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackConditionId::ALL
            .iter()
            .find(|id| id.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| ConfigError::UnknownId {
                kind: "track condition",
                id: s.to_owned(),
            })
    }
}

impl fmt::Display for TrackConditionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// * `id` - Weather condition id
/// * `name` - Display name
/// * `grip_multiplier` - Grip relative to a dry track, (0, 1]
/// * `mistake_probability` - Base probability of a driver mistake per sector, [0, 1]
/// * `min_tire_suitability` - Least water-clearing tire category suited to the condition
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WeatherCondition {
    pub id: WeatherId,
    pub name: String,
    pub grip_multiplier: f64,
    pub mistake_probability: f64,
    pub min_tire_suitability: TireCategory,
}

impl WeatherCondition {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entity = format!("weather '{}'", self.id);
        check_config_range(&entity, "grip_multiplier", self.grip_multiplier, f64::MIN_POSITIVE, 1.0)?;
        check_config_range(&entity, "mistake_probability", self.mistake_probability, 0.0, 1.0)?;
        Ok(())
    }
}

/// Track surface state on top of the weather, e.g. a green track early in the weekend.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrackCondition {
    pub id: TrackConditionId,
    pub grip_modifier: f64,
}

impl TrackCondition {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_config_range(
            &format!("track condition '{}'", self.id),
            "grip_modifier",
            self.grip_modifier,
            f64::MIN_POSITIVE,
            1.5,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_case_insensitively() {
        assert_eq!("Light_Rain".parse::<WeatherId>().unwrap(), WeatherId::LightRain);
        assert_eq!("dusty".parse::<TrackConditionId>().unwrap(), TrackConditionId::Dusty);
        assert_eq!(
            "monsoon".parse::<WeatherId>().unwrap_err(),
            ConfigError::UnknownId {
                kind: "weather condition",
                id: "monsoon".to_owned()
            }
        );
    }

    #[test]
    fn rejects_zero_grip() {
        let weather = WeatherCondition {
            id: WeatherId::ExtremeWet,
            name: "Extreme".to_owned(),
            grip_multiplier: 0.0,
            mistake_probability: 0.2,
            min_tire_suitability: TireCategory::Wet,
        };
        assert!(weather.validate().is_err());
    }
}
