use crate::core::constants::SimConstants;
use crate::core::errors::ConfigError;
use crate::core::tireset::{TireCompound, TireCompoundId};
use crate::core::track::{Circuit, CircuitPars};
use crate::core::weather::{TrackCondition, TrackConditionId, WeatherCondition, WeatherId};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::info;

pub const CIRCUITS_FILE: &str = "circuits.json";
pub const TIRES_FILE: &str = "tires.json";
pub const WEATHER_FILE: &str = "weather.json";
pub const SIM_CONSTANTS_FILE: &str = "sim_constants.json";

#[derive(Debug, Deserialize, Clone)]
pub struct CircuitsFile {
    pub circuits: Vec<CircuitPars>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TiresFile {
    pub compounds: Vec<TireCompound>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherFile {
    pub conditions: Vec<WeatherCondition>,
    pub track_conditions: Vec<TrackCondition>,
}

/// RefData holds the read-only reference data shared by every simulation of a process. It is
/// validated once on construction and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RefData {
    circuits: Vec<Circuit>,
    compounds: Vec<TireCompound>,
    weather: Vec<WeatherCondition>,
    track_conditions: Vec<TrackCondition>,
}

impl RefData {
    pub fn new(
        circuits_file: &CircuitsFile,
        tires_file: &TiresFile,
        weather_file: &WeatherFile,
    ) -> Result<RefData, ConfigError> {
        let mut circuits = Vec::with_capacity(circuits_file.circuits.len());
        let mut seen = HashSet::new();
        for circuit_pars in circuits_file.circuits.iter() {
            if !seen.insert(circuit_pars.id.to_owned()) {
                return Err(ConfigError::DuplicateId {
                    kind: "circuit",
                    id: circuit_pars.id.to_owned(),
                });
            }
            circuits.push(Circuit::new(circuit_pars)?);
        }

        let mut compounds = tires_file.compounds.to_owned();
        check_unique("tire compound", compounds.iter().map(|c| c.id.to_string()))?;
        for compound in compounds.iter() {
            compound.validate()?;
        }
        compounds.sort_by_key(|c| c.id);

        let weather = weather_file.conditions.to_owned();
        check_unique("weather condition", weather.iter().map(|w| w.id.to_string()))?;
        for condition in weather.iter() {
            condition.validate()?;
        }

        let track_conditions = weather_file.track_conditions.to_owned();
        check_unique(
            "track condition",
            track_conditions.iter().map(|t| t.id.to_string()),
        )?;
        for condition in track_conditions.iter() {
            condition.validate()?;
        }

        Ok(RefData {
            circuits,
            compounds,
            weather,
            track_conditions,
        })
    }

    /// load reads and validates circuits.json, tires.json and weather.json from the given
    /// parameter directory.
    pub fn load(par_dir: &Path) -> anyhow::Result<RefData> {
        let circuits_file: CircuitsFile = read_json(&par_dir.join(CIRCUITS_FILE), "circuit")?;
        let tires_file: TiresFile = read_json(&par_dir.join(TIRES_FILE), "tire")?;
        let weather_file: WeatherFile = read_json(&par_dir.join(WEATHER_FILE), "weather")?;

        let ref_data = RefData::new(&circuits_file, &tires_file, &weather_file)
            .context("Invalid reference data!")?;
        info!(
            circuits = ref_data.circuits.len(),
            compounds = ref_data.compounds.len(),
            weather = ref_data.weather.len(),
            "reference data loaded from {}",
            par_dir.display()
        );
        Ok(ref_data)
    }

    pub fn circuit(&self, id: &str) -> Result<&Circuit, ConfigError> {
        let id_norm = id.trim().to_lowercase();
        self.circuits
            .iter()
            .find(|c| c.id.to_lowercase() == id_norm)
            .ok_or_else(|| ConfigError::UnknownId {
                kind: "circuit",
                id: id.to_owned(),
            })
    }

    pub fn compound(&self, id: TireCompoundId) -> Result<&TireCompound, ConfigError> {
        self.compounds
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ConfigError::MissingCompound(id.to_string()))
    }

    pub fn weather(&self, id: WeatherId) -> Result<&WeatherCondition, ConfigError> {
        self.weather
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| ConfigError::MissingWeather(id.to_string()))
    }

    pub fn track_condition(&self, id: TrackConditionId) -> Result<&TrackCondition, ConfigError> {
        self.track_conditions
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ConfigError::UnknownId {
                kind: "track condition",
                id: id.to_string(),
            })
    }

    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    /// All loaded compounds, ordered by compound id.
    pub fn compounds(&self) -> &[TireCompound] {
        &self.compounds
    }

    pub fn weather_conditions(&self) -> &[WeatherCondition] {
        &self.weather
    }
}

fn check_unique<I: Iterator<Item = String>>(kind: &'static str, ids: I) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.to_owned()) {
            return Err(ConfigError::DuplicateId { kind, id });
        }
    }
    Ok(())
}

/// read_json reads the JSON file and decodes it into the requested parameter struct.
pub fn read_json<T: DeserializeOwned>(filepath: &Path, what: &str) -> anyhow::Result<T> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open {} parameter file {}!",
            what,
            filepath.display()
        ))?;
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse {} parameter file {}!",
        what,
        filepath.display()
    ))?;
    Ok(pars)
}

/// Read simulation constants (calibration parameters) from a JSON file. A missing file falls
/// back to the built-in defaults.
pub fn read_sim_constants(filepath: &Path) -> anyhow::Result<SimConstants> {
    let sim_consts: SimConstants = if filepath.exists() {
        read_json(filepath, "simulation constants")?
    } else {
        info!(
            "no simulation constants at {}, using defaults",
            filepath.display()
        );
        SimConstants::default()
    };
    sim_consts
        .validate()
        .context("Invalid simulation constants!")?;
    Ok(sim_consts)
}
