use thiserror::Error;

/// ConfigError is raised while loading or looking up reference data and calibration constants.
/// It never occurs in the middle of a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown {kind} '{id}'")]
    UnknownId { kind: &'static str, id: String },

    #[error("tire compound '{0}' is not part of the loaded tire catalog")]
    MissingCompound(String),

    #[error("weather condition '{0}' is not part of the loaded weather catalog")]
    MissingWeather(String),

    #[error("duplicate {kind} id '{id}' in reference data")]
    DuplicateId { kind: &'static str, id: String },

    #[error("circuit '{circuit}' must have exactly 3 sectors, found {found}")]
    SectorCount { circuit: String, found: usize },

    #[error("sector {sector} of circuit '{circuit}' has non-positive length {length_km} km")]
    NonPositiveLength {
        circuit: String,
        sector: usize,
        length_km: f64,
    },

    #[error("{entity}: `{field}` = {value} is out of range")]
    OutOfRange {
        entity: String,
        field: &'static str,
        value: f64,
    },
}

/// ValidationError is raised when a caller-supplied input violates its allowed range. It names
/// the offending field and the constraint.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid value {value} for `{field}`: must be {constraint}")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: f64,
    pub constraint: &'static str,
}

impl ValidationError {
    pub fn new(field: &'static str, value: f64, constraint: &'static str) -> ValidationError {
        ValidationError {
            field,
            value,
            constraint,
        }
    }
}

/// SimError is returned by every fallible engine entry point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// check_range returns a ValidationError if value is not finite or outside [min, max].
pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    constraint: &'static str,
) -> Result<(), ValidationError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::new(field, value, constraint))
    }
}

/// check_config_range is the reference-data counterpart of check_range.
pub(crate) fn check_config_range(
    entity: &str,
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            entity: entity.to_owned(),
            field,
            value,
        })
    }
}
