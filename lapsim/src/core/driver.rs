use crate::core::errors::{check_range, ValidationError};
use serde::{Deserialize, Serialize};

/// * `aggression` - Driver aggression from 0.0 (conservative) to 1.0 (maximum attack)
/// * `use_drs` - True if DRS is used in the DRS-enabled sectors
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct DriverPars {
    #[serde(default = "default_aggression")]
    pub aggression: f64,
    #[serde(default = "default_use_drs")]
    pub use_drs: bool,
}

fn default_aggression() -> f64 {
    0.5
}

fn default_use_drs() -> bool {
    true
}

impl Default for DriverPars {
    fn default() -> Self {
        DriverPars {
            aggression: default_aggression(),
            use_drs: default_use_drs(),
        }
    }
}

impl DriverPars {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("aggression", self.aggression, 0.0, 1.0, "between 0.0 and 1.0")
    }
}
