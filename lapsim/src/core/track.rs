use crate::core::constants::TireConstants;
use crate::core::errors::{check_config_range, ConfigError};
use serde::{Deserialize, Serialize};

/// Number of timed sectors every circuit is split into.
pub const NO_SECTORS: usize = 3;

/// Sectors with at least this straight fraction count as straight-dominated.
pub const STRAIGHT_DOMINATED_THRESHOLD: f64 = 0.5;

/// * `length_km` - (km) Sector length
/// * `corners` - Number of corners in the sector
/// * `corner_severity` - Average corner severity (0 = flat out kink, 1 = hairpin)
/// * `elevation_delta` - (m) Elevation change across the sector
/// * `straight_fraction` - Fraction of the sector length spent on straights (0-1)
/// * `drs_enabled` - True if the sector contains a DRS zone
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SectorPars {
    pub length_km: f64,
    pub corners: u32,
    pub corner_severity: f64,
    #[serde(default)]
    pub elevation_delta: f64,
    pub straight_fraction: f64,
    #[serde(default)]
    pub drs_enabled: bool,
}

/// * `id` - Circuit id used for lookups, e.g. spa
/// * `name` - Display name, e.g. Circuit de Spa-Francorchamps
/// * `country` - Host country
/// * `sectors` - Exactly three sectors in driving order
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CircuitPars {
    pub id: String,
    pub name: String,
    pub country: String,
    pub sectors: Vec<SectorPars>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorKind {
    CornerDense,
    StraightDominated,
}

#[derive(Debug, Clone)]
pub struct Sector {
    pub number: usize,
    pub length_km: f64,
    pub corners: u32,
    pub corner_severity: f64,
    pub elevation_delta: f64,
    pub straight_fraction: f64,
    pub drs_enabled: bool,
    pub kind: SectorKind,
    pub length_frac: f64,
}

/// Circuit is immutable after construction. Sector lengths always sum to a positive total.
#[derive(Debug, Clone)]
pub struct Circuit {
    pub id: String,
    pub name: String,
    pub country: String,
    pub length_km: f64,
    pub sectors: [Sector; NO_SECTORS],
}

impl Circuit {
    pub fn new(circuit_pars: &CircuitPars) -> Result<Circuit, ConfigError> {
        if circuit_pars.sectors.len() != NO_SECTORS {
            return Err(ConfigError::SectorCount {
                circuit: circuit_pars.id.to_owned(),
                found: circuit_pars.sectors.len(),
            });
        }

        for (i, sector_pars) in circuit_pars.sectors.iter().enumerate() {
            if !(sector_pars.length_km > 0.0) || !sector_pars.length_km.is_finite() {
                return Err(ConfigError::NonPositiveLength {
                    circuit: circuit_pars.id.to_owned(),
                    sector: i + 1,
                    length_km: sector_pars.length_km,
                });
            }
            let entity = format!("circuit '{}' sector {}", circuit_pars.id, i + 1);
            check_config_range(&entity, "corner_severity", sector_pars.corner_severity, 0.0, 1.0)?;
            check_config_range(
                &entity,
                "straight_fraction",
                sector_pars.straight_fraction,
                0.0,
                1.0,
            )?;
            check_config_range(
                &entity,
                "elevation_delta",
                sector_pars.elevation_delta,
                f64::MIN,
                f64::MAX,
            )?;
        }

        let length_km: f64 = circuit_pars.sectors.iter().map(|s| s.length_km).sum();

        let make_sector = |i: usize| {
            let sector_pars = &circuit_pars.sectors[i];
            let kind = if sector_pars.straight_fraction >= STRAIGHT_DOMINATED_THRESHOLD {
                SectorKind::StraightDominated
            } else {
                SectorKind::CornerDense
            };

            Sector {
                number: i + 1,
                length_km: sector_pars.length_km,
                corners: sector_pars.corners,
                corner_severity: sector_pars.corner_severity,
                elevation_delta: sector_pars.elevation_delta,
                straight_fraction: sector_pars.straight_fraction,
                drs_enabled: sector_pars.drs_enabled,
                kind,
                length_frac: sector_pars.length_km / length_km,
            }
        };

        Ok(Circuit {
            id: circuit_pars.id.to_owned(),
            name: circuit_pars.name.to_owned(),
            country: circuit_pars.country.to_owned(),
            length_km,
            sectors: [make_sector(0), make_sector(1), make_sector(2)],
        })
    }

    /// Length-weighted straight fraction of the whole lap.
    pub fn straight_fraction(&self) -> f64 {
        self.sectors
            .iter()
            .map(|s| s.straight_fraction * s.length_frac)
            .sum()
    }

    pub fn total_corners(&self) -> u32 {
        self.sectors.iter().map(|s| s.corners).sum()
    }

    /// The method returns the tire wear multiplier of the circuit. It grows with the
    /// length-weighted corner severity and with the number of corners per kilometre.
    pub fn abrasiveness(&self, tire_consts: &TireConstants) -> f64 {
        let mean_severity: f64 = self
            .sectors
            .iter()
            .map(|s| s.corner_severity * s.length_frac)
            .sum();
        let corners_per_km = self.total_corners() as f64 / self.length_km;

        tire_consts.abrasiveness_base
            + tire_consts.abrasiveness_severity_weight * mean_severity
            + tire_consts.abrasiveness_corner_density_weight * corners_per_km
    }

    pub fn drs_sectors(&self) -> Vec<usize> {
        self.sectors
            .iter()
            .filter(|s| s.drs_enabled)
            .map(|s| s.number)
            .collect()
    }
}
