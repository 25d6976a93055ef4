use crate::core::tireset::TireCompoundId;
use crate::core::track::NO_SECTORS;
use helpers::general::{argmax, argmin};
use serde::Serialize;
use std::fmt::Write;
use std::ops::AddAssign;

/// SectorBests tracks the fastest time observed in every sector across a session. It is owned by
/// the caller (or by the strategy analyzer), never by the simulator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectorBests {
    bests: [Option<f64>; NO_SECTORS],
}

impl SectorBests {
    pub fn new() -> SectorBests {
        SectorBests::default()
    }

    pub fn record(&mut self, sector_times: &[f64; NO_SECTORS]) {
        for (best, &t) in self.bests.iter_mut().zip(sector_times.iter()) {
            *best = Some(best.map_or(t, |b| b.min(t)));
        }
    }

    /// Sum of the best sector times; sectors never timed count as zero.
    pub fn theoretical_best(&self) -> f64 {
        self.bests.iter().map(|b| b.unwrap_or(0.0)).sum()
    }
}

/// TimeLossBreakdown splits the time a lap loses against a clean lap on fresh, suitable tires in
/// perfect grip with an empty tank. All values in seconds.
///
/// * `tire_degradation` - Grip of the set below a fresh one (wear and cold operating window)
/// * `fuel_weight` - Mass of the fuel load
/// * `weather` - Weather and track surface grip below 1.0
/// * `tire_suitability` - Tire category not matching the weather
/// * `mistakes` - Driver mistakes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimeLossBreakdown {
    pub tire_degradation: f64,
    pub fuel_weight: f64,
    pub weather: f64,
    pub tire_suitability: f64,
    pub mistakes: f64,
}

impl TimeLossBreakdown {
    pub fn total(&self) -> f64 {
        self.tire_degradation + self.fuel_weight + self.weather + self.tire_suitability + self.mistakes
    }
}

impl AddAssign for TimeLossBreakdown {
    fn add_assign(&mut self, other: TimeLossBreakdown) {
        self.tire_degradation += other.tire_degradation;
        self.fuel_weight += other.fuel_weight;
        self.weather += other.weather;
        self.tire_suitability += other.tire_suitability;
        self.mistakes += other.mistakes;
    }
}

/// LapResult is the immutable outcome of one simulated lap.
///
/// * `sector_times` - (s) Sector times in driving order
/// * `total_time` - (s) Sum of the sector times
/// * `theoretical_best` - (s) Sum of the session-best sector times, including this lap
/// * `fastest_sector` / `slowest_sector` - 1-based sector numbers
/// * `time_loss` - (s) total_time - theoretical_best
/// * `tire_life_pct` - Remaining tire life at the end of the lap
/// * `fuel_kg` - (kg) Fuel load at the start of the lap
/// * `fuel_remaining_kg` - (kg) Fuel load at the end of the lap
/// * `breakdown` - Time lost per effect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapResult {
    pub lap_number: u32,
    pub compound: TireCompoundId,
    pub fuel_kg: f64,
    pub fuel_remaining_kg: f64,
    pub sector_times: [f64; NO_SECTORS],
    pub total_time: f64,
    pub theoretical_best: f64,
    pub fastest_sector: usize,
    pub slowest_sector: usize,
    pub time_loss: f64,
    pub tire_life_pct: f64,
    pub mistakes: u32,
    pub breakdown: TimeLossBreakdown,
    pub warnings: Vec<String>,
}

impl LapResult {
    /// new builds the result of a lap whose sectors have already been recorded in `bests`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lap_number: u32,
        compound: TireCompoundId,
        fuel_kg: f64,
        fuel_remaining_kg: f64,
        sector_times: [f64; NO_SECTORS],
        bests: &SectorBests,
        tire_life_pct: f64,
        mistakes: u32,
        breakdown: TimeLossBreakdown,
        warnings: Vec<String>,
    ) -> LapResult {
        let total_time: f64 = sector_times.iter().sum();
        let theoretical_best = bests.theoretical_best();

        LapResult {
            lap_number,
            compound,
            fuel_kg,
            fuel_remaining_kg,
            sector_times,
            total_time,
            theoretical_best,
            fastest_sector: argmin(&sector_times) + 1,
            slowest_sector: argmax(&sector_times) + 1,
            time_loss: total_time - theoretical_best,
            tire_life_pct,
            mistakes,
            breakdown,
            warnings,
        }
    }

    /// Spread between the slowest and the fastest sector.
    pub fn sector_balance(&self) -> f64 {
        self.sector_times[self.slowest_sector - 1] - self.sector_times[self.fastest_sector - 1]
    }
}

/// format_lap_time converts seconds into m:ss.sss (or ss.sss s below one minute). The time is
/// rounded to milliseconds before it is split into minutes and seconds.
pub fn format_lap_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "N/A".to_owned();
    }
    let ms = (seconds * 1000.0).round() as u64;
    let (minutes, ms) = (ms / 60_000, ms % 60_000);

    let mut out = String::new();
    if minutes > 0 {
        let _ = write!(out, "{}:{:02}.{:03}", minutes, ms / 1000, ms % 1000);
    } else {
        let _ = write!(out, "{}.{:03}s", ms / 1000, ms % 1000);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bests_keep_the_minimum_per_sector() {
        let mut bests = SectorBests::new();
        assert_relative_eq!(bests.theoretical_best(), 0.0);
        bests.record(&[30.0, 40.0, 35.0]);
        bests.record(&[31.0, 39.0, 36.0]);
        assert_relative_eq!(bests.theoretical_best(), 30.0 + 39.0 + 35.0);
    }

    #[test]
    fn statistics_of_a_lap() {
        let mut bests = SectorBests::new();
        bests.record(&[30.0, 38.0, 35.0]);
        let times = [31.0, 40.0, 35.0];
        bests.record(&times);
        let lap = LapResult::new(
            2,
            TireCompoundId::Soft,
            50.0,
            47.8,
            times,
            &bests,
            97.0,
            0,
            TimeLossBreakdown::default(),
            vec![],
        );

        assert_relative_eq!(lap.total_time, 106.0);
        assert_eq!(lap.fastest_sector, 1);
        assert_eq!(lap.slowest_sector, 2);
        assert_relative_eq!(lap.time_loss, 106.0 - 103.0);
        assert_relative_eq!(lap.sector_balance(), 9.0);
        assert_relative_eq!(lap.fuel_remaining_kg, 47.8);
    }

    #[test]
    fn breakdown_sums_its_effects() {
        let mut breakdown = TimeLossBreakdown {
            tire_degradation: 0.4,
            fuel_weight: 1.5,
            ..Default::default()
        };
        breakdown += TimeLossBreakdown {
            weather: 2.0,
            mistakes: 0.6,
            fuel_weight: 0.5,
            ..Default::default()
        };
        assert_relative_eq!(breakdown.fuel_weight, 2.0);
        assert_relative_eq!(breakdown.total(), 5.0);
    }

    #[test]
    fn formats_lap_times() {
        assert_eq!(format_lap_time(105.5123), "1:45.512");
        assert_eq!(format_lap_time(59.1), "59.100s");
        assert_eq!(format_lap_time(-1.0), "N/A");
        assert_eq!(format_lap_time(65.0), "1:05.000");
    }

    #[test]
    fn rounding_carries_into_the_next_minute() {
        assert_eq!(format_lap_time(119.9996), "2:00.000");
        assert_eq!(format_lap_time(59.9996), "1:00.000");
        assert_eq!(format_lap_time(59.9994), "59.999s");
    }
}
