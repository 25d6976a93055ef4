use crate::core::strategy::{Comparison, SetupSuggestion};
use crate::core::tireset::TireCompoundId;
use crate::post::lap_result::{format_lap_time, LapResult};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Analysis selects what a session runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Lap(u32),
    CompareTires,
    FuelStrategy(Vec<f64>),
    Stint { no_laps: u32, burn_fuel: bool },
    Suggestions,
}

/// OutputLevel selects how much of a report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    /// Lap times only
    Quiet,
    Normal,
    /// Normal output plus the time loss breakdown of every lap
    Verbose,
}

/// SessionReport contains the outcome of one analysis for post-processing.
#[derive(Debug, Clone, Serialize)]
pub enum SessionReport {
    Lap(LapResult),
    TireComparison(Vec<Comparison>),
    FuelStrategy(Vec<Comparison>),
    Stint(Vec<LapResult>),
    Suggestion {
        suggestion: SetupSuggestion,
        lap: LapResult,
    },
}

/// One flat CSV line per lap result.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    label: &'a str,
    lap: u32,
    compound: TireCompoundId,
    fuel_kg: f64,
    fuel_remaining_kg: f64,
    sector_1: f64,
    sector_2: f64,
    sector_3: f64,
    total_time: f64,
    theoretical_best: f64,
    time_loss: f64,
    tire_life_pct: f64,
    mistakes: u32,
    loss_tire_degradation: f64,
    loss_fuel_weight: f64,
    loss_weather: f64,
    loss_tire_suitability: f64,
    loss_mistakes: f64,
}

impl<'a> CsvRow<'a> {
    fn new(label: &'a str, result: &LapResult) -> CsvRow<'a> {
        CsvRow {
            label,
            lap: result.lap_number,
            compound: result.compound,
            fuel_kg: result.fuel_kg,
            fuel_remaining_kg: result.fuel_remaining_kg,
            sector_1: result.sector_times[0],
            sector_2: result.sector_times[1],
            sector_3: result.sector_times[2],
            total_time: result.total_time,
            theoretical_best: result.theoretical_best,
            time_loss: result.time_loss,
            tire_life_pct: result.tire_life_pct,
            mistakes: result.mistakes,
            loss_tire_degradation: result.breakdown.tire_degradation,
            loss_fuel_weight: result.breakdown.fuel_weight,
            loss_weather: result.breakdown.weather,
            loss_tire_suitability: result.breakdown.tire_suitability,
            loss_mistakes: result.breakdown.mistakes,
        }
    }
}

impl SessionReport {
    /// Lap results of the report in report order, labelled.
    pub fn labelled_results(&self) -> Vec<(String, &LapResult)> {
        match self {
            SessionReport::Lap(result) => vec![("lap".to_owned(), result)],
            SessionReport::TireComparison(report) | SessionReport::FuelStrategy(report) => report
                .iter()
                .map(|c| (c.label.to_owned(), &c.result))
                .collect(),
            SessionReport::Stint(results) => results
                .iter()
                .map(|r| (format!("lap {}", r.lap_number), r))
                .collect(),
            SessionReport::Suggestion { lap, .. } => vec![("suggested".to_owned(), lap)],
        }
    }

    /// to_table returns the printable report.
    pub fn to_table(&self, level: OutputLevel) -> anyhow::Result<String> {
        let mut out = String::new();

        if level == OutputLevel::Quiet {
            match self {
                SessionReport::Lap(result) => {
                    writeln!(&mut out, "{}", format_lap_time(result.total_time))?
                }
                SessionReport::Suggestion { suggestion, .. } => writeln!(
                    &mut out,
                    "{} {} {}",
                    suggestion.best.downforce,
                    suggestion.best.engine_mode,
                    format_lap_time(suggestion.best.lap_time)
                )?,
                _ => {
                    for (label, result) in self.labelled_results() {
                        writeln!(&mut out, "{}: {}", label, format_lap_time(result.total_time))?;
                    }
                }
            }
            return Ok(out);
        }

        match self {
            SessionReport::Lap(result) => {
                writeln!(&mut out, "RESULT: Lap {}", result.lap_number)?;
                write_lap_details(&mut out, result)?;
            }
            SessionReport::TireComparison(report) => {
                writeln!(&mut out, "RESULT: Tire comparison (fresh sets)")?;
                write_comparison(&mut out, "compound", report, false)?;
            }
            SessionReport::FuelStrategy(report) => {
                writeln!(&mut out, "RESULT: Fuel strategy")?;
                write_comparison(&mut out, "fuel", report, true)?;
            }
            SessionReport::Stint(results) => {
                writeln!(&mut out, "RESULT: Stint of {} laps", results.len())?;
                writeln!(
                    &mut out,
                    "{:>4}  {:>10}  {:>9}  {:>9}  {:>9}  {:>8}  {:>7}  {:>8}",
                    "lap", "time", "S1", "S2", "S3", "fuel", "tires", "mistakes"
                )?;
                for r in results.iter() {
                    writeln!(
                        &mut out,
                        "{:>4}  {:>10}  {:8.3}s  {:8.3}s  {:8.3}s  {:6.1}kg  {:6.1}%  {:>8}",
                        r.lap_number,
                        format_lap_time(r.total_time),
                        r.sector_times[0],
                        r.sector_times[1],
                        r.sector_times[2],
                        r.fuel_kg,
                        r.tire_life_pct,
                        r.mistakes
                    )?;
                }
                if let (Some(first), Some(last)) = (results.first(), results.last()) {
                    let total: f64 = results.iter().map(|r| r.total_time).sum();
                    writeln!(
                        &mut out,
                        "Stint time {:.3}s, degradation {:+.3}s, theoretical best {}",
                        total,
                        last.total_time - first.total_time,
                        format_lap_time(last.theoretical_best)
                    )?;
                }
                write_warnings(&mut out, results.first())?;
            }
            SessionReport::Suggestion { suggestion, lap } => {
                writeln!(&mut out, "RESULT: Setup suggestion")?;
                writeln!(
                    &mut out,
                    "Downforce {}, engine mode {}: {} ({} combinations evaluated)",
                    suggestion.best.downforce,
                    suggestion.best.engine_mode,
                    format_lap_time(suggestion.best.lap_time),
                    suggestion.evaluations.len()
                )?;
                writeln!(&mut out, "{:>9}  {:>12}  {:>10}", "downforce", "engine mode", "time")?;
                for e in suggestion.evaluations.iter() {
                    writeln!(
                        &mut out,
                        "{:>9}  {:>12}  {:>10}{}",
                        e.downforce,
                        e.engine_mode.to_string(),
                        format_lap_time(e.lap_time),
                        if *e == suggestion.best { "  <" } else { "" }
                    )?;
                }
                writeln!(&mut out, "Suggested setup lap:")?;
                write_lap_details(&mut out, lap)?;
            }
        }

        if level == OutputLevel::Verbose {
            write_breakdown(&mut out, &self.labelled_results())?;
        }
        Ok(out)
    }

    /// print_report prints the report to the console output.
    pub fn print_report(&self, level: OutputLevel) -> anyhow::Result<()> {
        print!("{}", self.to_table(level)?);
        Ok(())
    }

    /// write_csv writes the report to a CSV file with one line per lap result (or per evaluated
    /// combination of a setup suggestion).
    pub fn write_csv(&self, filepath: &Path) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_path(filepath).context(format!(
            "Failed to create CSV file {}!",
            filepath.display()
        ))?;

        match self {
            SessionReport::Suggestion { suggestion, .. } => {
                for evaluation in suggestion.evaluations.iter() {
                    wtr.serialize(evaluation)?;
                }
            }
            _ => {
                for (label, result) in self.labelled_results() {
                    wtr.serialize(CsvRow::new(&label, result))?;
                }
            }
        }

        wtr.flush()
            .context(format!("Failed to write CSV file {}!", filepath.display()))?;
        Ok(())
    }
}

fn write_lap_details(out: &mut String, result: &LapResult) -> anyhow::Result<()> {
    writeln!(
        out,
        "Lap time {} ({} tires, {:.1}kg fuel)",
        format_lap_time(result.total_time),
        result.compound,
        result.fuel_kg
    )?;
    for (i, t) in result.sector_times.iter().enumerate() {
        let tag = if i + 1 == result.fastest_sector {
            " (fastest)"
        } else if i + 1 == result.slowest_sector {
            " (slowest)"
        } else {
            ""
        };
        writeln!(out, "  S{}: {:8.3}s{}", i + 1, t, tag)?;
    }
    writeln!(
        out,
        "Theoretical best {}, time loss {:.3}s, sector balance {:.3}s",
        format_lap_time(result.theoretical_best),
        result.time_loss,
        result.sector_balance()
    )?;
    writeln!(
        out,
        "Tire life {:.1}%, fuel remaining {:.1}kg, mistakes {}",
        result.tire_life_pct, result.fuel_remaining_kg, result.mistakes
    )?;
    write_warnings(out, Some(result))
}

fn write_breakdown(out: &mut String, results: &[(String, &LapResult)]) -> anyhow::Result<()> {
    writeln!(out, "Time loss breakdown:")?;
    writeln!(
        out,
        "{:>12}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
        "", "tires", "fuel", "weather", "tire fit", "mistakes", "total"
    )?;
    for (label, result) in results.iter() {
        let b = &result.breakdown;
        writeln!(
            out,
            "{:>12}  {:7.3}s  {:7.3}s  {:7.3}s  {:7.3}s  {:7.3}s  {:7.3}s",
            label,
            b.tire_degradation,
            b.fuel_weight,
            b.weather,
            b.tire_suitability,
            b.mistakes,
            b.total()
        )?;
    }
    Ok(())
}

fn write_comparison(
    out: &mut String,
    label_header: &str,
    report: &[Comparison],
    show_delta_per_kg: bool,
) -> anyhow::Result<()> {
    let fastest = report
        .iter()
        .map(|c| c.result.total_time)
        .fold(f64::INFINITY, f64::min);

    writeln!(
        out,
        "{:>12}  {:>10}  {:>9}  {:>9}  {:>9}  {:>8}",
        label_header, "time", "S1", "S2", "S3", "gap"
    )?;
    for c in report.iter() {
        writeln!(
            out,
            "{:>12}  {:>10}  {:8.3}s  {:8.3}s  {:8.3}s  {:+7.3}s",
            c.label,
            format_lap_time(c.result.total_time),
            c.result.sector_times[0],
            c.result.sector_times[1],
            c.result.sector_times[2],
            c.result.total_time - fastest
        )?;
        for warning in c.result.warnings.iter() {
            writeln!(out, "{:>12}  WARNING: {}", "", warning)?;
        }
    }

    if show_delta_per_kg && report.len() > 1 {
        let (lo, hi) = (&report[0].result, &report[report.len() - 1].result);
        if (hi.fuel_kg - lo.fuel_kg).abs() > f64::EPSILON {
            writeln!(
                out,
                "Fuel effect {:.3}s/kg",
                (hi.total_time - lo.total_time) / (hi.fuel_kg - lo.fuel_kg)
            )?;
        }
    }
    Ok(())
}

fn write_warnings(out: &mut String, result: Option<&LapResult>) -> anyhow::Result<()> {
    if let Some(result) = result {
        for warning in result.warnings.iter() {
            writeln!(out, "WARNING: {}", warning)?;
        }
    }
    Ok(())
}

/// Statistics of repeated single lap simulations with different mistake seeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LapStatistics {
    pub no_runs: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub laps_with_mistakes: usize,
}

impl LapStatistics {
    pub fn new(results: &[LapResult]) -> Option<LapStatistics> {
        if results.is_empty() {
            return None;
        }
        let times: Vec<f64> = results.iter().map(|r| r.total_time).collect();

        Some(LapStatistics {
            no_runs: results.len(),
            mean: times.iter().sum::<f64>() / times.len() as f64,
            min: times.iter().copied().fold(f64::INFINITY, f64::min),
            max: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            laps_with_mistakes: results.iter().filter(|r| r.mistakes > 0).count(),
        })
    }

    pub fn print_statistics(&self) {
        println!(
            "RESULT: {} runs, mean {}, min {}, max {}, {} laps with mistakes",
            self.no_runs,
            format_lap_time(self.mean),
            format_lap_time(self.min),
            format_lap_time(self.max),
            self.laps_with_mistakes
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::lap_result::{SectorBests, TimeLossBreakdown};
    use approx::assert_relative_eq;

    fn result(lap_number: u32, sector_times: [f64; 3], mistakes: u32) -> LapResult {
        let mut bests = SectorBests::new();
        bests.record(&sector_times);
        LapResult::new(
            lap_number,
            TireCompoundId::Soft,
            30.0,
            27.2,
            sector_times,
            &bests,
            97.5,
            mistakes,
            TimeLossBreakdown {
                fuel_weight: 1.25,
                mistakes: if mistakes > 0 { 2.0 } else { 0.0 },
                ..Default::default()
            },
            vec![],
        )
    }

    #[test]
    fn statistics_of_runs() {
        let results = vec![
            result(1, [30.0, 40.0, 30.0], 0),
            result(1, [30.0, 44.0, 30.0], 1),
            result(1, [31.0, 40.0, 30.0], 0),
        ];
        let stats = LapStatistics::new(&results).unwrap();
        assert_eq!(stats.no_runs, 3);
        assert_relative_eq!(stats.min, 100.0);
        assert_relative_eq!(stats.max, 104.0);
        assert_relative_eq!(stats.mean, 305.0 / 3.0);
        assert_eq!(stats.laps_with_mistakes, 1);
        assert!(LapStatistics::new(&[]).is_none());
    }

    #[test]
    fn stint_table_lists_every_lap() {
        let report = SessionReport::Stint(vec![
            result(1, [30.0, 40.0, 30.0], 0),
            result(2, [30.5, 40.5, 30.5], 0),
        ]);
        let table = report.to_table(OutputLevel::Normal).unwrap();
        assert!(table.contains("Stint of 2 laps"));
        assert!(table.contains("1:40.000"));
        assert!(table.contains("1:41.500"));
        assert!(!table.contains("Time loss breakdown"));
        assert_eq!(report.labelled_results().len(), 2);
    }

    #[test]
    fn quiet_lap_report_is_the_lap_time_only() {
        let report = SessionReport::Lap(result(1, [30.0, 40.0, 35.5], 0));
        assert_eq!(report.to_table(OutputLevel::Quiet).unwrap(), "1:45.500\n");

        let report = SessionReport::Stint(vec![
            result(1, [30.0, 40.0, 30.0], 0),
            result(2, [30.5, 40.5, 30.5], 0),
        ]);
        assert_eq!(
            report.to_table(OutputLevel::Quiet).unwrap(),
            "lap 1: 1:40.000\nlap 2: 1:41.500\n"
        );
    }

    #[test]
    fn verbose_lap_report_adds_breakdown() {
        let report = SessionReport::Lap(result(3, [30.0, 40.0, 35.5], 1));
        let table = report.to_table(OutputLevel::Verbose).unwrap();
        assert!(table.contains("fuel remaining 27.2kg"));
        assert!(table.contains("Time loss breakdown"));
        // fuel 1.25s and mistakes 2.0s
        assert!(table.contains("  3.250s"));
    }

    #[test]
    fn csv_has_one_row_per_result() {
        let report = SessionReport::FuelStrategy(vec![
            Comparison {
                label: "10.0 kg".to_owned(),
                result: result(1, [30.0, 40.0, 30.0], 0),
            },
            Comparison {
                label: "90.0 kg".to_owned(),
                result: result(1, [31.0, 41.0, 31.0], 0),
            },
        ]);
        let filepath = std::env::temp_dir().join("lapsim_report_test.csv");
        report.write_csv(&filepath).unwrap();

        let mut rdr = csv::Reader::from_path(&filepath).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(&headers[0], "label");
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "90.0 kg");
        assert_eq!(&rows[1][2], "soft");
        let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
        assert_eq!(&rows[0][column("fuel_remaining_kg")], "27.2");
        assert_eq!(&rows[0][column("loss_fuel_weight")], "1.25");
        let _ = std::fs::remove_file(filepath);
    }
}
