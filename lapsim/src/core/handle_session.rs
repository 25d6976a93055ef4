use crate::core::constants::SimConstants;
use crate::core::errors::SimError;
use crate::core::lap_simulator::Scenario;
use crate::core::mistakes::MistakeSource;
use crate::core::strategy::StrategyAnalyzer;
use crate::post::report::{Analysis, SessionReport};
use crate::pre::read_sim_pars::RefData;
use tracing::info;

/// handle_session creates a strategy analyzer on the basis of the inserted scenario, runs the
/// requested analysis and returns the report for post-processing. All inputs are validated
/// before the first lap is simulated.
pub fn handle_session(
    ref_data: &RefData,
    sim_consts: &SimConstants,
    scenario: &Scenario,
    analysis: &Analysis,
    mistakes: &mut dyn MistakeSource,
) -> Result<SessionReport, SimError> {
    let analyzer = StrategyAnalyzer::new(ref_data, sim_consts, scenario)?;
    let circuit = analyzer.simulator().circuit();
    info!(
        "Simulating {} ({}), {:.3}km, {} corners",
        circuit.name,
        circuit.country,
        circuit.length_km,
        circuit.total_corners()
    );

    let report = match analysis {
        Analysis::Lap(lap_number) => SessionReport::Lap(analyzer.single_lap(*lap_number, mistakes)?),
        Analysis::CompareTires => SessionReport::TireComparison(analyzer.compare_tires(mistakes)?),
        Analysis::FuelStrategy(fuel_loads) => {
            SessionReport::FuelStrategy(analyzer.fuel_sweep(fuel_loads, mistakes)?)
        }
        Analysis::Stint { no_laps, burn_fuel } => {
            SessionReport::Stint(analyzer.stint(*no_laps, *burn_fuel, mistakes)?)
        }
        Analysis::Suggestions => {
            let suggestion = analyzer.suggest_setup()?;
            let suggested = Scenario {
                setup: suggestion.apply(analyzer.simulator().setup()),
                ..scenario.to_owned()
            };
            let lap = StrategyAnalyzer::new(ref_data, sim_consts, &suggested)?.single_lap(1, mistakes)?;
            SessionReport::Suggestion { suggestion, lap }
        }
    };
    Ok(report)
}
