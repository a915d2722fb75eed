use std::env;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use log::info;

use hybrid_plant_opt::general::{loading, logging, plot, report};
use hybrid_plant_opt::search::genetic::{GaConfig, run_genetic_search};
use hybrid_plant_opt::{SizingMode, SolveOptions, derive_kpis, solve, solve_with};

const DEFAULT_SCENARIO_FILE: &str = "data/scenario.toml";
const DEFAULT_MARKET_FILE: &str = "data/market.csv";

fn main() -> ExitCode {
    if let Err(e) = logging::init() {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    let args: Vec<String> = env::args().collect();
    let result = match args.get(1).map(|s| s.as_str()) {
        Some("search") => run_search(&args[2..]),
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        _ => run_dispatch(&args[1..]),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    println!("Usage: hybrid-plant-opt [search] [scenario.toml] [market.csv]");
    println!();
    println!("Without a subcommand, sizes and dispatches the plant in one LP.");
    println!("With `search`, runs the genetic sizing search instead.");
}

fn load_inputs(
    args: &[String],
) -> Result<(h2_model::ScenarioParameters, h2_model::MarketSeries)> {
    let scenario_path = args
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_SCENARIO_FILE);
    let market_path = args
        .get(1)
        .map(String::as_str)
        .unwrap_or(DEFAULT_MARKET_FILE);

    let scenario = loading::load_scenario(Path::new(scenario_path))?;
    let series = loading::load_market_series(Path::new(market_path))?;
    info!(
        "loaded {:?} scenario and {} market timesteps",
        scenario.technology,
        series.len()
    );
    Ok((scenario, series))
}

/// Joint sizing and dispatch in a single LP, followed by the report and plot.
fn run_dispatch(args: &[String]) -> Result<()> {
    let (scenario, series) = load_inputs(args)?;

    let solution = solve(&scenario, &series).context("optimization failed")?;
    let kpis = derive_kpis(&scenario, &series, &solution);
    report::print_report(&scenario, &series, &solution, &kpis);

    plot::plot_dispatch(&solution, "dispatch.png")
        .map_err(|e| anyhow::anyhow!("plotting failed: {e}"))?;
    Ok(())
}

/// Genetic search over the battery sizing, then one final dispatch of the
/// winner for the report.
fn run_search(args: &[String]) -> Result<()> {
    let (scenario, series) = load_inputs(args)?;

    let config = GaConfig {
        power_bounds_mw: (0.0, scenario.electrolyser_rated_power_mw),
        energy_bounds_mwh: (0.0, scenario.battery_energy_limit_mwh),
        ..GaConfig::default()
    };
    let outcome =
        run_genetic_search(&scenario, &series, &config).context("sizing search failed")?;
    anyhow::ensure!(
        outcome.is_feasible(),
        "the search found no feasible sizing (best candidate: {:.1} MW / {:.1} MWh)",
        outcome.battery_power_mw,
        outcome.battery_energy_mwh
    );
    info!(
        "best sizing: {:.1} MW / {:.1} MWh after {} evaluations",
        outcome.battery_power_mw, outcome.battery_energy_mwh, outcome.evaluations
    );

    let options = SolveOptions {
        sizing: SizingMode::Fixed {
            power_mw: outcome.battery_power_mw,
            energy_mwh: outcome.battery_energy_mwh,
        },
        time_budget: None,
    };
    let solution = solve_with(&scenario, &series, &options, good_lp::highs)
        .context("final dispatch of the best sizing failed")?;
    let kpis = derive_kpis(&scenario, &series, &solution);
    report::print_report(&scenario, &series, &solution, &kpis);

    plot::plot_dispatch(&solution, "dispatch.png")
        .map_err(|e| anyhow::anyhow!("plotting failed: {e}"))?;
    Ok(())
}
