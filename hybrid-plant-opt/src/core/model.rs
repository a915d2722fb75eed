//! Model builder and solver driver.
//!
//! One call builds one complete, self-contained LP instance: every variable is
//! declared exactly once, the constraint set is emitted subsystem by
//! subsystem, the external solver runs once, and the optimal values are read
//! out into an owned [`Solution`]. Nothing survives between calls, so
//! independent calls (e.g. from the sizing search) cannot interfere with each
//! other.

use std::time::{Duration, Instant};

use good_lp::{ProblemVariables, ResolutionError, Solution as LpSolution, Solver, SolverModel};
use h2_model::{MarketSeries, ScenarioParameters};
use log::debug;

use crate::core::balance;
use crate::core::battery;
use crate::core::electrolyser;
use crate::core::error::{InfeasibilityDiagnosis, SolveError};
use crate::core::objective;

/// Whether the battery sizing is part of the optimization or pinned to a
/// candidate from an outer search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SizingMode {
    /// Power and energy capacity are decision variables
    #[default]
    Optimise,
    /// Power and energy capacity are fixed; only the dispatch is optimised
    Fixed { power_mw: f64, energy_mwh: f64 },
}

/// Per-call solver options.
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    pub sizing: SizingMode,
    /// Wall-clock budget for the solver call. A solve that comes back after
    /// the budget is discarded rather than trusted.
    pub time_budget: Option<Duration>,
}

/// One timestep of the optimal dispatch trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchStep {
    /// Grid exchange (MW, positive = import)
    pub grid_power_mw: f64,
    /// Battery charging power (MW)
    pub charge_power_mw: f64,
    /// Battery discharging power (MW)
    pub discharge_power_mw: f64,
    /// Electrolyser power draw (MW)
    pub electrolyser_power_mw: f64,
    /// Battery state of charge (MWh)
    pub soc_mwh: f64,
    /// Hydrogen produced (kg)
    pub h2_kg: f64,
}

/// The optimal solution of one call: sizing, dispatch and objective value.
///
/// Owned solely by the caller; the model instance that produced it is gone by
/// the time this is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Optimal (or pinned) battery power capacity (MW)
    pub battery_power_mw: f64,
    /// Optimal (or pinned) battery energy capacity (MWh)
    pub battery_energy_mwh: f64,
    /// Optimal dispatch, one record per timestep
    pub dispatch: Vec<DispatchStep>,
    /// Achieved objective value: battery CAPEX annuity + energy cost
    /// (+ carbon cost when enabled)
    pub objective_value: f64,
    /// Time spent inside the solver
    pub solve_duration: Duration,
}

/// Size and dispatch the plant with the default solver (HiGHS).
pub fn solve(
    scenario: &ScenarioParameters,
    series: &MarketSeries,
) -> Result<Solution, SolveError> {
    solve_with(scenario, series, &SolveOptions::default(), good_lp::highs)
}

/// Size and dispatch the plant with an explicit solver and options.
pub fn solve_with<S: Solver>(
    scenario: &ScenarioParameters,
    series: &MarketSeries,
    options: &SolveOptions,
    solver: S,
) -> Result<Solution, SolveError>
where
    S::Model: SolverModel<Error = ResolutionError>,
{
    // Fail fast: nothing is built from inputs that violate their invariants
    scenario
        .validate()
        .map_err(|e| SolveError::Configuration(e.to_string()))?;
    if series.spot_price_per_mwh.len() != series.co2_intensity_kg_per_mwh.len() {
        return Err(SolveError::Configuration(format!(
            "price series has {} entries but carbon intensity has {}",
            series.spot_price_per_mwh.len(),
            series.co2_intensity_kg_per_mwh.len()
        )));
    }
    if series.is_empty() {
        return Err(SolveError::Configuration(
            "market series must contain at least one timestep".into(),
        ));
    }
    if let SizingMode::Fixed {
        power_mw,
        energy_mwh,
    } = options.sizing
    {
        if power_mw < 0.0 || energy_mwh < 0.0 {
            return Err(SolveError::Configuration(format!(
                "fixed battery sizing must be nonnegative, got {power_mw} MW / {energy_mwh} MWh"
            )));
        }
    }

    let steps = series.len();
    debug!("building model over {steps} timesteps ({:?})", options.sizing);

    // Declare each variable exactly once for this instance
    let mut vars = ProblemVariables::new();
    let battery_vars = battery::add_variables(&mut vars, steps);
    let electrolyser_vars = electrolyser::add_variables(&mut vars, steps);
    let grid_vars = balance::add_variables(&mut vars, steps, scenario.resale_allowed);

    let objective = objective::build(scenario, series, &battery_vars, &grid_vars);
    let mut model = vars.minimise(objective).using(solver);

    model = battery::add_constraints(model, scenario, &battery_vars, &options.sizing);
    model = electrolyser::add_constraints(model, scenario, &electrolyser_vars);
    model = balance::add_constraints(model, &grid_vars, &electrolyser_vars, &battery_vars);

    let started = Instant::now();
    let outcome = model.solve();
    let solve_duration = started.elapsed();

    let lp_solution = match outcome {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            return Err(SolveError::Infeasible {
                diagnosis: diagnose_infeasibility(scenario, steps),
            });
        }
        Err(other) => return Err(SolveError::Solver(format!("{other:?}"))),
    };

    // A solve past its budget is a failure, never a partial result
    if let Some(budget) = options.time_budget {
        if solve_duration > budget {
            return Err(SolveError::TimeBudgetExceeded {
                budget_secs: budget.as_secs_f64(),
                elapsed_secs: solve_duration.as_secs_f64(),
            });
        }
    }

    let battery_power_mw = lp_solution.value(battery_vars.power_capacity);
    let battery_energy_mwh = lp_solution.value(battery_vars.energy_capacity);

    let mut dispatch = Vec::with_capacity(steps);
    for t in 0..steps {
        dispatch.push(DispatchStep {
            grid_power_mw: lp_solution.value(grid_vars.exchange[t]),
            charge_power_mw: lp_solution.value(battery_vars.charge[t]),
            discharge_power_mw: lp_solution.value(battery_vars.discharge[t]),
            electrolyser_power_mw: lp_solution.value(electrolyser_vars.power[t]),
            soc_mwh: lp_solution.value(battery_vars.soc[t]),
            h2_kg: lp_solution.value(electrolyser_vars.h2[t]),
        });
    }

    let grid_exchange: Vec<f64> = dispatch.iter().map(|step| step.grid_power_mw).collect();
    let objective_value = objective::evaluate(
        scenario,
        series,
        battery_power_mw,
        battery_energy_mwh,
        &grid_exchange,
    );

    Ok(Solution {
        battery_power_mw,
        battery_energy_mwh,
        dispatch,
        objective_value,
        solve_duration,
    })
}

/// Heuristic reconstruction of the constraint class that likely caused an
/// infeasible outcome.
fn diagnose_infeasibility(
    scenario: &ScenarioParameters,
    steps: usize,
) -> InfeasibilityDiagnosis {
    let achievable_max_kg = electrolyser::max_producible_kg(scenario, steps);
    if scenario.h2_target_kg > achievable_max_kg {
        InfeasibilityDiagnosis::TargetExceedsCapacity {
            target_kg: scenario.h2_target_kg,
            achievable_max_kg,
        }
    } else {
        InfeasibilityDiagnosis::RampOrSizingLimits {
            target_kg: scenario.h2_target_kg,
        }
    }
}
