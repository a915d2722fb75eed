//! Objective assembly: annualised battery CAPEX plus energy purchase cost,
//! optionally plus carbon cost.
//!
//! The electrolyser CAPEX annuity is a constant (rated power is an input, not
//! a decision variable), so it stays out of the LP objective and is added back
//! in the KPI layer. The optimum is unchanged.

use good_lp::Expression;
use h2_model::{MarketSeries, ScenarioParameters};

use crate::core::balance::GridVariables;
use crate::core::battery::BatteryVariables;
use crate::general::finance::annuity_factor;

/// Build the scalar minimisation objective.
pub fn build(
    scenario: &ScenarioParameters,
    series: &MarketSeries,
    battery: &BatteryVariables,
    grid: &GridVariables,
) -> Expression {
    let alpha = annuity_factor(scenario.discount_rate, scenario.project_lifetime_years);
    let dt = scenario.timestep_hours;

    let mut objective = Expression::default();

    // Annualised capital cost of the battery sizing decisions
    objective += alpha * scenario.battery_capex_per_mw * battery.power_capacity;
    objective += alpha * scenario.battery_capex_per_mwh * battery.energy_capacity;

    // Energy purchase cost (revenue when exchange is negative under resale)
    for t in 0..series.len() {
        objective += series.spot_price_per_mwh[t] * dt * grid.exchange[t];
        if scenario.include_co2_cost {
            objective += scenario.co2_price_per_kg
                * series.co2_intensity_kg_per_mwh[t]
                * dt
                * grid.exchange[t];
        }
    }

    objective
}

/// Recompute the objective from solved values.
///
/// Keeps the reported cost independent of which solver backend produced the
/// solution and reusable by the KPI layer and the outer search.
pub fn evaluate(
    scenario: &ScenarioParameters,
    series: &MarketSeries,
    battery_power_mw: f64,
    battery_energy_mwh: f64,
    grid_exchange_mw: &[f64],
) -> f64 {
    let alpha = annuity_factor(scenario.discount_rate, scenario.project_lifetime_years);
    let dt = scenario.timestep_hours;

    let capex = alpha
        * (scenario.battery_capex_per_mw * battery_power_mw
            + scenario.battery_capex_per_mwh * battery_energy_mwh);

    let mut operating = 0.0;
    for (t, &exchange) in grid_exchange_mw.iter().enumerate() {
        operating += series.spot_price_per_mwh[t] * exchange * dt;
        if scenario.include_co2_cost {
            operating +=
                scenario.co2_price_per_kg * series.co2_intensity_kg_per_mwh[t] * exchange * dt;
        }
    }

    capex + operating
}
