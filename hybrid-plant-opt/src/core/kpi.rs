//! KPI derivation from a solved dispatch.
//!
//! Pure post-processing: everything here is computed from the scenario, the
//! market series and the returned [`Solution`], never from solver internals.
//! The electrolyser CAPEX annuity, deliberately left out of the LP objective,
//! is added back here so the reported total annual cost covers both assets.
//!
//! Emissions are accounted gross: only imported energy adds to
//! `total_co2_kg` and `co2_cost`. The LP objective prices the signed
//! exchange instead, so under resale with carbon costing enabled an export
//! earns a carbon credit there that is not mirrored in the reported
//! emission figures.

use h2_model::{MarketSeries, ScenarioParameters};
use indexmap::IndexMap;

use crate::core::model::Solution;
use crate::general::finance::annuity_factor;

/// Derive the full KPI table for a solved run.
///
/// Keys are stable and insertion-ordered, so the report prints them in the
/// same order every time. Ratios with a zero denominator are reported as 0.0
/// rather than NaN.
pub fn derive_kpis(
    scenario: &ScenarioParameters,
    series: &MarketSeries,
    solution: &Solution,
) -> IndexMap<String, f64> {
    let dt = scenario.timestep_hours;
    let steps = solution.dispatch.len();
    let alpha = annuity_factor(scenario.discount_rate, scenario.project_lifetime_years);

    let electrolyser_energy_mwh: f64 = solution
        .dispatch
        .iter()
        .map(|s| s.electrolyser_power_mw * dt)
        .sum();
    let mean_electrolyser_power_mw = if steps > 0 {
        solution
            .dispatch
            .iter()
            .map(|s| s.electrolyser_power_mw)
            .sum::<f64>()
            / steps as f64
    } else {
        0.0
    };
    let load_factor = ratio_or_zero(
        mean_electrolyser_power_mw,
        scenario.electrolyser_rated_power_mw,
    );

    let total_h2_kg: f64 = solution.dispatch.iter().map(|s| s.h2_kg).sum();

    let mut grid_energy_mwh = 0.0;
    let mut energy_cost = 0.0;
    let mut export_revenue = 0.0;
    let mut total_co2_kg = 0.0;
    for (t, step) in solution.dispatch.iter().enumerate() {
        let exchange_mwh = step.grid_power_mw * dt;
        grid_energy_mwh += exchange_mwh;
        let cash = series.spot_price_per_mwh[t] * exchange_mwh;
        if cash >= 0.0 {
            energy_cost += cash;
        } else {
            export_revenue -= cash;
        }
        if exchange_mwh > 0.0 {
            total_co2_kg += series.co2_intensity_kg_per_mwh[t] * exchange_mwh;
        }
    }

    let battery_capex_annuity = alpha
        * (scenario.battery_capex_per_mw * solution.battery_power_mw
            + scenario.battery_capex_per_mwh * solution.battery_energy_mwh);
    let electrolyser_capex_annuity = alpha
        * scenario.technology.capex_per_mw()
        * scenario.electrolyser_rated_power_mw;

    let co2_cost = if scenario.include_co2_cost {
        scenario.co2_price_per_kg * total_co2_kg
    } else {
        0.0
    };

    let h2_revenue = scenario.h2_price_per_kg * total_h2_kg;
    let total_annual_cost = solution.objective_value + electrolyser_capex_annuity;
    let total_revenue = h2_revenue + export_revenue;
    // Export revenue already offsets the objective through negative exchange
    // terms, so the benefit only adds the hydrogen side.
    let annual_benefit = h2_revenue - total_annual_cost;

    let mut kpis = IndexMap::new();
    kpis.insert("mean_electrolyser_power_mw".into(), mean_electrolyser_power_mw);
    kpis.insert("electrolyser_energy_mwh".into(), electrolyser_energy_mwh);
    kpis.insert("load_factor".into(), load_factor);
    kpis.insert("total_h2_kg".into(), total_h2_kg);
    kpis.insert("total_co2_kg".into(), total_co2_kg);
    kpis.insert(
        "co2_per_kg_h2".into(),
        ratio_or_zero(total_co2_kg, total_h2_kg),
    );
    kpis.insert("grid_energy_mwh".into(), grid_energy_mwh);
    kpis.insert(
        "mean_electricity_cost_per_mwh".into(),
        ratio_or_zero(energy_cost - export_revenue, grid_energy_mwh),
    );
    kpis.insert("battery_power_mw".into(), solution.battery_power_mw);
    kpis.insert("battery_energy_mwh".into(), solution.battery_energy_mwh);
    kpis.insert("battery_capex_annuity".into(), battery_capex_annuity);
    kpis.insert(
        "electrolyser_capex_annuity".into(),
        electrolyser_capex_annuity,
    );
    kpis.insert("energy_cost".into(), energy_cost);
    kpis.insert("export_revenue".into(), export_revenue);
    kpis.insert("co2_cost".into(), co2_cost);
    kpis.insert("h2_revenue".into(), h2_revenue);
    kpis.insert("total_revenue".into(), total_revenue);
    kpis.insert("total_annual_cost".into(), total_annual_cost);
    kpis.insert("annual_benefit".into(), annual_benefit);
    kpis.insert("lcoh".into(), ratio_or_zero(total_annual_cost, total_h2_kg));
    kpis
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use float_cmp::approx_eq;

    use super::*;
    use crate::core::model::DispatchStep;

    fn constant_dispatch(power_mw: f64, steps: usize, yield_kg_per_mw: f64) -> Vec<DispatchStep> {
        (0..steps)
            .map(|_| DispatchStep {
                grid_power_mw: power_mw,
                charge_power_mw: 0.0,
                discharge_power_mw: 0.0,
                electrolyser_power_mw: power_mw,
                soc_mwh: 0.0,
                h2_kg: power_mw * yield_kg_per_mw,
            })
            .collect()
    }

    #[test]
    fn test_kpis_for_constant_dispatch() {
        let scenario = ScenarioParameters::default();
        let series = MarketSeries::flat(50.0, 100.0, 24).unwrap();
        let yield_per_mw = scenario.h2_yield_kg_per_mw_step();
        let solution = Solution {
            battery_power_mw: 0.0,
            battery_energy_mwh: 0.0,
            dispatch: constant_dispatch(40.0, 24, yield_per_mw),
            objective_value: 50.0 * 40.0 * 24.0,
            solve_duration: Duration::ZERO,
        };

        let kpis = derive_kpis(&scenario, &series, &solution);

        assert!(approx_eq!(
            f64,
            kpis["mean_electrolyser_power_mw"],
            40.0,
            epsilon = 1e-9
        ));
        assert!(approx_eq!(f64, kpis["load_factor"], 0.4, epsilon = 1e-9));
        assert!(approx_eq!(
            f64,
            kpis["total_h2_kg"],
            40.0 * 24.0 * yield_per_mw,
            epsilon = 1e-6
        ));
        assert!(approx_eq!(
            f64,
            kpis["total_co2_kg"],
            100.0 * 40.0 * 24.0,
            epsilon = 1e-6
        ));
        assert!(approx_eq!(
            f64,
            kpis["energy_cost"],
            48_000.0,
            epsilon = 1e-6
        ));
        assert!(approx_eq!(
            f64,
            kpis["mean_electricity_cost_per_mwh"],
            50.0,
            epsilon = 1e-9
        ));
        assert_eq!(kpis["battery_capex_annuity"], 0.0);
        assert_eq!(kpis["export_revenue"], 0.0);

        // PEM stack annuity: 0.0736 * 1.4 M€/MW * 100 MW
        let alpha = annuity_factor(0.04, 20);
        assert!(approx_eq!(
            f64,
            kpis["electrolyser_capex_annuity"],
            alpha * 1_400_000.0 * 100.0,
            epsilon = 1e-3
        ));
        assert!(approx_eq!(
            f64,
            kpis["total_annual_cost"],
            solution.objective_value + alpha * 1_400_000.0 * 100.0,
            epsilon = 1e-3
        ));
        assert!(approx_eq!(
            f64,
            kpis["lcoh"],
            kpis["total_annual_cost"] / kpis["total_h2_kg"],
            epsilon = 1e-9
        ));
    }

    #[test]
    fn test_export_hours_split_into_revenue() {
        let scenario = ScenarioParameters {
            resale_allowed: true,
            include_co2_cost: true,
            ..Default::default()
        };
        let series = MarketSeries::flat(50.0, 100.0, 2).unwrap();
        let yield_per_mw = scenario.h2_yield_kg_per_mw_step();
        let mut dispatch = constant_dispatch(20.0, 2, yield_per_mw);
        // Second hour exports 10 MW net
        dispatch[1].grid_power_mw = -10.0;
        dispatch[1].discharge_power_mw = 30.0;
        let solution = Solution {
            battery_power_mw: 30.0,
            battery_energy_mwh: 60.0,
            dispatch,
            objective_value: 500.0,
            solve_duration: Duration::ZERO,
        };

        let kpis = derive_kpis(&scenario, &series, &solution);
        assert!(approx_eq!(f64, kpis["energy_cost"], 1_000.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, kpis["export_revenue"], 500.0, epsilon = 1e-9));
        // Imported energy only counts toward emissions; the export hour never
        // reduces the reported figures
        assert!(approx_eq!(f64, kpis["total_co2_kg"], 2_000.0, epsilon = 1e-9));
        assert!(approx_eq!(
            f64,
            kpis["co2_cost"],
            0.08 * 2_000.0,
            epsilon = 1e-9
        ));
    }

    #[test]
    fn test_zero_production_reports_zero_ratios() {
        let scenario = ScenarioParameters::default();
        let series = MarketSeries::flat(50.0, 100.0, 4).unwrap();
        let solution = Solution {
            battery_power_mw: 0.0,
            battery_energy_mwh: 0.0,
            dispatch: constant_dispatch(0.0, 4, 0.0),
            objective_value: 0.0,
            solve_duration: Duration::ZERO,
        };

        let kpis = derive_kpis(&scenario, &series, &solution);
        assert_eq!(kpis["lcoh"], 0.0);
        assert_eq!(kpis["co2_per_kg_h2"], 0.0);
        assert_eq!(kpis["mean_electricity_cost_per_mwh"], 0.0);
    }
}
