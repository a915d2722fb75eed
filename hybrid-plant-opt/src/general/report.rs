//! Console report for a solved run.

use h2_model::{MarketSeries, ScenarioParameters};
use indexmap::IndexMap;

use crate::core::model::Solution;

/// Compact number formatting: 9 B, 1 M, 8 k, plain below a thousand.
pub fn fmt_compact(x: f64) -> String {
    let magnitude = x.abs();
    if magnitude >= 1e9 {
        format!("{:.0} B", x / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.0} M", x / 1e6)
    } else if magnitude >= 1e3 {
        format!("{:.0} k", x / 1e3)
    } else if magnitude >= 1e1 {
        format!("{:.0}", x.round())
    } else {
        format!("{x:.2}")
    }
}

/// Print the sectioned run report to stdout.
pub fn print_report(
    scenario: &ScenarioParameters,
    series: &MarketSeries,
    solution: &Solution,
    kpis: &IndexMap<String, f64>,
) {
    let line = |label: &str, value: f64| println!("{label:<42}: {}", fmt_compact(value));

    println!("\n=== INPUT PARAMETERS ===");
    println!("{:<42}: {:?}", "Electrolyser technology", scenario.technology);
    line("Rated electrolyser power (MW)", scenario.electrolyser_rated_power_mw);
    line("Hydrogen price (EUR/kg)", scenario.h2_price_per_kg);
    line("Hydrogen target (kg)", scenario.h2_target_kg);
    line("Battery power CAPEX (EUR/MW)", scenario.battery_capex_per_mw);
    line("Battery energy CAPEX (EUR/MWh)", scenario.battery_capex_per_mwh);
    line("Project lifetime (years)", scenario.project_lifetime_years as f64);
    line("Discount rate (%)", scenario.discount_rate * 100.0);
    line("Horizon (timesteps)", series.len() as f64);

    println!("\n=== OPTIMAL SIZING ===");
    line("Battery power capacity (MW)", solution.battery_power_mw);
    line("Battery energy capacity (MWh)", solution.battery_energy_mwh);

    println!("\n=== ELECTROLYSER PERFORMANCE ===");
    line("Mean electrolyser power (MW)", kpis["mean_electrolyser_power_mw"]);
    line("Load factor (%)", kpis["load_factor"] * 100.0);
    line("Mean electricity cost (EUR/MWh)", kpis["mean_electricity_cost_per_mwh"]);

    println!("\n=== HYDROGEN & CARBON ===");
    line("Hydrogen production (kg)", kpis["total_h2_kg"]);
    line("Carbon intensity (kg CO2/kg H2)", kpis["co2_per_kg_h2"]);
    line("Total CO2 emissions (t)", kpis["total_co2_kg"] / 1000.0);

    println!("\n=== ECONOMICS ===");
    line("Total revenue (EUR)", kpis["total_revenue"]);
    line("Total annual cost (EUR)", kpis["total_annual_cost"]);
    line("Annual benefit (EUR)", kpis["annual_benefit"]);
    line("Levelised cost of hydrogen (EUR/kg)", kpis["lcoh"]);

    println!(
        "\nSolved in {:.2} s",
        solution.solve_duration.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_format_suffixes() {
        assert_eq!(fmt_compact(9_300_000_000.0), "9 B");
        assert_eq!(fmt_compact(1_200_000.0), "1 M");
        assert_eq!(fmt_compact(7_500.0), "8 k");
        assert_eq!(fmt_compact(123.4), "123");
        assert_eq!(fmt_compact(42.6), "43");
        assert_eq!(fmt_compact(9.345), "9.35");
        assert_eq!(fmt_compact(-1_500_000.0), "-2 M");
        assert_eq!(fmt_compact(0.0), "0.00");
    }
}
