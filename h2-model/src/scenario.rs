use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::technology::ElectrolyserTechnology;

/// Error raised when a scenario record violates one of its invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("{name} must be within [0, 1], got {value}")]
    FractionOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be strictly positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must be nonnegative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{lower_name} ({lower}) must not exceed {upper_name} ({upper})")]
    UnorderedBounds {
        lower_name: &'static str,
        lower: f64,
        upper_name: &'static str,
        upper: f64,
    },
    #[error("project lifetime must be at least one year")]
    ZeroLifetime,
}

/// Immutable bundle of technical and economic constants for one optimization run.
///
/// One instance fully describes a scenario; nothing about the model lives in
/// process-wide state, so independent solves (e.g. inside the sizing search)
/// can each carry their own copy. All fields deserialize from TOML, with
/// defaults reproducing the reference PEM scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioParameters {
    /// Electrolysis technology (fixes stack CAPEX, ramp limit and yield)
    pub technology: ElectrolyserTechnology,
    /// Sale price of hydrogen (currency/kg)
    pub h2_price_per_kg: f64,
    /// Rated electrolyser power (MW); an input here, not a decision variable
    pub electrolyser_rated_power_mw: f64,
    /// Overall electrolyser efficiency applied to the technology yield
    pub electrolyser_efficiency: f64,
    /// Minimum load fraction of the rated power (turndown limit)
    pub load_fraction_min: f64,
    /// Maximum load fraction of the rated power
    pub load_fraction_max: f64,
    /// Annual hydrogen production target (kg over the horizon)
    pub h2_target_kg: f64,
    /// Battery power CAPEX (currency/MW)
    pub battery_capex_per_mw: f64,
    /// Battery energy CAPEX (currency/MWh)
    pub battery_capex_per_mwh: f64,
    /// Absolute ceiling on the battery energy sizing variable (MWh)
    pub battery_energy_limit_mwh: f64,
    /// Battery charging efficiency
    pub charge_efficiency: f64,
    /// Battery discharging efficiency
    pub discharge_efficiency: f64,
    /// Minimum state of charge as a fraction of the installed energy capacity
    pub soc_fraction_min: f64,
    /// Maximum state of charge as a fraction of the installed energy capacity
    pub soc_fraction_max: f64,
    /// Discount rate used for the CAPEX annuity
    pub discount_rate: f64,
    /// Project lifetime in years used for the CAPEX annuity
    pub project_lifetime_years: u32,
    /// Timestep duration in hours
    pub timestep_hours: f64,
    /// Whether electricity can be sold back to the grid (frees the sign of the
    /// grid exchange variable)
    pub resale_allowed: bool,
    /// Carbon price (currency/kg CO2)
    pub co2_price_per_kg: f64,
    /// Whether the carbon cost term enters the objective
    pub include_co2_cost: bool,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            technology: ElectrolyserTechnology::Pem,
            h2_price_per_kg: 10.0,
            electrolyser_rated_power_mw: 100.0,
            electrolyser_efficiency: 0.7,
            load_fraction_min: 0.0,
            load_fraction_max: 0.95,
            h2_target_kg: 8_000_000.0,
            battery_capex_per_mw: 110_000.0,
            battery_capex_per_mwh: 120_000.0,
            battery_energy_limit_mwh: 300.0,
            charge_efficiency: 0.95,
            discharge_efficiency: 0.9,
            soc_fraction_min: 0.1,
            soc_fraction_max: 0.95,
            discount_rate: 0.04,
            project_lifetime_years: 20,
            timestep_hours: 1.0,
            resale_allowed: false,
            co2_price_per_kg: 0.08,
            include_co2_cost: false,
        }
    }
}

impl ScenarioParameters {
    /// Check every invariant of the record.
    ///
    /// Must be called before the scenario is handed to the model builder; a
    /// scenario that fails here never reaches the solver.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        // NaN slips through ordinary comparisons, so finiteness comes first
        let numeric = [
            ("h2_price_per_kg", self.h2_price_per_kg),
            (
                "electrolyser_rated_power_mw",
                self.electrolyser_rated_power_mw,
            ),
            ("electrolyser_efficiency", self.electrolyser_efficiency),
            ("load_fraction_min", self.load_fraction_min),
            ("load_fraction_max", self.load_fraction_max),
            ("h2_target_kg", self.h2_target_kg),
            ("battery_capex_per_mw", self.battery_capex_per_mw),
            ("battery_capex_per_mwh", self.battery_capex_per_mwh),
            ("battery_energy_limit_mwh", self.battery_energy_limit_mwh),
            ("charge_efficiency", self.charge_efficiency),
            ("discharge_efficiency", self.discharge_efficiency),
            ("soc_fraction_min", self.soc_fraction_min),
            ("soc_fraction_max", self.soc_fraction_max),
            ("discount_rate", self.discount_rate),
            ("timestep_hours", self.timestep_hours),
            ("co2_price_per_kg", self.co2_price_per_kg),
        ];
        for (name, value) in numeric {
            if !value.is_finite() {
                return Err(ScenarioError::NotFinite { name, value });
            }
        }

        let fractions = [
            ("electrolyser_efficiency", self.electrolyser_efficiency),
            ("load_fraction_min", self.load_fraction_min),
            ("load_fraction_max", self.load_fraction_max),
            ("charge_efficiency", self.charge_efficiency),
            ("discharge_efficiency", self.discharge_efficiency),
            ("soc_fraction_min", self.soc_fraction_min),
            ("soc_fraction_max", self.soc_fraction_max),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScenarioError::FractionOutOfRange { name, value });
            }
        }

        if self.load_fraction_min > self.load_fraction_max {
            return Err(ScenarioError::UnorderedBounds {
                lower_name: "load_fraction_min",
                lower: self.load_fraction_min,
                upper_name: "load_fraction_max",
                upper: self.load_fraction_max,
            });
        }
        if self.soc_fraction_min > self.soc_fraction_max {
            return Err(ScenarioError::UnorderedBounds {
                lower_name: "soc_fraction_min",
                lower: self.soc_fraction_min,
                upper_name: "soc_fraction_max",
                upper: self.soc_fraction_max,
            });
        }

        let strictly_positive = [
            ("electrolyser_rated_power_mw", self.electrolyser_rated_power_mw),
            ("timestep_hours", self.timestep_hours),
        ];
        for (name, value) in strictly_positive {
            if value <= 0.0 {
                return Err(ScenarioError::NotPositive { name, value });
            }
        }

        let nonnegative = [
            ("h2_price_per_kg", self.h2_price_per_kg),
            ("h2_target_kg", self.h2_target_kg),
            ("battery_capex_per_mw", self.battery_capex_per_mw),
            ("battery_capex_per_mwh", self.battery_capex_per_mwh),
            ("battery_energy_limit_mwh", self.battery_energy_limit_mwh),
            ("discount_rate", self.discount_rate),
            ("co2_price_per_kg", self.co2_price_per_kg),
        ];
        for (name, value) in nonnegative {
            if value < 0.0 {
                return Err(ScenarioError::Negative { name, value });
            }
        }

        if self.project_lifetime_years == 0 {
            return Err(ScenarioError::ZeroLifetime);
        }

        Ok(())
    }

    /// Maximum electrolyser ramp between consecutive timesteps (MW)
    pub fn ramp_limit_mw(&self) -> f64 {
        self.technology.ramp_limit_mw_per_h() * self.timestep_hours
    }

    /// Hydrogen produced per MW of electrolyser power over one timestep (kg/MW)
    pub fn h2_yield_kg_per_mw_step(&self) -> f64 {
        self.technology.yield_kg_per_mwh() * self.electrolyser_efficiency * self.timestep_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_is_valid() {
        ScenarioParameters::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_efficiency_above_one() {
        let scenario = ScenarioParameters {
            charge_efficiency: 1.2,
            ..Default::default()
        };
        assert_eq!(
            scenario.validate().unwrap_err(),
            ScenarioError::FractionOutOfRange {
                name: "charge_efficiency",
                value: 1.2
            }
        );
    }

    #[test]
    fn test_rejects_nan_rated_power() {
        let scenario = ScenarioParameters {
            electrolyser_rated_power_mw: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            scenario.validate().unwrap_err(),
            ScenarioError::NotFinite {
                name: "electrolyser_rated_power_mw",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_infinite_target() {
        let scenario = ScenarioParameters {
            h2_target_kg: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            scenario.validate().unwrap_err(),
            ScenarioError::NotFinite {
                name: "h2_target_kg",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unordered_soc_bounds() {
        let scenario = ScenarioParameters {
            soc_fraction_min: 0.9,
            soc_fraction_max: 0.2,
            ..Default::default()
        };
        assert!(matches!(
            scenario.validate().unwrap_err(),
            ScenarioError::UnorderedBounds { .. }
        ));
    }

    #[test]
    fn test_rejects_zero_rated_power() {
        let scenario = ScenarioParameters {
            electrolyser_rated_power_mw: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            scenario.validate().unwrap_err(),
            ScenarioError::NotPositive { .. }
        ));
    }

    #[test]
    fn test_rejects_negative_target() {
        let scenario = ScenarioParameters {
            h2_target_kg: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            scenario.validate().unwrap_err(),
            ScenarioError::Negative { .. }
        ));
    }

    #[test]
    fn test_yield_per_step_combines_technology_and_efficiency() {
        let scenario = ScenarioParameters::default();
        // PEM: 18 kg/MWh * 0.7 efficiency * 1 h
        assert_eq!(scenario.h2_yield_kg_per_mw_step(), 18.0 * 0.7);
        assert_eq!(scenario.ramp_limit_mw(), 600.0);
    }
}
