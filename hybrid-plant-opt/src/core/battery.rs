//! Battery energy storage subsystem: variables and constraints.
//!
//! Charging and discharging are two separate nonnegative variables rather than
//! one signed variable. The LP relaxation therefore admits simultaneous
//! nonzero charge and discharge; the round-trip efficiency loss makes that
//! wasteful, so the optimum almost never exercises it, but it is not
//! forbidden. Eliminating it would need a binary switch per timestep and turn
//! the problem into a MILP.

use good_lp::{ProblemVariables, SolverModel, Variable, constraint, variable};
use h2_model::ScenarioParameters;

use crate::core::model::SizingMode;

/// Handles to every battery decision variable of one model instance
pub struct BatteryVariables {
    /// Charging power drawn from the bus at each timestep (MW)
    pub charge: Vec<Variable>,
    /// Discharging power injected into the bus at each timestep (MW)
    pub discharge: Vec<Variable>,
    /// Stored energy at each timestep (MWh)
    pub soc: Vec<Variable>,
    /// Installed power capacity (MW), a sizing decision
    pub power_capacity: Variable,
    /// Installed energy capacity (MWh), a sizing decision
    pub energy_capacity: Variable,
}

/// Declare the battery variables, exactly once per model instance.
pub fn add_variables(vars: &mut ProblemVariables, steps: usize) -> BatteryVariables {
    let power_capacity = vars.add(variable().min(0.0));
    let energy_capacity = vars.add(variable().min(0.0));

    let mut charge = Vec::with_capacity(steps);
    let mut discharge = Vec::with_capacity(steps);
    let mut soc = Vec::with_capacity(steps);
    for _t in 0..steps {
        charge.push(vars.add(variable().min(0.0)));
        discharge.push(vars.add(variable().min(0.0)));
        soc.push(vars.add(variable().min(0.0)));
    }

    BatteryVariables {
        charge,
        discharge,
        soc,
        power_capacity,
        energy_capacity,
    }
}

/// Emit the battery constraint set onto the model.
pub fn add_constraints<M>(
    mut model: M,
    scenario: &ScenarioParameters,
    battery: &BatteryVariables,
    sizing: &SizingMode,
) -> M
where
    M: SolverModel,
{
    let steps = battery.soc.len();
    let dt = scenario.timestep_hours;
    let eta_charge = scenario.charge_efficiency;
    let eta_discharge_inv = 1.0 / scenario.discharge_efficiency;

    // SOC recursion; no SOC is defined beyond the horizon, so the last index
    // emits nothing
    for t in 0..steps.saturating_sub(1) {
        model = model.with(constraint!(
            battery.soc[t + 1]
                - battery.soc[t]
                - eta_charge * dt * battery.charge[t]
                + eta_discharge_inv * dt * battery.discharge[t]
                == 0.0
        ));
    }

    // Cyclic boundary: the battery must end the horizon where it started
    model = model.with(constraint!(battery.soc[0] - battery.soc[steps - 1] == 0.0));

    for t in 0..steps {
        // SOC bounds, coupled to the energy sizing variable
        model = model.with(constraint!(
            battery.soc[t] - scenario.soc_fraction_min * battery.energy_capacity >= 0.0
        ));
        model = model.with(constraint!(
            scenario.soc_fraction_max * battery.energy_capacity - battery.soc[t] >= 0.0
        ));

        // Power limits, coupled to the power sizing variable
        model = model.with(constraint!(
            battery.power_capacity - battery.charge[t] >= 0.0
        ));
        model = model.with(constraint!(
            battery.power_capacity - battery.discharge[t] >= 0.0
        ));
    }

    // Sizing caps bound the search space; without them the energy cost term
    // alone would have to contain the capital variables
    match sizing {
        SizingMode::Optimise => {
            model = model.with(constraint!(
                battery.power_capacity <= scenario.electrolyser_rated_power_mw
            ));
            model = model.with(constraint!(
                battery.energy_capacity <= scenario.battery_energy_limit_mwh
            ));
        }
        SizingMode::Fixed {
            power_mw,
            energy_mwh,
        } => {
            model = model.with(constraint!(battery.power_capacity == *power_mw));
            model = model.with(constraint!(battery.energy_capacity == *energy_mwh));
        }
    }

    model
}
