//! Electrolyser subsystem: variables and constraints.

use good_lp::{Expression, ProblemVariables, SolverModel, Variable, constraint, variable};
use h2_model::ScenarioParameters;

/// Handles to the electrolyser decision variables of one model instance
pub struct ElectrolyserVariables {
    /// Electrolyser power draw at each timestep (MW)
    pub power: Vec<Variable>,
    /// Hydrogen produced at each timestep (kg)
    pub h2: Vec<Variable>,
}

/// Declare the electrolyser variables, exactly once per model instance.
pub fn add_variables(vars: &mut ProblemVariables, steps: usize) -> ElectrolyserVariables {
    let mut power = Vec::with_capacity(steps);
    let mut h2 = Vec::with_capacity(steps);
    for _t in 0..steps {
        power.push(vars.add(variable().min(0.0)));
        h2.push(vars.add(variable().min(0.0)));
    }
    ElectrolyserVariables { power, h2 }
}

/// Emit the electrolyser constraint set onto the model.
pub fn add_constraints<M>(
    mut model: M,
    scenario: &ScenarioParameters,
    electrolyser: &ElectrolyserVariables,
) -> M
where
    M: SolverModel,
{
    let steps = electrolyser.power.len();
    let rated = scenario.electrolyser_rated_power_mw;
    let ramp = scenario.ramp_limit_mw();
    // kg of H2 per MW of electrolyser power over one timestep
    let yield_per_mw = scenario.h2_yield_kg_per_mw_step();

    for t in 0..steps {
        // Operating envelope: minimum turndown and maximum load fraction of
        // the fixed rated power
        model = model.with(constraint!(
            electrolyser.power[t] >= scenario.load_fraction_min * rated
        ));
        model = model.with(constraint!(
            electrolyser.power[t] <= scenario.load_fraction_max * rated
        ));

        // Ramp limit in both directions; the first timestep has no prior value
        if t > 0 {
            model = model.with(constraint!(
                electrolyser.power[t] - electrolyser.power[t - 1] <= ramp
            ));
            model = model.with(constraint!(
                electrolyser.power[t - 1] - electrolyser.power[t] <= ramp
            ));
        }

        // Hydrogen yield: power-time converted to mass
        model = model.with(constraint!(
            electrolyser.h2[t] - yield_per_mw * electrolyser.power[t] == 0.0
        ));
    }

    // Annual production target, a single global row over the whole horizon
    let total_h2: Expression = electrolyser.h2.iter().map(|&v| Expression::from(v)).sum();
    model = model.with(constraint!(total_h2 >= scenario.h2_target_kg));

    model
}

/// Theoretical maximum hydrogen output (kg) at full allowed load over the
/// horizon. Used for infeasibility diagnosis.
pub fn max_producible_kg(scenario: &ScenarioParameters, steps: usize) -> f64 {
    scenario.load_fraction_max
        * scenario.electrolyser_rated_power_mw
        * scenario.h2_yield_kg_per_mw_step()
        * steps as f64
}
