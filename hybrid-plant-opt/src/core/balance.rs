//! Power balance coupling: grid exchange variable and the per-timestep
//! conservation equation.

use good_lp::{ProblemVariables, SolverModel, Variable, constraint, variable};

use crate::core::battery::BatteryVariables;
use crate::core::electrolyser::ElectrolyserVariables;

/// Handle to the grid exchange variables of one model instance
pub struct GridVariables {
    /// Power exchanged with the grid at each timestep (MW).
    /// Positive means import; negative values are only reachable when resale
    /// is enabled.
    pub exchange: Vec<Variable>,
}

/// Declare the grid exchange variables.
///
/// The resale flag decides the variable domain: import-only scenarios get a
/// nonnegative variable, resale scenarios a free one.
pub fn add_variables(vars: &mut ProblemVariables, steps: usize, resale_allowed: bool) -> GridVariables {
    let mut exchange = Vec::with_capacity(steps);
    for _t in 0..steps {
        let definition = if resale_allowed {
            variable()
        } else {
            variable().min(0.0)
        };
        exchange.push(vars.add(definition));
    }
    GridVariables { exchange }
}

/// Emit the conservation law: grid exchange equals electrolyser draw plus net
/// battery charging, one equality per timestep.
pub fn add_constraints<M>(
    mut model: M,
    grid: &GridVariables,
    electrolyser: &ElectrolyserVariables,
    battery: &BatteryVariables,
) -> M
where
    M: SolverModel,
{
    for t in 0..grid.exchange.len() {
        model = model.with(constraint!(
            grid.exchange[t] - electrolyser.power[t] - battery.charge[t] + battery.discharge[t]
                == 0.0
        ));
    }
    model
}
