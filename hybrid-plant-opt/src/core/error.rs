use std::fmt;

use thiserror::Error;

/// Failure modes of a single optimization call.
///
/// Configuration problems are caught before any variable is created;
/// infeasibility and solver failures are distinct outcomes and are never
/// conflated. On any error the dispatch variables are undefined and are not
/// read.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Malformed or inconsistent inputs, rejected before model construction
    #[error("invalid scenario or market data: {0}")]
    Configuration(String),
    /// The solver proved there is no feasible dispatch
    #[error("no feasible dispatch: {diagnosis}")]
    Infeasible { diagnosis: InfeasibilityDiagnosis },
    /// The solver crashed, was interrupted or returned a non-optimal status
    #[error("solver failure: {0}")]
    Solver(String),
    /// The solve finished but blew through the configured wall-clock budget
    #[error("time budget of {budget_secs:.1}s exceeded (solve took {elapsed_secs:.1}s)")]
    TimeBudgetExceeded { budget_secs: f64, elapsed_secs: f64 },
}

/// Suspected binding constraint class when the model is infeasible.
///
/// The LP itself does not say which constraint killed feasibility, so this is
/// a heuristic reconstruction from the scenario bounds, meant to point the
/// user at the right knob.
#[derive(Debug, Clone, PartialEq)]
pub enum InfeasibilityDiagnosis {
    /// The hydrogen target exceeds what the electrolyser can produce at full
    /// load over the whole horizon
    TargetExceedsCapacity {
        target_kg: f64,
        achievable_max_kg: f64,
    },
    /// The target is within theoretical capacity; the ramp limit or the
    /// battery sizing caps are the likely culprits
    RampOrSizingLimits { target_kg: f64 },
}

impl fmt::Display for InfeasibilityDiagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetExceedsCapacity {
                target_kg,
                achievable_max_kg,
            } => write!(
                f,
                "hydrogen target of {target_kg:.0} kg exceeds the theoretical maximum of \
                 {achievable_max_kg:.0} kg at full load over the horizon (suspect the target)"
            ),
            Self::RampOrSizingLimits { target_kg } => write!(
                f,
                "hydrogen target of {target_kg:.0} kg is within theoretical capacity \
                 (suspect the ramp limit or the battery sizing caps)"
            ),
        }
    }
}
