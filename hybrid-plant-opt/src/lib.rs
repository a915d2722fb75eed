pub mod core;
pub mod general;
pub mod search;

// Re-export commonly used items for convenience
pub use self::core::error::SolveError;
pub use self::core::kpi::derive_kpis;
pub use self::core::model::{SizingMode, Solution, SolveOptions, solve, solve_with};
pub use self::search::genetic::run_genetic_search;
