pub mod genetic;

pub use genetic::{GaConfig, SearchOutcome, run_genetic_search, sizing_cost};
