pub mod market;
pub mod scenario;
pub mod technology;

// Re-export commonly used items for convenience
pub use market::MarketSeries;
pub use scenario::ScenarioParameters;
pub use technology::ElectrolyserTechnology;
