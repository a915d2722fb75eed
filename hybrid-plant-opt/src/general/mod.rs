pub mod finance;
pub mod loading;
pub mod logging;
pub mod plot;
pub mod report;

pub use finance::annuity_factor;
pub use loading::{load_market_series, load_scenario};
