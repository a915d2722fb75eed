//! The optimization model: variables, constraints, objective, solver driver
//! and KPI post-processing.

pub mod balance;
pub mod battery;
pub mod electrolyser;
pub mod error;
pub mod kpi;
pub mod model;
pub mod objective;
