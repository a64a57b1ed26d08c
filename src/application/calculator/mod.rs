pub mod config;
mod performance_calculator;

pub use config::{CalculatorConfig, ColumnBindings, ProbabilityColumns};
pub use performance_calculator::{PerformanceCalculator, PerformanceResults};
