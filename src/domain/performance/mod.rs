// Realized performance domain
pub mod metric_key;
pub mod results;
pub mod stats;
pub mod thresholds;
