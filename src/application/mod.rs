// Performance calculator orchestration
pub mod calculator;

// Metric strategies and their registry
pub mod metrics;
