// Evaluation chunking
pub mod chunking;

// Tabular data
pub mod dataset;

// Domain-specific error types
pub mod errors;

// Realized performance domain
pub mod performance;

// Problem types
pub mod use_case;
