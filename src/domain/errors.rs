use crate::domain::use_case::UseCase;
use thiserror::Error;

/// Errors raised while building, fitting or running a performance calculator
#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("Unknown metric '{key}' for use case {use_case}")]
    UnknownMetric { key: String, use_case: UseCase },

    #[error("Calculator has not been fitted: call fit() on reference data before calculate()")]
    NotFitted,

    #[error("Missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Invalid arguments: {reason}")]
    InvalidArguments { reason: String },

    #[error("Invalid data in column '{column}': {reason}")]
    InvalidData { column: String, reason: String },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Errors related to dataset construction, access and joins
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column name: {name}")]
    DuplicateColumn { name: String },

    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("Column '{name}' is not numeric")]
    NotNumeric { name: String },

    #[error("Unparsable timestamp '{value}' in column '{name}'")]
    InvalidTimestamp { name: String, value: String },

    #[error("Join on '{on}' matched no rows ({left_rows} left, {right_rows} right)")]
    JoinKeyMismatch {
        on: String,
        left_rows: usize,
        right_rows: usize,
    },

    #[error("Duplicate join key '{key}' in column '{on}'")]
    DuplicateJoinKey { on: String, key: String },

    #[error("Missing join key in column '{on}' at row {row}")]
    MissingJoinKey { on: String, row: usize },
}
