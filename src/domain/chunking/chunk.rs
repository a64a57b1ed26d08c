use crate::domain::dataset::Dataset;
use chrono::NaiveDateTime;

/// A contiguous (or period-grouped) slice of rows that metrics are evaluated on.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub key: String,
    pub data: Dataset,
    /// Index of the first row in the source dataset.
    pub start_index: usize,
    /// Index of the last row in the source dataset (inclusive).
    pub end_index: usize,
    pub start_datetime: Option<NaiveDateTime>,
    pub end_datetime: Option<NaiveDateTime>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Index-range key, e.g. `[0:5999]`.
    pub fn index_key(start_index: usize, end_index: usize) -> String {
        format!("[{}:{}]", start_index, end_index)
    }
}
