use crate::domain::errors::DatasetError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// A single typed column. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders a cell the way labels and join keys are compared.
    /// Integral floats drop their fractional part, so `1.0` becomes `"1"`.
    pub fn cell_string(&self, row: usize) -> Option<String> {
        match self {
            Column::Numeric(values) => values.get(row).copied().flatten().map(|v| v.to_string()),
            Column::Text(values) => values.get(row).cloned().flatten(),
        }
    }

    fn slice(&self, start: usize, end: usize) -> Column {
        match self {
            Column::Numeric(values) => Column::Numeric(values[start..end].to_vec()),
            Column::Text(values) => Column::Text(values[start..end].to_vec()),
        }
    }

    /// Numeric NaN cells become missing.
    fn with_nan_as_missing(self) -> Column {
        match self {
            Column::Numeric(values) => Column::Numeric(
                values
                    .into_iter()
                    .map(|v| v.filter(|v| !v.is_nan()))
                    .collect(),
            ),
            text => text,
        }
    }

    fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(values) => Column::Numeric(indices.iter().map(|&i| values[i]).collect()),
            Column::Text(values) => {
                Column::Text(indices.iter().map(|&i| values[i].clone()).collect())
            }
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Numeric(
            values
                .into_iter()
                .map(|v| if v.is_nan() { None } else { Some(v) })
                .collect(),
        )
    }
}

impl From<Vec<Option<f64>>> for Column {
    fn from(values: Vec<Option<f64>>) -> Self {
        Column::Numeric(values).with_nan_as_missing()
    }
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Column::Text(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<Vec<Option<&str>>> for Column {
    fn from(values: Vec<Option<&str>>) -> Self {
        Column::Text(values.into_iter().map(|v| v.map(str::to_string)).collect())
    }
}

impl From<Vec<String>> for Column {
    fn from(values: Vec<String>) -> Self {
        Column::Text(values.into_iter().map(Some).collect())
    }
}

/// Column-oriented table of model inputs, outputs and targets.
///
/// Rows keep their arrival order; every column has the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn new<S: Into<String>>(columns: Vec<(S, Column)>) -> Result<Self, DatasetError> {
        let mut dataset = Dataset::default();
        for (name, column) in columns {
            dataset.push_column(name, column)?;
        }
        Ok(dataset)
    }

    /// Appends a column, checking length and name uniqueness.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), DatasetError> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(DatasetError::DuplicateColumn { name });
        }
        if self.columns.is_empty() {
            self.rows = column.len();
        } else if column.len() != self.rows {
            return Err(DatasetError::LengthMismatch {
                name,
                expected: self.rows,
                actual: column.len(),
            });
        }
        self.names.push(name);
        self.columns.push(column.with_nan_as_missing());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column, DatasetError> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
            .ok_or_else(|| DatasetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Names from `required` that are not present, in the order given.
    pub fn missing_columns<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        required
            .into_iter()
            .filter(|name| !self.has_column(name))
            .map(str::to_string)
            .collect()
    }

    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>], DatasetError> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values),
            Column::Text(_) => Err(DatasetError::NotNumeric {
                name: name.to_string(),
            }),
        }
    }

    pub fn labels(&self, name: &str) -> Result<Vec<Option<String>>, DatasetError> {
        let column = self.column(name)?;
        Ok((0..self.rows).map(|row| column.cell_string(row)).collect())
    }

    /// Parses the column as timestamps. Numeric columns are read as unix seconds.
    pub fn timestamps(&self, name: &str) -> Result<Vec<Option<NaiveDateTime>>, DatasetError> {
        match self.column(name)? {
            Column::Numeric(values) => values
                .iter()
                .map(|v| match v {
                    None => Ok(None),
                    Some(secs) => DateTime::from_timestamp(secs.trunc() as i64, 0)
                        .map(|dt| Some(dt.naive_utc()))
                        .ok_or_else(|| DatasetError::InvalidTimestamp {
                            name: name.to_string(),
                            value: secs.to_string(),
                        }),
                })
                .collect(),
            Column::Text(values) => values
                .iter()
                .map(|v| match v {
                    None => Ok(None),
                    Some(raw) => parse_timestamp(raw).map(Some).ok_or_else(|| {
                        DatasetError::InvalidTimestamp {
                            name: name.to_string(),
                            value: raw.clone(),
                        }
                    }),
                })
                .collect(),
        }
    }

    /// Rows `[start, end)` as a new dataset.
    pub fn slice(&self, start: usize, end: usize) -> Dataset {
        let end = end.min(self.rows);
        let start = start.min(end);
        Dataset {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.slice(start, end)).collect(),
            rows: end - start,
        }
    }

    pub fn take(&self, indices: &[usize]) -> Dataset {
        Dataset {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            rows: indices.len(),
        }
    }

    /// Inner join on `on`, keeping the row order of `self`.
    ///
    /// Keys in `other` must be unique. Non-key columns present on both sides
    /// get `_x` (left) and `_y` (right) suffixes.
    pub fn merge(&self, other: &Dataset, on: &str) -> Result<Dataset, DatasetError> {
        let left_keys = self.column(on)?;
        let right_keys = other.column(on)?;

        let mut right_index: HashMap<String, usize> = HashMap::with_capacity(other.len());
        for row in 0..other.len() {
            let key = right_keys
                .cell_string(row)
                .ok_or_else(|| DatasetError::MissingJoinKey {
                    on: on.to_string(),
                    row,
                })?;
            if right_index.insert(key.clone(), row).is_some() {
                return Err(DatasetError::DuplicateJoinKey {
                    on: on.to_string(),
                    key,
                });
            }
        }

        let mut left_rows = Vec::new();
        let mut right_rows = Vec::new();
        for row in 0..self.len() {
            let key = left_keys
                .cell_string(row)
                .ok_or_else(|| DatasetError::MissingJoinKey {
                    on: on.to_string(),
                    row,
                })?;
            if let Some(&matched) = right_index.get(&key) {
                left_rows.push(row);
                right_rows.push(matched);
            }
        }

        if left_rows.is_empty() && !self.is_empty() && !other.is_empty() {
            return Err(DatasetError::JoinKeyMismatch {
                on: on.to_string(),
                left_rows: self.len(),
                right_rows: other.len(),
            });
        }

        let mut merged = Dataset::default();
        for (name, column) in self.names.iter().zip(&self.columns) {
            let name = if name != on && other.has_column(name) {
                format!("{name}_x")
            } else {
                name.clone()
            };
            merged.push_column(name, column.take(&left_rows))?;
        }
        for (name, column) in other.names.iter().zip(&other.columns) {
            if name == on {
                continue;
            }
            let name = if self.has_column(name) {
                format!("{name}_y")
            } else {
                name.clone()
            };
            merged.push_column(name, column.take(&right_rows))?;
        }
        Ok(merged)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
