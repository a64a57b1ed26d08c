use crate::domain::chunking::Chunker;
use crate::domain::use_case::UseCase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Predicted-probability column(s).
///
/// A single column means binary classification; a class-label to column map
/// means multiclass. Classes are always visited in sorted label order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbabilityColumns {
    Single(String),
    PerClass(BTreeMap<String, String>),
}

impl ProbabilityColumns {
    pub fn per_class<K, V>(mapping: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        ProbabilityColumns::PerClass(
            mapping
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn use_case(&self) -> UseCase {
        match self {
            ProbabilityColumns::Single(_) => UseCase::ClassificationBinary,
            ProbabilityColumns::PerClass(_) => UseCase::ClassificationMulticlass,
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        match self {
            ProbabilityColumns::Single(column) => vec![column.as_str()],
            ProbabilityColumns::PerClass(mapping) => mapping.values().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for ProbabilityColumns {
    fn from(column: &str) -> Self {
        ProbabilityColumns::Single(column.to_string())
    }
}

/// Column names a calculator and its metrics read from.
///
/// Shared by the calculator and every metric it owns through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBindings {
    pub timestamp: Option<String>,
    pub y_pred_proba: ProbabilityColumns,
    pub y_pred: String,
    pub y_true: String,
}

impl ColumnBindings {
    /// Every column `fit` and `calculate` require.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut columns = Vec::new();
        if let Some(timestamp) = &self.timestamp {
            columns.push(timestamp.as_str());
        }
        columns.extend(self.y_pred_proba.column_names());
        columns.push(self.y_pred.as_str());
        columns.push(self.y_true.as_str());
        columns
    }
}

/// Construction parameters of a `PerformanceCalculator`.
///
/// Deserializable so it can be loaded from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub timestamp_column_name: Option<String>,
    pub y_pred_proba: ProbabilityColumns,
    pub y_pred: String,
    pub y_true: String,
    /// Metric keys, in the order result columns should appear.
    pub metrics: Vec<String>,
    #[serde(default)]
    pub chunker: Chunker,
}

impl CalculatorConfig {
    pub fn new(
        timestamp_column_name: Option<&str>,
        y_pred_proba: ProbabilityColumns,
        y_pred: &str,
        y_true: &str,
        metrics: &[&str],
    ) -> Self {
        Self {
            timestamp_column_name: timestamp_column_name.map(str::to_string),
            y_pred_proba,
            y_pred: y_pred.to_string(),
            y_true: y_true.to_string(),
            metrics: metrics.iter().map(|m| m.to_string()).collect(),
            chunker: Chunker::default(),
        }
    }

    pub fn with_chunker(mut self, chunker: Chunker) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn bindings(&self) -> ColumnBindings {
        ColumnBindings {
            timestamp: self.timestamp_column_name.clone(),
            y_pred_proba: self.y_pred_proba.clone(),
            y_pred: self.y_pred.clone(),
            y_true: self.y_true.clone(),
        }
    }
}
