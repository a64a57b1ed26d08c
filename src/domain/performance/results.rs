use super::metric_key::MetricKey;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Which dataset a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataPeriod {
    Reference,
    Analysis,
}

impl std::fmt::Display for DataPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataPeriod::Reference => write!(f, "reference"),
            DataPeriod::Analysis => write!(f, "analysis"),
        }
    }
}

/// One metric evaluated on one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricValue {
    pub value: f64,
    pub lower_threshold: Option<f64>,
    pub upper_threshold: Option<f64>,
    pub alert: bool,
}

/// One row of a result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkRecord {
    pub key: String,
    pub start_index: usize,
    pub end_index: usize,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub period: DataPeriod,
    /// Aligned with [`ResultTable::metrics`].
    pub metrics: Vec<MetricValue>,
}

/// Per-chunk metric values, one row per chunk in chunking order.
///
/// Metric columns keep the order the metrics were requested in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    metrics: Vec<MetricKey>,
    rows: Vec<ChunkRecord>,
}

pub const CHUNK_COLUMNS: [&str; 6] = [
    "key",
    "start_index",
    "end_index",
    "start_date",
    "end_date",
    "period",
];

impl ResultTable {
    pub fn new(metrics: Vec<MetricKey>) -> Self {
        Self {
            metrics,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, record: ChunkRecord) {
        debug_assert_eq!(record.metrics.len(), self.metrics.len());
        self.rows.push(record);
    }

    pub fn metrics(&self) -> &[MetricKey] {
        &self.metrics
    }

    pub fn rows(&self) -> &[ChunkRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn metric_position(&self, key: MetricKey) -> Option<usize> {
        self.metrics.iter().position(|&m| m == key)
    }

    /// Metric values per chunk, or `None` if the metric was not requested.
    pub fn metric_values(&self, key: MetricKey) -> Option<Vec<f64>> {
        let idx = self.metric_position(key)?;
        Some(self.rows.iter().map(|r| r.metrics[idx].value).collect())
    }

    pub fn alerts(&self, key: MetricKey) -> Option<Vec<bool>> {
        let idx = self.metric_position(key)?;
        Some(self.rows.iter().map(|r| r.metrics[idx].alert).collect())
    }

    /// Flat column names: chunk metadata, then four columns per metric in request order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = CHUNK_COLUMNS.iter().map(|c| c.to_string()).collect();
        for metric in &self.metrics {
            names.push(metric.to_string());
            names.push(format!("{metric}_lower_threshold"));
            names.push(format!("{metric}_upper_threshold"));
            names.push(format!("{metric}_alert"));
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, values: &[f64]) -> ChunkRecord {
        ChunkRecord {
            key: key.to_string(),
            start_index: 0,
            end_index: 9,
            start_date: None,
            end_date: None,
            period: DataPeriod::Analysis,
            metrics: values
                .iter()
                .map(|&value| MetricValue {
                    value,
                    lower_threshold: Some(0.5),
                    upper_threshold: None,
                    alert: value < 0.5,
                })
                .collect(),
        }
    }

    #[test]
    fn test_column_order_follows_metric_order() {
        let table = ResultTable::new(vec![MetricKey::Accuracy, MetricKey::RocAuc]);
        let names = table.column_names();
        assert_eq!(names[6], "accuracy");
        assert_eq!(names[7], "accuracy_lower_threshold");
        assert_eq!(names[10], "roc_auc");
        assert_eq!(names.len(), 6 + 2 * 4);
    }

    #[test]
    fn test_metric_values_and_alerts() {
        let mut table = ResultTable::new(vec![MetricKey::F1, MetricKey::Recall]);
        table.push(record("[0:9]", &[0.8, 0.4]));
        table.push(record("[10:19]", &[0.6, 0.7]));

        assert_eq!(table.metric_values(MetricKey::F1), Some(vec![0.8, 0.6]));
        assert_eq!(table.alerts(MetricKey::Recall), Some(vec![true, false]));
        assert_eq!(table.metric_values(MetricKey::Accuracy), None);
        assert_eq!(table.len(), 2);
    }
}
