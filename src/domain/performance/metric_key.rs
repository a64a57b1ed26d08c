use serde::{Deserialize, Serialize};

/// Identifier of a realized performance metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    RocAuc,
    F1,
    Precision,
    Recall,
    Specificity,
    Accuracy,
}

impl MetricKey {
    pub const ALL: [MetricKey; 6] = [
        MetricKey::RocAuc,
        MetricKey::F1,
        MetricKey::Precision,
        MetricKey::Recall,
        MetricKey::Specificity,
        MetricKey::Accuracy,
    ];

    /// Column name used in result tables and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::RocAuc => "roc_auc",
            MetricKey::F1 => "f1",
            MetricKey::Precision => "precision",
            MetricKey::Recall => "recall",
            MetricKey::Specificity => "specificity",
            MetricKey::Accuracy => "accuracy",
        }
    }
}

impl std::str::FromStr for MetricKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "roc_auc" => Ok(MetricKey::RocAuc),
            "f1" => Ok(MetricKey::F1),
            "precision" => Ok(MetricKey::Precision),
            "recall" => Ok(MetricKey::Recall),
            "specificity" => Ok(MetricKey::Specificity),
            "accuracy" => Ok(MetricKey::Accuracy),
            _ => anyhow::bail!(
                "Invalid metric: {}. Valid: roc_auc, f1, precision, recall, specificity, accuracy",
                s
            ),
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
