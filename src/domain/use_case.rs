use serde::{Deserialize, Serialize};

/// Problem type a metric is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCase {
    ClassificationBinary,
    ClassificationMulticlass,
}

impl std::fmt::Display for UseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UseCase::ClassificationBinary => write!(f, "classification_binary"),
            UseCase::ClassificationMulticlass => write!(f, "classification_multiclass"),
        }
    }
}
