//! Binary classification metrics. The positive class is label `1`.

use super::traits::classification_metric;
use crate::application::calculator::config::{ColumnBindings, ProbabilityColumns};
use crate::domain::dataset::Dataset;
use crate::domain::errors::CalculatorError;
use crate::domain::performance::metric_key::MetricKey;
use crate::domain::performance::stats::{ConfusionCounts, Stats};
use crate::domain::use_case::UseCase;
use tracing::warn;

classification_metric!(
    BinaryClassificationAuroc,
    MetricKey::RocAuc,
    UseCase::ClassificationBinary,
    fit = validate_reference,
    calculate = roc_auc
);

classification_metric!(
    BinaryClassificationF1,
    MetricKey::F1,
    UseCase::ClassificationBinary,
    fit = validate_reference,
    calculate = f1
);

classification_metric!(
    BinaryClassificationPrecision,
    MetricKey::Precision,
    UseCase::ClassificationBinary,
    fit = validate_reference,
    calculate = precision
);

classification_metric!(
    BinaryClassificationRecall,
    MetricKey::Recall,
    UseCase::ClassificationBinary,
    fit = validate_reference,
    calculate = recall
);

classification_metric!(
    BinaryClassificationSpecificity,
    MetricKey::Specificity,
    UseCase::ClassificationBinary,
    fit = validate_reference,
    calculate = specificity
);

classification_metric!(
    BinaryClassificationAccuracy,
    MetricKey::Accuracy,
    UseCase::ClassificationBinary,
    fit = validate_reference,
    calculate = accuracy
);

fn probability_column(bindings: &ColumnBindings) -> Result<&str, CalculatorError> {
    match &bindings.y_pred_proba {
        ProbabilityColumns::Single(column) => Ok(column.as_str()),
        ProbabilityColumns::PerClass(_) => Err(CalculatorError::InvalidArguments {
            reason: "binary metrics need a single y_pred_proba column".to_string(),
        }),
    }
}

/// Reads a 0/1 label column as booleans.
fn binary_labels(data: &Dataset, column: &str) -> Result<Vec<Option<bool>>, CalculatorError> {
    data.labels(column)?
        .into_iter()
        .map(|label| match label.as_deref() {
            None => Ok(None),
            Some("1") => Ok(Some(true)),
            Some("0") => Ok(Some(false)),
            Some(other) => Err(CalculatorError::InvalidData {
                column: column.to_string(),
                reason: format!("expected binary labels 0/1, found '{}'", other),
            }),
        })
        .collect()
}

fn validate_reference(bindings: &ColumnBindings, reference: &Dataset) -> Result<(), CalculatorError> {
    probability_column(bindings)?;
    binary_labels(reference, &bindings.y_true)?;
    binary_labels(reference, &bindings.y_pred)?;
    Ok(())
}

/// Confusion counts over rows where both labels are present, or `None` when none remain.
fn confusion(bindings: &ColumnBindings, data: &Dataset) -> Result<Option<ConfusionCounts>, CalculatorError> {
    let (y_true, y_pred): (Vec<bool>, Vec<bool>) = binary_labels(data, &bindings.y_true)?
        .into_iter()
        .zip(binary_labels(data, &bindings.y_pred)?)
        .filter_map(|(t, p)| Some((t?, p?)))
        .unzip();
    if y_true.is_empty() {
        return Ok(None);
    }
    Ok(Some(ConfusionCounts::from_binary(&y_true, &y_pred)))
}

fn roc_auc(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    let y_true = binary_labels(data, &bindings.y_true)?;
    let y_pred_proba = data.numeric(probability_column(bindings)?)?;
    let (scores, positives): (Vec<f64>, Vec<bool>) = y_pred_proba
        .iter()
        .zip(y_true)
        .filter_map(|(p, t)| Some(((*p)?, t?)))
        .unzip();

    match Stats::roc_auc(&scores, &positives) {
        Some(auc) => Ok(auc),
        None => {
            warn!(
                "Too few unique values in '{}', returning NaN as realized ROC AUC",
                bindings.y_true
            );
            Ok(f64::NAN)
        }
    }
}

fn f1(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    Ok(confusion(bindings, data)?.map_or(f64::NAN, |c| c.f1()))
}

fn precision(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    Ok(confusion(bindings, data)?.map_or(f64::NAN, |c| c.precision()))
}

fn recall(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    Ok(confusion(bindings, data)?.map_or(f64::NAN, |c| c.recall()))
}

fn specificity(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    Ok(confusion(bindings, data)?
        .and_then(|c| c.specificity())
        .unwrap_or(f64::NAN))
}

fn accuracy(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    Ok(confusion(bindings, data)?
        .and_then(|c| c.accuracy())
        .unwrap_or(f64::NAN))
}
