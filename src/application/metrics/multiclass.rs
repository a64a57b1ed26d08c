//! Multiclass classification metrics.
//!
//! Label-based metrics use the sorted class labels of the probability mapping
//! and average per-class (one-vs-rest) values with equal weight.

use super::traits::classification_metric;
use crate::application::calculator::config::{ColumnBindings, ProbabilityColumns};
use crate::domain::dataset::Dataset;
use crate::domain::errors::CalculatorError;
use crate::domain::performance::metric_key::MetricKey;
use crate::domain::performance::stats::{ConfusionCounts, Stats};
use crate::domain::use_case::UseCase;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

classification_metric!(
    /// One-vs-rest ROC AUC, macro-averaged over classes.
    MulticlassClassificationAuroc,
    MetricKey::RocAuc,
    UseCase::ClassificationMulticlass,
    fit = validate_reference,
    calculate = roc_auc
);

classification_metric!(
    MulticlassClassificationF1,
    MetricKey::F1,
    UseCase::ClassificationMulticlass,
    fit = validate_reference,
    calculate = f1
);

classification_metric!(
    MulticlassClassificationPrecision,
    MetricKey::Precision,
    UseCase::ClassificationMulticlass,
    fit = validate_reference,
    calculate = precision
);

classification_metric!(
    MulticlassClassificationRecall,
    MetricKey::Recall,
    UseCase::ClassificationMulticlass,
    fit = validate_reference,
    calculate = recall
);

classification_metric!(
    MulticlassClassificationSpecificity,
    MetricKey::Specificity,
    UseCase::ClassificationMulticlass,
    fit = validate_reference,
    calculate = specificity
);

classification_metric!(
    MulticlassClassificationAccuracy,
    MetricKey::Accuracy,
    UseCase::ClassificationMulticlass,
    fit = validate_reference,
    calculate = accuracy
);

fn class_columns(bindings: &ColumnBindings) -> Result<&BTreeMap<String, String>, CalculatorError> {
    match &bindings.y_pred_proba {
        ProbabilityColumns::PerClass(mapping) => Ok(mapping),
        ProbabilityColumns::Single(column) => Err(CalculatorError::InvalidArguments {
            reason: format!(
                "multiclass metrics need a class-to-column mapping for y_pred_proba, got single column '{}'",
                column
            ),
        }),
    }
}

/// Every true label in the reference data must be a known class.
fn validate_reference(bindings: &ColumnBindings, reference: &Dataset) -> Result<(), CalculatorError> {
    let classes = class_columns(bindings)?;
    let unknown: HashSet<String> = reference
        .labels(&bindings.y_true)?
        .into_iter()
        .flatten()
        .filter(|label| !classes.contains_key(label))
        .collect();
    if !unknown.is_empty() {
        let mut unknown: Vec<String> = unknown.into_iter().collect();
        unknown.sort();
        return Err(CalculatorError::InvalidData {
            column: bindings.y_true.clone(),
            reason: format!(
                "labels {:?} have no entry in the y_pred_proba mapping",
                unknown
            ),
        });
    }
    Ok(())
}

/// True and predicted labels for rows where both are present.
fn label_pairs(
    bindings: &ColumnBindings,
    data: &Dataset,
) -> Result<(Vec<String>, Vec<String>), CalculatorError> {
    let y_true = data.labels(&bindings.y_true)?;
    let y_pred = data.labels(&bindings.y_pred)?;
    Ok(y_true
        .into_iter()
        .zip(y_pred)
        .filter_map(|(t, p)| Some((t?, p?)))
        .unzip())
}

/// Per-class confusion counts in sorted class order, or `None` when no rows remain.
fn per_class_counts(
    bindings: &ColumnBindings,
    data: &Dataset,
) -> Result<Option<Vec<ConfusionCounts>>, CalculatorError> {
    let classes = class_columns(bindings)?;
    let (y_true, y_pred) = label_pairs(bindings, data)?;
    if y_true.is_empty() {
        return Ok(None);
    }
    let y_true: Vec<&str> = y_true.iter().map(String::as_str).collect();
    let y_pred: Vec<&str> = y_pred.iter().map(String::as_str).collect();
    Ok(Some(
        classes
            .keys()
            .map(|class| ConfusionCounts::for_class(&y_true, &y_pred, class))
            .collect(),
    ))
}

fn macro_average(
    bindings: &ColumnBindings,
    data: &Dataset,
    per_class: impl Fn(&ConfusionCounts) -> f64,
) -> Result<f64, CalculatorError> {
    let Some(counts) = per_class_counts(bindings, data)? else {
        return Ok(f64::NAN);
    };
    Ok(counts.iter().map(per_class).sum::<f64>() / counts.len() as f64)
}

fn roc_auc(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    let classes = class_columns(bindings)?;
    let y_true = data.labels(&bindings.y_true)?;
    let probabilities = classes
        .values()
        .map(|column| data.numeric(column))
        .collect::<Result<Vec<_>, _>>()?;

    let rows: Vec<usize> = (0..data.len())
        .filter(|&row| y_true[row].is_some() && probabilities.iter().all(|p| p[row].is_some()))
        .collect();

    let distinct: HashSet<&str> = rows
        .iter()
        .filter_map(|&row| y_true[row].as_deref())
        .collect();
    if distinct.len() <= 1 {
        warn!(
            "Too few unique values in '{}' ({}), returning NaN as realized ROC AUC",
            bindings.y_true,
            distinct.len()
        );
        return Ok(f64::NAN);
    }

    let mut total = 0.0;
    for (class, column) in classes.keys().zip(&probabilities) {
        let scores: Vec<f64> = rows.iter().filter_map(|&row| column[row]).collect();
        let positives: Vec<bool> = rows
            .iter()
            .map(|&row| y_true[row].as_deref() == Some(class.as_str()))
            .collect();
        match Stats::roc_auc(&scores, &positives) {
            Some(auc) => total += auc,
            None => {
                warn!(
                    "Class '{}' has no positive or no negative rows, returning NaN as realized ROC AUC",
                    class
                );
                return Ok(f64::NAN);
            }
        }
    }
    Ok(total / classes.len() as f64)
}

fn f1(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    macro_average(bindings, data, ConfusionCounts::f1)
}

fn precision(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    macro_average(bindings, data, ConfusionCounts::precision)
}

fn recall(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    macro_average(bindings, data, ConfusionCounts::recall)
}

fn specificity(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    macro_average(bindings, data, |counts| {
        counts.specificity().unwrap_or(f64::NAN)
    })
}

fn accuracy(bindings: &ColumnBindings, data: &Dataset) -> Result<f64, CalculatorError> {
    let (y_true, y_pred) = label_pairs(bindings, data)?;
    let correct = y_true.iter().zip(&y_pred).filter(|(t, p)| t == p).count();
    Ok(Stats::ratio(correct, y_true.len()).unwrap_or(f64::NAN))
}
