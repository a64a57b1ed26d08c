use perfcalc::application::calculator::{CalculatorConfig, PerformanceCalculator, ProbabilityColumns};
use perfcalc::domain::chunking::{Chunker, Incomplete, PeriodOffset};
use perfcalc::domain::dataset::{Column, Dataset};
use perfcalc::domain::errors::CalculatorError;
use perfcalc::domain::performance::metric_key::MetricKey;
use perfcalc::domain::performance::results::DataPeriod;

const CLASSES: [&str; 3] = ["highstreet_card", "prepaid_card", "upmarket_card"];

/// Hourly rows from 2021-01-01. Labels cycle through the classes; every
/// `miss_every`-th row is predicted as the next class.
fn card_data(rows: usize, miss_every: usize) -> Dataset {
    let mut identifier = Vec::new();
    let mut timestamp = Vec::new();
    let mut proba: [Vec<f64>; 3] = Default::default();
    let mut y_pred = Vec::new();
    let mut y_true = Vec::new();

    for i in 0..rows {
        let truth = i % 3;
        let predicted = if i % miss_every == 0 { (truth + 1) % 3 } else { truth };
        let jitter = (i % 7) as f64 * 0.01;
        for (class, column) in proba.iter_mut().enumerate() {
            let p = if class == predicted {
                0.6 - jitter
            } else if class == truth {
                0.3 + jitter
            } else {
                0.1
            };
            column.push(p);
        }
        identifier.push(i as f64);
        timestamp.push(format!("2021-01-{:02} {:02}:00:00", 1 + i / 24, i % 24));
        y_pred.push(CLASSES[predicted]);
        y_true.push(CLASSES[truth]);
    }

    let [p_high, p_prepaid, p_up] = proba;
    Dataset::new(vec![
        ("identifier", Column::from(identifier)),
        ("timestamp", Column::from(timestamp)),
        ("y_pred_proba_highstreet_card", Column::from(p_high)),
        ("y_pred_proba_prepaid_card", Column::from(p_prepaid)),
        ("y_pred_proba_upmarket_card", Column::from(p_up)),
        ("y_pred", Column::from(y_pred)),
        ("y_true", Column::from(y_true)),
    ])
    .unwrap()
}

fn config(metrics: &[&str]) -> CalculatorConfig {
    CalculatorConfig::new(
        Some("timestamp"),
        ProbabilityColumns::per_class(
            CLASSES.iter().map(|c| (*c, format!("y_pred_proba_{c}"))),
        ),
        "y_pred",
        "y_true",
        metrics,
    )
    .with_chunker(Chunker::Size {
        chunk_size: 12,
        incomplete: Incomplete::Keep,
    })
}

fn fitted(metrics: &[&str]) -> PerformanceCalculator {
    let mut calc = PerformanceCalculator::new(config(metrics)).unwrap();
    calc.fit(&card_data(48, 5)).unwrap();
    calc
}

#[test]
fn test_calculate_before_fit_fails() {
    let calc = PerformanceCalculator::new(config(&["accuracy"])).unwrap();
    assert!(!calc.is_fitted());
    assert!(matches!(
        calc.calculate(&card_data(12, 5)),
        Err(CalculatorError::NotFitted)
    ));
}

#[test]
fn test_calculate_is_idempotent() {
    let calc = fitted(&["roc_auc", "f1", "precision", "recall", "specificity", "accuracy"]);
    let analysis = card_data(36, 4);
    let first = calc.calculate(&analysis).unwrap();
    let second = calc.calculate(&analysis).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.data.len(), 3);
    assert!(first.data.rows().iter().all(|r| r.period == DataPeriod::Analysis));
}

#[test]
fn test_result_columns_follow_requested_metric_order() {
    let calc = fitted(&["accuracy", "roc_auc", "f1"]);
    let results = calc.calculate(&card_data(24, 5)).unwrap();
    let names = results.data.column_names();
    let metric_columns: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|n| ["accuracy", "roc_auc", "f1"].contains(n))
        .collect();
    assert_eq!(metric_columns, vec!["accuracy", "roc_auc", "f1"]);
    assert_eq!(
        results.data.metrics(),
        &[MetricKey::Accuracy, MetricKey::RocAuc, MetricKey::F1]
    );
}

#[test]
fn test_chunk_metadata() {
    let calc = fitted(&["accuracy"]);
    let results = calc.calculate(&card_data(30, 5)).unwrap();
    let rows = results.data.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].key, "[0:11]");
    assert_eq!((rows[2].start_index, rows[2].end_index), (24, 29));
    let start = rows[0].start_date.unwrap();
    assert_eq!(start.format("%Y-%m-%d %H:%M").to_string(), "2021-01-01 00:00");
}

#[test]
fn test_accuracy_per_chunk() {
    // one miss every 4 rows: 3 of 12 wrong in each chunk
    let calc = fitted(&["accuracy"]);
    let results = calc.calculate(&card_data(24, 4)).unwrap();
    assert_eq!(results.data.metric_values(MetricKey::Accuracy), Some(vec![0.75, 0.75]));
}

#[test]
fn test_targets_joined_on_identifier() {
    let calc = fitted(&["accuracy", "f1"]);
    let full = card_data(24, 4);

    let identifier = full.column("identifier").unwrap().clone();
    let targets = Dataset::new(vec![
        ("identifier", identifier.clone()),
        ("y_true", full.column("y_true").unwrap().clone()),
    ])
    .unwrap();
    let features = Dataset::new(
        full.column_names()
            .iter()
            .filter(|name| name.as_str() != "y_true")
            .map(|name| (name.clone(), full.column(name).unwrap().clone()))
            .collect(),
    )
    .unwrap();

    assert!(matches!(
        calc.calculate(&features),
        Err(CalculatorError::MissingColumns { ref columns }) if columns == &["y_true"]
    ));

    let joined = features.merge(&targets, "identifier").unwrap();
    assert_eq!(calc.calculate(&joined).unwrap(), calc.calculate(&full).unwrap());
}

#[test]
fn test_period_chunking_by_day() {
    let config = config(&["accuracy"]).with_chunker(Chunker::Period {
        offset: PeriodOffset::Day,
    });
    let mut calc = PerformanceCalculator::new(config).unwrap();
    calc.fit(&card_data(72, 5)).unwrap();
    let results = calc.calculate(&card_data(48, 4)).unwrap();
    let keys: Vec<&str> = results.data.rows().iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["2021-01-01", "2021-01-02"]);
}

#[test]
fn test_reference_results_are_kept_after_fit() {
    let calc = fitted(&["accuracy"]);
    let reference = calc.reference_results().unwrap();
    assert_eq!(reference.len(), 4);
    assert!(reference.rows().iter().all(|r| r.period == DataPeriod::Reference));
    let thresholds = calc.thresholds().unwrap();
    assert_eq!(thresholds[0].0, MetricKey::Accuracy);
}
