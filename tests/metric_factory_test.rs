use perfcalc::application::calculator::{CalculatorConfig, PerformanceCalculator, ProbabilityColumns};
use perfcalc::application::metrics::{
    BinaryClassificationAccuracy, BinaryClassificationAuroc, BinaryClassificationF1,
    BinaryClassificationPrecision, BinaryClassificationRecall, BinaryClassificationSpecificity,
    Metric, MetricFactory, MulticlassClassificationAccuracy, MulticlassClassificationAuroc,
    MulticlassClassificationF1, MulticlassClassificationPrecision,
    MulticlassClassificationRecall, MulticlassClassificationSpecificity,
};
use perfcalc::domain::errors::CalculatorError;
use perfcalc::domain::use_case::UseCase;
use std::sync::Arc;

fn calculator() -> PerformanceCalculator {
    let config = CalculatorConfig::new(
        Some("timestamp"),
        ProbabilityColumns::from("y_pred_proba"),
        "y_pred",
        "y_true",
        &["roc_auc", "f1"],
    );
    PerformanceCalculator::new(config).unwrap()
}

fn boxed(metric: impl Metric + 'static) -> Box<dyn Metric> {
    Box::new(metric)
}

#[test]
fn test_factory_returns_the_registered_metric_for_every_pair() {
    let calc = calculator();
    let bindings = calc.bindings();

    let cases: Vec<(&str, UseCase, Box<dyn Metric>)> = vec![
        ("roc_auc", UseCase::ClassificationBinary, boxed(BinaryClassificationAuroc::new(Arc::clone(bindings)))),
        ("f1", UseCase::ClassificationBinary, boxed(BinaryClassificationF1::new(Arc::clone(bindings)))),
        ("precision", UseCase::ClassificationBinary, boxed(BinaryClassificationPrecision::new(Arc::clone(bindings)))),
        ("recall", UseCase::ClassificationBinary, boxed(BinaryClassificationRecall::new(Arc::clone(bindings)))),
        ("specificity", UseCase::ClassificationBinary, boxed(BinaryClassificationSpecificity::new(Arc::clone(bindings)))),
        ("accuracy", UseCase::ClassificationBinary, boxed(BinaryClassificationAccuracy::new(Arc::clone(bindings)))),
        ("roc_auc", UseCase::ClassificationMulticlass, boxed(MulticlassClassificationAuroc::new(Arc::clone(bindings)))),
        ("f1", UseCase::ClassificationMulticlass, boxed(MulticlassClassificationF1::new(Arc::clone(bindings)))),
        ("precision", UseCase::ClassificationMulticlass, boxed(MulticlassClassificationPrecision::new(Arc::clone(bindings)))),
        ("recall", UseCase::ClassificationMulticlass, boxed(MulticlassClassificationRecall::new(Arc::clone(bindings)))),
        ("specificity", UseCase::ClassificationMulticlass, boxed(MulticlassClassificationSpecificity::new(Arc::clone(bindings)))),
        ("accuracy", UseCase::ClassificationMulticlass, boxed(MulticlassClassificationAccuracy::new(Arc::clone(bindings)))),
    ];

    for (key, use_case, expected) in cases {
        let created = MetricFactory::create(key, use_case, bindings).unwrap();
        assert!(
            *created == *expected,
            "factory result for ({key}, {use_case}) differs: {created:?}"
        );
    }
}

#[test]
fn test_metrics_of_another_calculator_are_not_equal() {
    let first = calculator();
    let second = calculator();
    let created = MetricFactory::create("f1", UseCase::ClassificationBinary, first.bindings()).unwrap();
    let foreign = boxed(BinaryClassificationF1::new(Arc::clone(second.bindings())));
    assert!(*created != *foreign);
}

#[test]
fn test_calculator_metrics_share_its_bindings() {
    let calc = calculator();
    assert_eq!(calc.metrics().len(), 2);
    for metric in calc.metrics() {
        assert!(Arc::ptr_eq(metric.bindings(), calc.bindings()));
        assert_eq!(metric.use_case(), UseCase::ClassificationBinary);
    }
}

#[test]
fn test_unknown_metric_key_fails_construction() {
    let config = CalculatorConfig::new(
        None,
        ProbabilityColumns::from("y_pred_proba"),
        "y_pred",
        "y_true",
        &["roc_auc", "log_loss"],
    );
    match PerformanceCalculator::new(config) {
        Err(CalculatorError::UnknownMetric { key, .. }) => assert_eq!(key, "log_loss"),
        other => panic!("expected UnknownMetric, got {:?}", other.map(|_| ())),
    }
}
