use crate::application::calculator::config::ColumnBindings;
use crate::application::metrics::binary::{
    BinaryClassificationAccuracy, BinaryClassificationAuroc, BinaryClassificationF1,
    BinaryClassificationPrecision, BinaryClassificationRecall, BinaryClassificationSpecificity,
};
use crate::application::metrics::multiclass::{
    MulticlassClassificationAccuracy, MulticlassClassificationAuroc, MulticlassClassificationF1,
    MulticlassClassificationPrecision, MulticlassClassificationRecall,
    MulticlassClassificationSpecificity,
};
use crate::application::metrics::traits::Metric;
use crate::domain::errors::CalculatorError;
use crate::domain::performance::metric_key::MetricKey;
use crate::domain::use_case::UseCase;
use std::str::FromStr;
use std::sync::Arc;

pub struct MetricFactory;

impl MetricFactory {
    /// Metric registered for `key` and `use_case`, bound to the calculator owning `bindings`.
    pub fn create(
        key: &str,
        use_case: UseCase,
        bindings: &Arc<ColumnBindings>,
    ) -> Result<Box<dyn Metric>, CalculatorError> {
        let metric_key = MetricKey::from_str(key).map_err(|_| CalculatorError::UnknownMetric {
            key: key.to_string(),
            use_case,
        })?;
        Ok(Self::create_for(metric_key, use_case, bindings))
    }

    pub fn create_for(
        key: MetricKey,
        use_case: UseCase,
        bindings: &Arc<ColumnBindings>,
    ) -> Box<dyn Metric> {
        let bindings = Arc::clone(bindings);
        match (use_case, key) {
            (UseCase::ClassificationBinary, MetricKey::RocAuc) => {
                Box::new(BinaryClassificationAuroc::new(bindings))
            }
            (UseCase::ClassificationBinary, MetricKey::F1) => {
                Box::new(BinaryClassificationF1::new(bindings))
            }
            (UseCase::ClassificationBinary, MetricKey::Precision) => {
                Box::new(BinaryClassificationPrecision::new(bindings))
            }
            (UseCase::ClassificationBinary, MetricKey::Recall) => {
                Box::new(BinaryClassificationRecall::new(bindings))
            }
            (UseCase::ClassificationBinary, MetricKey::Specificity) => {
                Box::new(BinaryClassificationSpecificity::new(bindings))
            }
            (UseCase::ClassificationBinary, MetricKey::Accuracy) => {
                Box::new(BinaryClassificationAccuracy::new(bindings))
            }
            (UseCase::ClassificationMulticlass, MetricKey::RocAuc) => {
                Box::new(MulticlassClassificationAuroc::new(bindings))
            }
            (UseCase::ClassificationMulticlass, MetricKey::F1) => {
                Box::new(MulticlassClassificationF1::new(bindings))
            }
            (UseCase::ClassificationMulticlass, MetricKey::Precision) => {
                Box::new(MulticlassClassificationPrecision::new(bindings))
            }
            (UseCase::ClassificationMulticlass, MetricKey::Recall) => {
                Box::new(MulticlassClassificationRecall::new(bindings))
            }
            (UseCase::ClassificationMulticlass, MetricKey::Specificity) => {
                Box::new(MulticlassClassificationSpecificity::new(bindings))
            }
            (UseCase::ClassificationMulticlass, MetricKey::Accuracy) => {
                Box::new(MulticlassClassificationAccuracy::new(bindings))
            }
        }
    }
}
