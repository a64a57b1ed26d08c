use super::config::{CalculatorConfig, ColumnBindings, ProbabilityColumns};
use crate::application::metrics::{Metric, MetricFactory};
use crate::domain::chunking::{Chunk, Chunker};
use crate::domain::dataset::Dataset;
use crate::domain::errors::CalculatorError;
use crate::domain::performance::metric_key::MetricKey;
use crate::domain::performance::results::{ChunkRecord, DataPeriod, MetricValue, ResultTable};
use crate::domain::performance::thresholds::{DEFAULT_STD_MULTIPLIER, Thresholds};
use crate::domain::use_case::UseCase;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Output of [`PerformanceCalculator::calculate`].
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceResults {
    pub data: ResultTable,
    pub use_case: UseCase,
}

/// State established by `fit`.
#[derive(Debug, Clone)]
struct FittedState {
    thresholds: Vec<Thresholds>,
    reference_results: ResultTable,
}

/// Computes realized classification performance per chunk.
///
/// Construct once, `fit` on reference data, then `calculate` on any number
/// of analysis datasets that carry targets.
#[derive(Debug)]
pub struct PerformanceCalculator {
    bindings: Arc<ColumnBindings>,
    use_case: UseCase,
    metrics: Vec<Box<dyn Metric>>,
    chunker: Chunker,
    fitted: Option<FittedState>,
}

impl PerformanceCalculator {
    pub fn new(config: CalculatorConfig) -> Result<Self, CalculatorError> {
        validate_config(&config)?;

        let bindings = Arc::new(config.bindings());
        let use_case = config.y_pred_proba.use_case();
        let metrics = config
            .metrics
            .iter()
            .map(|key| MetricFactory::create(key, use_case, &bindings))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = metrics.iter().find(|m| !seen.insert(m.key())) {
            return Err(CalculatorError::InvalidArguments {
                reason: format!("metric '{}' requested more than once", duplicate.key()),
            });
        }

        debug!(
            "Created {} performance calculator with metrics [{}]",
            use_case,
            config.metrics.join(", ")
        );

        Ok(Self {
            bindings,
            use_case,
            metrics,
            chunker: config.chunker,
            fitted: None,
        })
    }

    /// Column bindings shared with every metric this calculator owns.
    pub fn bindings(&self) -> &Arc<ColumnBindings> {
        &self.bindings
    }

    pub fn use_case(&self) -> UseCase {
        self.use_case
    }

    pub fn metrics(&self) -> &[Box<dyn Metric>] {
        &self.metrics
    }

    pub fn metric_keys(&self) -> Vec<MetricKey> {
        self.metrics.iter().map(|m| m.key()).collect()
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Thresholds per metric in request order, once fitted.
    pub fn thresholds(&self) -> Option<Vec<(MetricKey, Thresholds)>> {
        let fitted = self.fitted.as_ref()?;
        Some(self.metric_keys().into_iter().zip(fitted.thresholds.iter().copied()).collect())
    }

    /// Per-chunk values on the reference data, once fitted.
    pub fn reference_results(&self) -> Option<&ResultTable> {
        self.fitted.as_ref().map(|f| &f.reference_results)
    }

    /// Fits every metric on `reference` and derives alert thresholds from its chunks.
    ///
    /// Refitting replaces any previous state; a failed fit leaves the calculator unfitted.
    pub fn fit(&mut self, reference: &Dataset) -> Result<&mut Self, CalculatorError> {
        info!("Fitting performance calculator on {} reference rows", reference.len());
        self.fitted = None;
        if reference.is_empty() {
            return Err(CalculatorError::InvalidArguments {
                reason: "reference data is empty".to_string(),
            });
        }
        self.validate_columns(reference)?;

        for metric in &self.metrics {
            metric.fit(reference)?;
        }

        let chunks = self.split(reference)?;
        let values = self.evaluate(&chunks)?;

        let thresholds: Vec<Thresholds> = self
            .metrics
            .iter()
            .enumerate()
            .map(|(idx, metric)| {
                let reference_values: Vec<f64> = values.iter().map(|row| row[idx]).collect();
                let thresholds = Thresholds::from_reference(
                    &reference_values,
                    DEFAULT_STD_MULTIPLIER,
                    metric.lower_threshold_limit(),
                    metric.upper_threshold_limit(),
                );
                debug!(
                    "{} thresholds: lower={:?} upper={:?}",
                    metric.key(),
                    thresholds.lower,
                    thresholds.upper
                );
                thresholds
            })
            .collect();

        let reference_results =
            self.build_table(&chunks, &values, &thresholds, DataPeriod::Reference);
        self.fitted = Some(FittedState {
            thresholds,
            reference_results,
        });
        Ok(self)
    }

    /// Per-chunk metric values for `analysis`, which must contain targets.
    pub fn calculate(&self, analysis: &Dataset) -> Result<PerformanceResults, CalculatorError> {
        let fitted = self.fitted.as_ref().ok_or(CalculatorError::NotFitted)?;
        info!("Calculating realized performance on {} analysis rows", analysis.len());
        self.validate_columns(analysis)?;

        let chunks = self.split(analysis)?;
        let values = self.evaluate(&chunks)?;
        let data = self.build_table(&chunks, &values, &fitted.thresholds, DataPeriod::Analysis);

        Ok(PerformanceResults {
            data,
            use_case: self.use_case,
        })
    }

    fn validate_columns(&self, data: &Dataset) -> Result<(), CalculatorError> {
        let missing = data.missing_columns(self.bindings.required_columns());
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CalculatorError::MissingColumns { columns: missing })
        }
    }

    fn split(&self, data: &Dataset) -> Result<Vec<Chunk>, CalculatorError> {
        self.chunker.split(data, self.bindings.timestamp.as_deref())
    }

    /// Metric values per chunk, each row aligned with `self.metrics`.
    fn evaluate(&self, chunks: &[Chunk]) -> Result<Vec<Vec<f64>>, CalculatorError> {
        chunks
            .iter()
            .map(|chunk| {
                let values = self
                    .metrics
                    .iter()
                    .map(|metric| metric.calculate(&chunk.data))
                    .collect::<Result<Vec<f64>, _>>()?;
                debug!("Chunk {} ({} rows): {:?}", chunk.key, chunk.len(), values);
                Ok(values)
            })
            .collect()
    }

    fn build_table(
        &self,
        chunks: &[Chunk],
        values: &[Vec<f64>],
        thresholds: &[Thresholds],
        period: DataPeriod,
    ) -> ResultTable {
        let mut table = ResultTable::new(self.metric_keys());
        for (chunk, row) in chunks.iter().zip(values) {
            let metrics = row
                .iter()
                .zip(thresholds)
                .map(|(&value, thresholds)| MetricValue {
                    value,
                    lower_threshold: thresholds.lower,
                    upper_threshold: thresholds.upper,
                    alert: thresholds.is_alert(value),
                })
                .collect();
            table.push(ChunkRecord {
                key: chunk.key.clone(),
                start_index: chunk.start_index,
                end_index: chunk.end_index,
                start_date: chunk.start_datetime,
                end_date: chunk.end_datetime,
                period,
                metrics,
            });
        }
        table
    }
}

fn validate_config(config: &CalculatorConfig) -> Result<(), CalculatorError> {
    let invalid = |reason: &str| {
        Err(CalculatorError::InvalidArguments {
            reason: reason.to_string(),
        })
    };

    if config.metrics.is_empty() {
        return invalid("no metrics given");
    }
    if config.y_pred.trim().is_empty() || config.y_true.trim().is_empty() {
        return invalid("y_pred and y_true column names must not be empty");
    }
    if config
        .timestamp_column_name
        .as_ref()
        .is_some_and(|ts| ts.trim().is_empty())
    {
        return invalid("timestamp_column_name must not be empty when given");
    }
    match &config.y_pred_proba {
        ProbabilityColumns::Single(column) if column.trim().is_empty() => {
            return invalid("y_pred_proba column name must not be empty");
        }
        ProbabilityColumns::PerClass(mapping) if mapping.len() < 2 => {
            return invalid("y_pred_proba mapping needs at least two classes");
        }
        _ => {}
    }
    if matches!(config.chunker, Chunker::Period { .. }) && config.timestamp_column_name.is_none()
    {
        return invalid("period chunking requires timestamp_column_name");
    }
    config.chunker.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chunking::Incomplete;
    use crate::domain::dataset::Column;

    fn config(metrics: &[&str]) -> CalculatorConfig {
        CalculatorConfig::new(
            None,
            ProbabilityColumns::from("y_pred_proba"),
            "y_pred",
            "y_true",
            metrics,
        )
        .with_chunker(Chunker::Size {
            chunk_size: 4,
            incomplete: Incomplete::Keep,
        })
    }

    /// Two chunks of four rows: the first predicted perfectly, the second half wrong.
    fn data() -> Dataset {
        Dataset::new(vec![
            (
                "y_pred_proba",
                Column::from(vec![0.9, 0.8, 0.2, 0.1, 0.9, 0.2, 0.8, 0.1]),
            ),
            (
                "y_pred",
                Column::from(vec![1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0]),
            ),
            (
                "y_true",
                Column::from(vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_calculate_before_fit_fails() {
        let calc = PerformanceCalculator::new(config(&["accuracy"])).unwrap();
        assert!(matches!(
            calc.calculate(&data()),
            Err(CalculatorError::NotFitted)
        ));
    }

    #[test]
    fn test_fit_then_calculate() {
        let mut calc = PerformanceCalculator::new(config(&["accuracy", "roc_auc"])).unwrap();
        calc.fit(&data()).unwrap();

        let results = calc.calculate(&data()).unwrap();
        assert_eq!(results.use_case, UseCase::ClassificationBinary);
        assert_eq!(
            results.data.metric_values(MetricKey::Accuracy),
            Some(vec![1.0, 0.5])
        );
        assert_eq!(
            results.data.metric_values(MetricKey::RocAuc),
            Some(vec![1.0, 0.75])
        );
        assert_eq!(results.data.rows()[1].key, "[4:7]");
        assert_eq!(results.data.rows()[1].period, DataPeriod::Analysis);
    }

    #[test]
    fn test_reference_results_and_thresholds() {
        let mut calc = PerformanceCalculator::new(config(&["accuracy"])).unwrap();
        assert!(calc.thresholds().is_none());
        calc.fit(&data()).unwrap();

        let reference = calc.reference_results().unwrap();
        assert_eq!(reference.rows()[0].period, DataPeriod::Reference);

        // mean 0.75, population std 0.25 -> [0.0, 1.0] after clipping
        let thresholds = calc.thresholds().unwrap();
        assert_eq!(thresholds[0].0, MetricKey::Accuracy);
        assert_eq!(thresholds[0].1.lower, Some(0.0));
        assert_eq!(thresholds[0].1.upper, Some(1.0));
    }

    #[test]
    fn test_failed_refit_clears_previous_state() {
        let mut calc = PerformanceCalculator::new(config(&["accuracy"])).unwrap();
        calc.fit(&data()).unwrap();
        assert!(calc.is_fitted());

        let bad_reference = Dataset::new(vec![("y_pred_proba", Column::from(vec![0.5]))]).unwrap();
        assert!(calc.fit(&bad_reference).is_err());
        assert!(!calc.is_fitted());
        assert!(calc.thresholds().is_none());
        assert!(matches!(
            calc.calculate(&data()),
            Err(CalculatorError::NotFitted)
        ));
    }

    #[test]
    fn test_missing_columns_are_reported() {
        let mut calc = PerformanceCalculator::new(config(&["f1"])).unwrap();
        let incomplete = Dataset::new(vec![("y_pred", Column::from(vec![1.0]))]).unwrap();
        match calc.fit(&incomplete) {
            Err(CalculatorError::MissingColumns { columns }) => {
                assert_eq!(columns, vec!["y_pred_proba", "y_true"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_invalid_configurations() {
        assert!(matches!(
            PerformanceCalculator::new(config(&[])),
            Err(CalculatorError::InvalidArguments { .. })
        ));
        assert!(matches!(
            PerformanceCalculator::new(config(&["f1", "f1"])),
            Err(CalculatorError::InvalidArguments { .. })
        ));
        assert!(matches!(
            PerformanceCalculator::new(config(&["f1", "mae"])),
            Err(CalculatorError::UnknownMetric { .. })
        ));

        let single_class = CalculatorConfig::new(
            None,
            ProbabilityColumns::per_class([("a", "p_a")]),
            "y_pred",
            "y_true",
            &["f1"],
        );
        assert!(PerformanceCalculator::new(single_class).is_err());

        let period_without_timestamp = config(&["f1"]).with_chunker(Chunker::Period {
            offset: crate::domain::chunking::PeriodOffset::Day,
        });
        assert!(PerformanceCalculator::new(period_without_timestamp).is_err());
    }

    #[test]
    fn test_empty_reference_is_rejected() {
        let mut calc = PerformanceCalculator::new(config(&["f1"])).unwrap();
        assert!(calc.fit(&data().slice(0, 0)).is_err());
        assert!(!calc.is_fitted());
    }

    #[test]
    fn test_empty_analysis_yields_empty_table() {
        let mut calc = PerformanceCalculator::new(config(&["f1"])).unwrap();
        calc.fit(&data()).unwrap();
        let results = calc.calculate(&data().slice(0, 0)).unwrap();
        assert!(results.data.is_empty());
    }
}
