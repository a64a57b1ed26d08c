use crate::application::calculator::config::ColumnBindings;
use crate::domain::dataset::Dataset;
use crate::domain::errors::CalculatorError;
use crate::domain::performance::metric_key::MetricKey;
use crate::domain::use_case::UseCase;
use std::sync::Arc;

/// A realized performance metric computed on one chunk of labelled data.
pub trait Metric: std::fmt::Debug + Send + Sync {
    fn key(&self) -> MetricKey;

    fn use_case(&self) -> UseCase;

    /// Column bindings of the owning calculator.
    fn bindings(&self) -> &Arc<ColumnBindings>;

    /// Checks the reference data is usable for this metric.
    fn fit(&self, reference: &Dataset) -> Result<(), CalculatorError>;

    /// Metric value for `data`. Undefined values are returned as NaN.
    fn calculate(&self, data: &Dataset) -> Result<f64, CalculatorError>;

    fn lower_threshold_limit(&self) -> f64 {
        0.0
    }

    fn upper_threshold_limit(&self) -> f64 {
        1.0
    }
}

/// Same metric type, owned by the same calculator.
impl PartialEq for dyn Metric {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
            && self.use_case() == other.use_case()
            && Arc::ptr_eq(self.bindings(), other.bindings())
    }
}

/// Declares a metric struct bound to a calculator's columns and wires its
/// `fit`/`calculate` to free functions.
macro_rules! classification_metric {
    (
        $(#[$doc:meta])*
        $name:ident, $key:expr, $use_case:expr, fit = $fit:path, calculate = $calculate:path
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            bindings: std::sync::Arc<$crate::application::calculator::config::ColumnBindings>,
        }

        impl $name {
            pub fn new(
                bindings: std::sync::Arc<$crate::application::calculator::config::ColumnBindings>,
            ) -> Self {
                Self { bindings }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                std::sync::Arc::ptr_eq(&self.bindings, &other.bindings)
            }
        }

        impl $crate::application::metrics::traits::Metric for $name {
            fn key(&self) -> $crate::domain::performance::metric_key::MetricKey {
                $key
            }

            fn use_case(&self) -> $crate::domain::use_case::UseCase {
                $use_case
            }

            fn bindings(
                &self,
            ) -> &std::sync::Arc<$crate::application::calculator::config::ColumnBindings> {
                &self.bindings
            }

            fn fit(
                &self,
                reference: &$crate::domain::dataset::Dataset,
            ) -> Result<(), $crate::domain::errors::CalculatorError> {
                $fit(&self.bindings, reference)
            }

            fn calculate(
                &self,
                data: &$crate::domain::dataset::Dataset,
            ) -> Result<f64, $crate::domain::errors::CalculatorError> {
                $calculate(&self.bindings, data)
            }
        }
    };
}

pub(crate) use classification_metric;
