pub mod binary;
pub mod metric_factory;
pub mod multiclass;
mod traits;

pub use binary::{
    BinaryClassificationAccuracy, BinaryClassificationAuroc, BinaryClassificationF1,
    BinaryClassificationPrecision, BinaryClassificationRecall, BinaryClassificationSpecificity,
};
pub use metric_factory::MetricFactory;
pub use multiclass::{
    MulticlassClassificationAccuracy, MulticlassClassificationAuroc, MulticlassClassificationF1,
    MulticlassClassificationPrecision, MulticlassClassificationRecall,
    MulticlassClassificationSpecificity,
};
pub use traits::Metric;
