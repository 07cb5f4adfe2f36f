mod class_aggregator;
mod report;

pub use class_aggregator::{count_classes, count_images_per_class, ClassCounts, CountingBasis};
pub use report::{
    inspect_dataset, inspect_dataset_with_progress, AnalysisReport, AnalysisResponse,
    ClassesCount,
};
