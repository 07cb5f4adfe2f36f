use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::core::error::InspectResult;
use crate::core::labels::{class_directories, LabelMapping, LabelSource, LabelSourceKind};
use crate::core::walk::count_files;

/// Number of items per class label, sorted by label
pub type ClassCounts = BTreeMap<String, usize>;

/// Which of the two counting algorithms applies to a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountingBasis {
    /// Count mapping entries per label (CSV/JSON with at least one entry)
    Mapping,
    /// Count files below each top-level subdirectory
    Directories,
}

impl CountingBasis {
    pub fn select(source: &LabelSource, mapping: &LabelMapping) -> Self {
        match source.kind() {
            LabelSourceKind::Csv | LabelSourceKind::Json if !mapping.is_empty() => {
                CountingBasis::Mapping
            }
            _ => CountingBasis::Directories,
        }
    }
}

/// Number of classes.
///
/// Mapping-driven: distinct labels in the mapping. Directory-driven: number
/// of immediate subdirectories of `root`, empty ones included.
pub fn count_classes(
    root: &Path,
    mapping: &LabelMapping,
    source: &LabelSource,
) -> InspectResult<usize> {
    match CountingBasis::select(source, mapping) {
        CountingBasis::Mapping => Ok(mapping.distinct_labels().len()),
        CountingBasis::Directories => Ok(class_directories(root)?.len()),
    }
}

/// Number of items per class.
///
/// Mapping-driven counts are label occurrences among mapped identifiers,
/// whether or not a file exists for them. Directory-driven counts are raw
/// file counts below each subdirectory, non-image and invalid files included.
pub fn count_images_per_class(
    root: &Path,
    mapping: &LabelMapping,
    source: &LabelSource,
) -> InspectResult<ClassCounts> {
    match CountingBasis::select(source, mapping) {
        CountingBasis::Mapping => Ok(mapping.label_occurrences()),
        CountingBasis::Directories => {
            let mut counts = ClassCounts::new();
            for (class_name, class_dir) in class_directories(root)? {
                let files = count_files(&class_dir)?;
                debug!("Class {}: {} files", class_name, files);
                counts.insert(class_name, files);
            }
            Ok(counts)
        }
    }
}
