use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{atomic::AtomicBool, mpsc::Sender, Arc};
use tracing::{info, info_span};

use super::class_aggregator::{count_classes, count_images_per_class, ClassCounts};
use crate::config::AppConfig;
use crate::core::error::InspectResult;
use crate::core::labels::{
    discover_label_source, ensure_root, parse_label_mapping, LabelSourceKind,
};
use crate::core::validation::{validate_tree_with_progress, InspectProgress};

/// Everything learned about a dataset in one run.
///
/// Built fresh per run and read once by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub format_message: String,
    /// Names of files with a wrong extension or that failed to decode
    pub invalid_files: Vec<String>,
    pub class_count: usize,
    pub per_class_counts: ClassCounts,
    pub label_source: LabelSourceKind,
    /// CSV rows or JSON records dropped while building the label mapping
    pub discarded_labels: usize,
    pub total_files: usize,
}

/// `{"Number of classes": n}` wrapper of the response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassesCount {
    #[serde(rename = "Number of classes")]
    pub number_of_classes: usize,
}

/// Serialized response shape handed to callers of the analysis.
///
/// `invalid_images` is the stable key for the invalid file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub image_format_message: String,
    pub invalid_images: Vec<String>,
    pub classes_count: ClassesCount,
    pub images_per_class: ClassCounts,
}

impl AnalysisReport {
    pub fn to_response(&self) -> AnalysisResponse {
        AnalysisResponse {
            image_format_message: self.format_message.clone(),
            invalid_images: self.invalid_files.clone(),
            classes_count: ClassesCount {
                number_of_classes: self.class_count,
            },
            images_per_class: self.per_class_counts.clone(),
        }
    }
}

/// Inspect a dataset directory with optional progress reporting and
/// cancellation.
pub fn inspect_dataset_with_progress(
    root: &Path,
    config: &AppConfig,
    progress_tx: Option<Sender<InspectProgress>>,
    cancel_flag: Option<Arc<AtomicBool>>,
) -> InspectResult<AnalysisReport> {
    let _span = info_span!("inspect_dataset", root = %root.display()).entered();
    ensure_root(root)?;
    info!("Inspecting dataset at {:?}", root);

    let source = discover_label_source(root)?;
    let mapping = parse_label_mapping(root, &source)?;

    let validation =
        validate_tree_with_progress(root, config, progress_tx.as_ref(), cancel_flag.as_deref())?;

    let class_count = count_classes(root, &mapping, &source)?;
    let per_class_counts = count_images_per_class(root, &mapping, &source)?;

    let report = AnalysisReport {
        format_message: validation.message,
        invalid_files: validation.invalid_files,
        class_count,
        per_class_counts,
        label_source: source.kind(),
        discarded_labels: mapping.discarded(),
        total_files: validation.total,
    };

    info!(
        "Inspection complete: {} files, {} invalid, {} classes",
        report.total_files,
        report.invalid_files.len(),
        report.class_count
    );

    if let Some(tx) = progress_tx {
        let _ = tx.send(InspectProgress::Complete {
            total: report.total_files,
            invalid: report.invalid_files.len(),
        });
    }

    Ok(report)
}

/// Inspect a dataset directory (synchronous version)
pub fn inspect_dataset(root: &Path, config: &AppConfig) -> InspectResult<AnalysisReport> {
    inspect_dataset_with_progress(root, config, None, None)
}
