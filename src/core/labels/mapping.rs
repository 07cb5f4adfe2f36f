use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::source::{class_directories, LabelSource};
use crate::core::error::{InspectError, InspectResult};
use crate::core::walk::walk_files;

/// JSON key holding the item identifier
pub const JSON_ID_KEY: &str = "patientId";
/// JSON key holding the class label
pub const JSON_LABEL_KEY: &str = "Target";

/// Mapping from item identifier (file name or record id) to class label.
///
/// Built once per run and never modified afterwards. Rows or records that the
/// parser dropped are not silently lost: their number is kept in
/// [`LabelMapping::discarded`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMapping {
    entries: HashMap<String, String>,
    discarded: usize,
}

impl LabelMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Class label for an identifier
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of CSV rows or JSON records dropped while parsing
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Distinct class labels, sorted
    pub fn distinct_labels(&self) -> BTreeSet<&str> {
        self.entries.values().map(String::as_str).collect()
    }

    /// Number of identifiers carrying each label
    pub fn label_occurrences(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for label in self.entries.values() {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn insert(&mut self, identifier: String, label: String) {
        self.entries.insert(identifier, label);
    }

    fn discard(&mut self) {
        self.discarded += 1;
    }
}

impl FromIterator<(String, String)> for LabelMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            discarded: 0,
        }
    }
}

/// Resolve a label source into a mapping.
///
/// A CSV or JSON file that cannot be read or parsed aborts the run with
/// [`InspectError::MalformedLabelSource`].
pub fn parse_label_mapping(root: &Path, source: &LabelSource) -> InspectResult<LabelMapping> {
    let mapping = match source {
        LabelSource::None => LabelMapping::new(),
        LabelSource::Csv(path) => parse_csv_labels(path)?,
        LabelSource::Json(path) => parse_json_labels(path)?,
        LabelSource::DirectoryLayout => directory_layout_labels(root)?,
    };

    info!(
        "Resolved {} labelled items in {} classes ({} discarded)",
        mapping.len(),
        mapping.distinct_labels().len(),
        mapping.discarded()
    );
    Ok(mapping)
}

/// Parse a CSV label file.
///
/// Format: `filename,class_label`. The first row is always skipped as a
/// header, whether or not it is one. Rows with a field count other than two
/// are discarded.
pub fn parse_csv_labels(path: &Path) -> InspectResult<LabelMapping> {
    let file = fs::File::open(path).map_err(|e| InspectError::malformed(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut mapping = LabelMapping::new();
    let mut records = reader.records();

    // Header
    if let Some(first) = records.next() {
        first.map_err(|e| InspectError::malformed(path, e))?;
    }

    for (row, record) in records.enumerate() {
        let record = record.map_err(|e| InspectError::malformed(path, e))?;
        if record.len() == 2 {
            mapping.insert(record[0].to_string(), record[1].to_string());
        } else {
            debug!(
                "Skipping row {} of {:?}: expected 2 fields, found {}",
                row + 2,
                path,
                record.len()
            );
            mapping.discard();
        }
    }

    Ok(mapping)
}

/// Parse a JSON label file.
///
/// The document must be an array. Each element is expected to be an object
/// with the keys `patientId` and `Target`; elements where either value is
/// missing or falsy are discarded.
pub fn parse_json_labels(path: &Path) -> InspectResult<LabelMapping> {
    let contents = fs::read_to_string(path).map_err(|e| InspectError::malformed(path, e))?;
    let document: Value =
        serde_json::from_str(&contents).map_err(|e| InspectError::malformed(path, e))?;

    let Value::Array(records) = document else {
        return Err(InspectError::malformed(path, "expected a JSON array of records"));
    };

    let mut mapping = LabelMapping::new();
    for (index, record) in records.iter().enumerate() {
        let identifier = truthy_text(record.get(JSON_ID_KEY));
        let label = truthy_text(record.get(JSON_LABEL_KEY));
        match (identifier, label) {
            (Some(identifier), Some(label)) => mapping.insert(identifier, label),
            _ => {
                debug!("Skipping record {} of {:?}", index, path);
                mapping.discard();
            }
        }
    }

    Ok(mapping)
}

/// Text of a JSON value, or `None` when the value is absent or falsy
/// (`null`, `false`, `0`, `""`, `[]`, `{}`).
fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                None
            } else {
                Some(n.to_string())
            }
        }
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// Map every file below each top-level subdirectory to the subdirectory name.
///
/// Subdirectories are visited in ascending name order, so when the same file
/// name appears under several classes the class that sorts last wins.
pub fn directory_layout_labels(root: &Path) -> InspectResult<LabelMapping> {
    let mut mapping = LabelMapping::new();

    for (class_name, class_dir) in class_directories(root)? {
        for entry in walk_files(&class_dir) {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if let Some(previous) = mapping.get(&file_name) {
                debug!(
                    "{} appears in both {} and {}, keeping {}",
                    file_name, previous, class_name, class_name
                );
            }
            mapping.insert(file_name, class_name.clone());
        }
    }

    Ok(mapping)
}
