use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::error::{InspectError, InspectResult};

/// Where the class labels of a dataset come from.
///
/// Exactly one source is selected per run. When several are present the
/// priority is CSV, then JSON, then the directory layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSource {
    /// No label information at all
    None,
    /// `filename,class_label` rows in a CSV file at the dataset root
    Csv(PathBuf),
    /// Array of `{ "patientId", "Target" }` records in a JSON file at the root
    Json(PathBuf),
    /// Each top-level subdirectory is a class
    DirectoryLayout,
}

/// Label source without its payload, used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSourceKind {
    None,
    Csv,
    Json,
    DirectoryLayout,
}

impl LabelSource {
    pub fn kind(&self) -> LabelSourceKind {
        match self {
            LabelSource::None => LabelSourceKind::None,
            LabelSource::Csv(_) => LabelSourceKind::Csv,
            LabelSource::Json(_) => LabelSourceKind::Json,
            LabelSource::DirectoryLayout => LabelSourceKind::DirectoryLayout,
        }
    }

    /// Label file backing this source, if any
    pub fn file(&self) -> Option<&Path> {
        match self {
            LabelSource::Csv(path) | LabelSource::Json(path) => Some(path),
            LabelSource::None | LabelSource::DirectoryLayout => None,
        }
    }
}

impl LabelSourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            LabelSourceKind::None => "none",
            LabelSourceKind::Csv => "csv",
            LabelSourceKind::Json => "json",
            LabelSourceKind::DirectoryLayout => "directory layout",
        }
    }
}

/// Whether a root-level file name looks like a label file.
/// The suffix match is case-sensitive.
pub fn is_label_file_name(name: &str) -> bool {
    name.ends_with(".csv") || name.ends_with(".json")
}

/// Make sure `root` exists and is a directory
pub fn ensure_root(root: &Path) -> InspectResult<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(InspectError::NotFound(root.to_path_buf()))
    }
}

/// Immediate entries of `root`, sorted by file name
pub(crate) fn list_root(root: &Path) -> InspectResult<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|e| InspectError::io(root, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| InspectError::io(root, e))?;
        paths.push(entry.path());
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Immediate subdirectories of `root`, sorted by name
pub fn class_directories(root: &Path) -> InspectResult<Vec<(String, PathBuf)>> {
    Ok(list_root(root)?
        .into_iter()
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            Some((name, path))
        })
        .collect())
}

/// Inspect the immediate children of `root` and pick the label source.
///
/// The JSON candidate is never opened here; when a CSV exists it is not even
/// considered.
pub fn discover_label_source(root: &Path) -> InspectResult<LabelSource> {
    ensure_root(root)?;

    let entries = list_root(root)?;

    let mut csv_file = None;
    let mut json_file = None;
    let mut has_directories = false;

    for path in &entries {
        if path.is_dir() {
            has_directories = true;
            continue;
        }
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(".csv") && csv_file.is_none() {
            csv_file = Some(path.clone());
        } else if name.ends_with(".json") && json_file.is_none() {
            json_file = Some(path.clone());
        }
    }

    let source = if let Some(csv) = csv_file {
        if let Some(json) = &json_file {
            debug!("Ignoring {:?}, CSV takes priority", json);
        }
        LabelSource::Csv(csv)
    } else if let Some(json) = json_file {
        LabelSource::Json(json)
    } else if has_directories {
        LabelSource::DirectoryLayout
    } else {
        LabelSource::None
    };

    info!("Label source for {:?}: {}", root, source.kind().as_str());
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_beats_json_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("cats")).unwrap();
        fs::write(dir.path().join("labels.json"), "[]").unwrap();
        fs::write(dir.path().join("labels.csv"), "a,b\n").unwrap();

        let source = discover_label_source(dir.path()).unwrap();
        assert_eq!(source, LabelSource::Csv(dir.path().join("labels.csv")));
    }

    #[test]
    fn test_json_beats_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("cats")).unwrap();
        fs::write(dir.path().join("labels.json"), "[]").unwrap();

        let source = discover_label_source(dir.path()).unwrap();
        assert_eq!(source, LabelSource::Json(dir.path().join("labels.json")));
    }

    #[test]
    fn test_directories_without_label_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("cats")).unwrap();
        fs::write(dir.path().join("readme.txt"), "hello").unwrap();

        let source = discover_label_source(dir.path()).unwrap();
        assert_eq!(source, LabelSource::DirectoryLayout);
        assert_eq!(source.file(), None);
    }

    #[test]
    fn test_flat_directory_has_no_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("img.jpg"), "x").unwrap();

        assert_eq!(discover_label_source(dir.path()).unwrap(), LabelSource::None);
    }

    #[test]
    fn test_suffix_match_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LABELS.CSV"), "a,b\n").unwrap();

        assert_eq!(discover_label_source(dir.path()).unwrap(), LabelSource::None);
        assert!(!is_label_file_name("LABELS.CSV"));
        assert!(is_label_file_name("train.json"));
    }

    #[test]
    fn test_first_csv_in_name_order_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "").unwrap();
        fs::write(dir.path().join("a.csv"), "").unwrap();

        let source = discover_label_source(dir.path()).unwrap();
        assert_eq!(source.file(), Some(dir.path().join("a.csv").as_path()));
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_label_source(&dir.path().join("nope")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_file_root_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.jpg");
        fs::write(&file, "x").unwrap();
        assert!(discover_label_source(&file).unwrap_err().is_not_found());
    }
}
