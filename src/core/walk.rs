use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::core::error::InspectResult;

/// Every file below `dir`, depth-first with siblings in name order.
///
/// Directories are not yielded and directory symlinks are not descended into.
/// A symlink to a file counts as a file.
pub fn walk_files(dir: &Path) -> impl Iterator<Item = InspectResult<DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if is_file(&entry) => Some(Ok(entry)),
            Ok(_) => None,
            Err(e) => Some(Err(e.into())),
        })
}

fn is_file(entry: &DirEntry) -> bool {
    !entry.file_type().is_dir() && !entry.path().is_dir()
}

/// Number of files below `dir`
pub fn count_files(dir: &Path) -> InspectResult<usize> {
    let mut count = 0;
    for entry in walk_files(dir) {
        entry?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_walk_files_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        fs::write(dir.path().join("a/one.txt"), "1").unwrap();
        fs::write(dir.path().join("a/b/c/two.txt"), "2").unwrap();
        fs::write(dir.path().join("three.txt"), "3").unwrap();

        let names: Vec<String> = walk_files(dir.path())
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["two.txt", "one.txt", "three.txt"]);
        assert_eq!(count_files(dir.path()).unwrap(), 3);
    }

    #[test]
    fn test_count_files_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(count_files(dir.path()).unwrap(), 0);
    }
}
