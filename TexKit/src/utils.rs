//! File system helpers

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;
use crate::naming::is_hidden;

/// Immediate children of `dir` accepted by `keep`, sorted by name.
///
/// Hidden entries are never returned. Failure to read `dir` is an error.
pub fn list_dir(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let hidden = entry.file_name().to_str().is_some_and(is_hidden);
        if !hidden && keep(entry.path()) {
            entries.push(entry.into_path());
        }
    }
    Ok(entries)
}

/// Whether the extension of `path` is one of `extensions`, ignoring ASCII case
#[must_use]
pub fn has_image_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|x| ext.eq_ignore_ascii_case(x)))
}

/// File name of `path` as UTF-8, if it has one
#[must_use]
pub fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_list_dir_sorted_and_visible() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.jpg"), b"").unwrap();
        fs::write(dir.path().join("a.jpg"), b"").unwrap();
        fs::write(dir.path().join(".DS_Store"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let files = list_dir(dir.path(), Path::is_file).unwrap();
        let names: Vec<_> = files.iter().filter_map(|p| file_name_str(p)).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_list_dir_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_dir(&dir.path().join("missing"), |_| true).is_err());
    }

    #[test]
    fn test_has_image_extension() {
        let exts = ["png", "jpg", "jpeg"];
        assert!(has_image_extension(Path::new("a.JPG"), &exts));
        assert!(has_image_extension(Path::new("a.jpeg"), &exts));
        assert!(!has_image_extension(Path::new("a.gif"), &exts));
        assert!(!has_image_extension(Path::new("jpg"), &exts));
    }
}
