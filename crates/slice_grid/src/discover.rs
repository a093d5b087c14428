use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::GridError;

const SLICE_SUFFIX: &str = ".dcm";

/// One candidate slice file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceFile {
    pub path: PathBuf,
    /// File name without the `.dcm` suffix, used as the display caption.
    pub label: String,
}

/// Recursively collects all `.dcm` files (suffix matched case-insensitively)
/// under `dir`, sorted by label so repeated runs are deterministic.
///
/// Unreadable entries are skipped. Zero matches is an error: an empty batch
/// has nothing to render.
pub fn discover_slices(dir: impl AsRef<Path>) -> Result<Vec<SliceFile>, GridError> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::debug!("Skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if let Some(label) = strip_slice_suffix(&name) {
            files.push(SliceFile {
                path: entry.path().to_path_buf(),
                label,
            });
        }
    }

    if files.is_empty() {
        return Err(GridError::EmptyInput {
            path: dir.to_path_buf(),
        });
    }

    files.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.path.cmp(&b.path)));
    Ok(files)
}

fn strip_slice_suffix(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    if bytes.len() < SLICE_SUFFIX.len() {
        return None;
    }
    let split = bytes.len() - SLICE_SUFFIX.len();
    if bytes[split..].eq_ignore_ascii_case(SLICE_SUFFIX.as_bytes()) {
        // A bare `.dcm` dotfile keeps its full name as the label.
        if split == 0 {
            return Some(name.to_string());
        }
        // The suffix is ASCII, so `split` is a char boundary.
        Some(name[..split].to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn suffix_is_case_insensitive() {
        assert_eq!(strip_slice_suffix("slice01.dcm").as_deref(), Some("slice01"));
        assert_eq!(strip_slice_suffix("SLICE01.DCM").as_deref(), Some("SLICE01"));
        assert_eq!(strip_slice_suffix("slice01.DcM").as_deref(), Some("slice01"));
        assert_eq!(strip_slice_suffix("slice01.dicom"), None);
        assert_eq!(strip_slice_suffix("notes.txt"), None);
        assert_eq!(strip_slice_suffix("dcm"), None);
    }

    #[test]
    fn bare_dotfile_keeps_its_full_name_as_label() {
        assert_eq!(strip_slice_suffix(".dcm").as_deref(), Some(".dcm"));
        assert_eq!(strip_slice_suffix(".DCM").as_deref(), Some(".DCM"));
    }

    #[test]
    fn finds_nested_files_sorted_by_label() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.dcm"), b"x").unwrap();
        fs::write(dir.path().join("A.DCM"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir_all(dir.path().join("nested/deep")).unwrap();
        fs::write(dir.path().join("nested/c.dcm"), b"x").unwrap();
        fs::write(dir.path().join("nested/deep/d.DcM"), b"x").unwrap();

        let files = discover_slices(dir.path()).unwrap();
        let labels: Vec<&str> = files.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["A", "b", "c", "d"]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), b"x").unwrap();
        assert!(matches!(
            discover_slices(dir.path()),
            Err(GridError::EmptyInput { .. })
        ));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("does-not-exist");
        assert!(matches!(
            discover_slices(&gone),
            Err(GridError::EmptyInput { path }) if path == gone
        ));
    }
}
