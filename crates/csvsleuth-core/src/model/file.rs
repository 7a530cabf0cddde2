/// The input file chosen by the user.
use std::path::{Path, PathBuf};

/// A file selected for analysis.
///
/// Only `name` is recorded in history; `path` is what the analyser opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
}

impl SelectedFile {
    /// Build from a filesystem path. The display name is the final path
    /// component, or the whole path if it has none.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }
}

/// Whether `path` looks like a CSV file (case-insensitive `.csv` extension).
pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
