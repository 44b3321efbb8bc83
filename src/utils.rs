use std::{
    fs,
    path::{Path, PathBuf},
};

use itertools::Itertools;

use crate::error::{Error, Result};

/// File name suffix of enrichment tables
pub const TABLE_SUFFIX: &str = ".tsv";

/// Lists the regular files directly inside `dir` whose name ends with `.tsv`
///
/// Subdirectories are not searched. Paths are sorted so that repeated runs
/// read the files in the same order.
pub fn list_tsv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && file_label(&path).ends_with(TABLE_SUFFIX) {
            files.push(path);
        }
    }
    Ok(files.into_iter().sorted().collect())
}

/// The file name of `path`, used to tag observations
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
