#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub fn test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create test directory")
}

/// Write a benchmark result file into `dir` and return its path.
pub fn write_result_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write result file");
    path
}
