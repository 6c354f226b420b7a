//! Test utilities for bakecheck
//!
//! This crate provides shared testing utilities used across the bakecheck workspace.

pub mod fixtures;

pub use fixtures::{
    SAMPLE_REPO_NAME, default_context, write_sample_manifest, write_sample_template,
};

#[cfg(unix)]
pub use fixtures::fake_tool;

use std::path::Path;
use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// All test trees live in a single gitignored location that is easy to clean
/// up manually if a test is killed before `TempDir` is dropped.
///
/// # Panics
///
/// Panics if the current directory is unknown or `.tmp/` cannot be created.
///
/// # Examples
///
/// ```rust
/// use bakecheck_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// std::fs::write(temp.path().join("setup.py"), "").unwrap();
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Write text files below `root`, creating parent directories
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        write_file(root, rel, content);
    }
}

/// Write one file below `root`, creating parent directories
pub fn write_file(root: &Path, rel: &str, content: impl AsRef<[u8]>) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(&path, content)
        .unwrap_or_else(|e| panic!("Failed to write {}: {}", path.display(), e));
}
