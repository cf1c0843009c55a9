//! Test utilities shared by the integration suites.
//!
//! Provides throwaway project trees, a recording [`ManifestEmitter`], and a
//! probe for the system `ninja` binary.

pub mod ninja;
pub mod recording;

pub use recording::{Declaration, RecordingEmitter, label};

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

#[doc(no_inline)]
pub use dolgen::emitter::ManifestEmitter;

/// Create a temporary project containing empty files at `files`.
///
/// Paths are `/`-separated and relative to the project root; a trailing `/`
/// creates a directory instead. Returns the guard and the root path.
///
/// # Errors
///
/// Returns an error if the tree cannot be created.
pub fn project_tree(files: &[&str]) -> Result<(TempDir, Utf8PathBuf)> {
    let temp = TempDir::new().context("create temp project")?;
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
        .map_err(|p| anyhow!("temp dir {} is not UTF-8", p.display()))?;
    for file in files {
        add_path(&root, file)?;
    }
    Ok((temp, root))
}

/// Create `rel` under `root`, making parents as needed.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be created.
pub fn add_path(root: &Utf8Path, rel: &str) -> Result<()> {
    let path = root.join(rel);
    if rel.ends_with('/') {
        return fs::create_dir_all(&path).with_context(|| format!("create dir {path}"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {parent}"))?;
    }
    fs::write(&path, "").with_context(|| format!("create file {path}"))
}
