//! Source discovery.
//!
//! Each configured extension is expanded as `<root>/**/*.<ext>` and the
//! matches of each group are sorted by path before the groups are
//! concatenated in priority order. The result is independent of the order
//! in which the filesystem yields directory entries.

use std::fs;
use std::io;
use std::path::Path;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use glob::{MatchOptions, Pattern, glob_with};
use tracing::debug;

use super::{GraphError, SourceFile};
use crate::config::GenConfig;

/// Discover every source file under the configured root.
///
/// Returned paths are relative to `project_dir` and `/`-separated. Hidden
/// files and anything below a hidden directory are skipped, as are
/// directories whose names happen to end in a source extension.
///
/// # Errors
///
/// Returns [`GraphError::SourceRootMissing`] or
/// [`GraphError::SourceRootUnreadable`] when the root cannot be opened and
/// the remaining [`GraphError`] discovery variants when traversal fails.
pub fn discover_sources(
    project_dir: &Utf8Path,
    config: &GenConfig,
) -> Result<Vec<SourceFile>, GraphError> {
    let mut root = clean(&project_dir.join(&config.source_root));
    if root.as_str().is_empty() {
        root = Utf8PathBuf::from(".");
    }
    ensure_root_dir(&root)?;

    let opts = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut sources = Vec::new();
    for ext in &config.source_extensions {
        let pattern = format!(
            "{}/**/*.{}",
            Pattern::escape(root.as_str()),
            Pattern::escape(ext)
        );
        let entries = glob_with(&pattern, opts).map_err(|source| GraphError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;

        let mut group = Vec::new();
        for entry in entries {
            let path = entry.map_err(|source| GraphError::Discovery {
                pattern: pattern.clone(),
                source,
            })?;
            if let Some(rel) = accept_entry(&path, project_dir, &root)? {
                group.push(rel);
            }
        }
        group.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        debug!(extension = %ext, count = group.len(), "discovered source group");
        sources.extend(group.into_iter().map(|path| SourceFile::new(path, ext.as_str())));
    }
    Ok(sources)
}

/// Check that the source root opens as a directory.
fn ensure_root_dir(root: &Utf8Path) -> Result<(), GraphError> {
    Dir::open_ambient_dir(root, ambient_authority()).map(drop).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            GraphError::SourceRootMissing {
                path: root.to_owned(),
            }
        } else {
            GraphError::SourceRootUnreadable {
                path: root.to_owned(),
                source,
            }
        }
    })
}

/// Filter a glob match, returning its project-relative `/`-separated path.
fn accept_entry(
    path: &Path,
    project_dir: &Utf8Path,
    root: &Utf8Path,
) -> Result<Option<Utf8PathBuf>, GraphError> {
    let utf_path = Utf8Path::from_path(path).ok_or_else(|| GraphError::NonUtf8Path {
        path: path.to_path_buf(),
    })?;
    let Some(below_root) = strip_base(utf_path, root) else {
        debug!(path = %utf_path, "ignoring match outside the source root");
        return Ok(None);
    };
    if below_root.components().any(|c| c.as_str().starts_with('.')) {
        return Ok(None);
    }
    // Symlinks are followed wherever they point, as the glob walk already did.
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %utf_path, "ignoring dangling symlink");
            return Ok(None);
        }
        Err(source) => {
            return Err(GraphError::Metadata {
                path: utf_path.to_owned(),
                source,
            });
        }
    };
    if !metadata.is_file() {
        return Ok(None);
    }

    let relative = strip_base(utf_path, project_dir).unwrap_or_else(|| clean(utf_path));
    Ok(Some(to_slash(&relative)))
}

/// Drop `.` components so `./src/a.c` and `src/a.c` compare equal.
fn clean(path: &Utf8Path) -> Utf8PathBuf {
    path.components()
        .filter(|c| !matches!(c, Utf8Component::CurDir))
        .collect()
}

/// `path` relative to `base`, treating an empty or `.` base as the origin.
fn strip_base(path: &Utf8Path, base: &Utf8Path) -> Option<Utf8PathBuf> {
    let path = clean(path);
    let base = clean(base);
    if base.as_str().is_empty() {
        return Some(path);
    }
    path.strip_prefix(&base).ok().map(Utf8Path::to_owned)
}

/// Render a path with `/` separators regardless of the host platform.
fn to_slash(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::RootDir => out.push('/'),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(other.as_str());
            }
        }
    }
    Utf8PathBuf::from(out)
}
