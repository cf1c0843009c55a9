//! File output helpers for the runner.
//!
//! Manifests are persisted atomically: the text is written to a temporary
//! file beside the destination, synced, and renamed into place. A failure at
//! any point drops the temporary file and leaves the previous manifest as it
//! was.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result as AnyResult, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs as cap_fs};
use tempfile::Builder;
use tracing::info;

use crate::ninja_gen::NinjaContent;

/// Return `true` when `path` is the CLI sentinel indicating "write to stdout".
#[must_use]
pub fn is_stdout_path(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Open the closest existing ancestor of `path` and return it with the
/// remainder of `path` relative to it.
fn derive_dir_and_relative(path: &Utf8Path) -> AnyResult<(cap_fs::Dir, Utf8PathBuf)> {
    if path.is_relative() {
        let dir = cap_fs::Dir::open_ambient_dir(".", ambient_authority())
            .context("open current directory")?;
        return Ok((dir, path.to_owned()));
    }

    let (base, dir) = path
        .ancestors()
        .find_map(|candidate| {
            cap_fs::Dir::open_ambient_dir(candidate.as_str(), ambient_authority())
                .ok()
                .map(|dir| (candidate.to_owned(), dir))
        })
        .ok_or_else(|| anyhow!("no existing ancestor directory for {path}"))?;
    let relative = path
        .strip_prefix(&base)
        .context("derive path relative to existing ancestor")?
        .to_owned();
    Ok((dir, relative))
}

fn ensure_dir(path: &Utf8Path) -> AnyResult<()> {
    let (dir, relative) = derive_dir_and_relative(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    dir.create_dir_all(relative.as_std_path())
        .with_context(|| format!("create directory {path}"))
}

/// Atomically replace `path` with `content`.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error when the parent directory cannot be created or the
/// temporary file cannot be written, synced, or renamed over `path`.
pub fn write_manifest_file(path: &Utf8Path, content: &NinjaContent) -> AnyResult<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    ensure_dir(parent)?;

    let mut tmp = Builder::new()
        .prefix(".dolgen.")
        .suffix(".ninja.tmp")
        .tempfile_in(parent)
        .with_context(|| format!("create temporary file in {parent}"))?;
    {
        let handle = tmp.as_file_mut();
        handle
            .write_all(content.as_str().as_bytes())
            .context("write temporary Ninja file")?;
        handle.flush().context("flush temporary Ninja file")?;
        handle.sync_all().context("sync temporary Ninja file")?;
    }
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("replace {path}"))?;
    info!("Wrote Ninja file to {path}");
    Ok(())
}

fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}

fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if is_broken_pipe(&err) => Ok(()),
        other => other,
    }
}

/// Write `text` to stdout, treating a closed pipe as success.
///
/// # Errors
///
/// Returns an error for any stdout failure other than a broken pipe.
pub fn write_stdout(text: &str) -> AnyResult<()> {
    let mut stdout = io::stdout().lock();
    ignore_broken_pipe(stdout.write_all(text.as_bytes())).context("write to stdout")?;
    ignore_broken_pipe(stdout.flush()).context("flush stdout")?;
    Ok(())
}
