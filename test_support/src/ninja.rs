//! Helpers for working with the system `ninja` binary in integration tests.

use std::path::Path;
use std::process::{Command, ExitStatus, Output};
use thiserror::Error;

/// Errors that can occur when preparing Ninja-backed integration tests.
#[derive(Error, Debug)]
pub enum NinjaProbeError {
    /// The `ninja --version` probe failed to spawn, most likely because Ninja
    /// is not present in `PATH`.
    #[error("failed to spawn `ninja --version`: {0}")]
    ProbeSpawn(#[source] std::io::Error),
    /// `ninja --version` executed but returned a non-success status.
    #[error("`ninja --version` returned non-success status: {0}")]
    ProbeFailed(ExitStatus),
}

/// Check that Ninja is on `PATH`. Callers should skip their scenario when
/// this returns `Err`.
///
/// # Errors
///
/// Returns [`NinjaProbeError`] when Ninja cannot be run.
pub fn probe_ninja() -> Result<(), NinjaProbeError> {
    let output = Command::new("ninja")
        .arg("--version")
        .output()
        .map_err(NinjaProbeError::ProbeSpawn)?;

    if !output.status.success() {
        return Err(NinjaProbeError::ProbeFailed(output.status));
    }
    Ok(())
}

/// Run `ninja -n` in `dir`, loading and planning the manifest without
/// executing any command.
///
/// # Errors
///
/// Returns the spawn error if Ninja cannot be started.
pub fn dry_run(dir: &Path) -> std::io::Result<Output> {
    Command::new("ninja").arg("-n").current_dir(dir).output()
}
