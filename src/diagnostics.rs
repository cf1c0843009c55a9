//! Diagnostics utilities.
//!
//! Runner errors travel as [`anyhow::Error`] chains. The domain errors inside
//! them derive [`miette::Diagnostic`], so the code and help text can be
//! recovered for display once the chain reaches `main`.

use miette::Diagnostic;

use crate::config::ConfigError;
use crate::ir::GraphError;

/// Domain diagnostics in `err`'s chain, outermost first.
fn diagnostics(err: &anyhow::Error) -> impl Iterator<Item = &dyn Diagnostic> {
    err.chain().filter_map(|cause| {
        cause
            .downcast_ref::<GraphError>()
            .map(|d| d as &dyn Diagnostic)
            .or_else(|| cause.downcast_ref::<ConfigError>().map(|d| d as &dyn Diagnostic))
    })
}

/// Diagnostic code of the first domain error in the chain, if any.
///
/// ```
/// use dolgen::diagnostics::error_code;
/// use dolgen::ir::GraphError;
///
/// let err = anyhow::Error::new(GraphError::SourceRootMissing { path: "src".into() });
/// assert_eq!(error_code(&err).as_deref(), Some("dolgen::ir::source_root_missing"));
/// ```
#[must_use]
pub fn error_code(err: &anyhow::Error) -> Option<String> {
    diagnostics(err)
        .next()
        .and_then(|diag| diag.code().map(|code| code.to_string()))
}

/// Help text of the first domain error in the chain that carries one.
#[must_use]
pub fn help_text(err: &anyhow::Error) -> Option<String> {
    diagnostics(err).find_map(|diag| diag.help().map(|help| help.to_string()))
}
