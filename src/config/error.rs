//! Errors raised while loading generator configuration.

// miette/thiserror derive expansion trips `unused_assignments` on some
// toolchains; `#[expect]` cannot be used because the lint is not stable.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Failures while locating, reading, or validating a `dolgen.toml`.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A configuration file was requested explicitly but does not exist.
    #[error("configuration file {path} does not exist")]
    #[diagnostic(
        code(dolgen::config::not_found),
        help("pass an existing file to --config or omit the flag to use defaults")
    )]
    NotFound {
        /// Path that was requested.
        path: Utf8PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file {path}")]
    #[diagnostic(code(dolgen::config::read))]
    Read {
        /// Path that was being read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for this schema.
    #[error("failed to parse configuration from {origin}")]
    #[diagnostic(
        code(dolgen::config::parse),
        help("check key names and value types against the documented schema")
    )]
    Parse {
        /// File path or other description of where the text came from.
        origin: String,
        /// Parser error with line and column information.
        #[source]
        source: Box<toml::de::Error>,
    },

    /// The configuration parsed but describes an unusable layout.
    #[error("invalid configuration: {reason}")]
    #[diagnostic(code(dolgen::config::invalid))]
    Invalid {
        /// Which constraint was violated.
        reason: String,
    },
}
