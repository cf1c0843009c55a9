//! Errors raised while discovering sources and constructing the graph.

// FIXME(rust-lang/rust#130021): miette/thiserror derives trip
// `unused_assignments` on some toolchains.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use std::path::PathBuf;

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Configuration errors that abort graph construction.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    /// The configured source root does not exist.
    #[error("source root {path} does not exist")]
    #[diagnostic(
        code(dolgen::ir::source_root_missing),
        help("create the directory or set `source_root` in dolgen.toml")
    )]
    SourceRootMissing {
        /// Resolved source root.
        path: Utf8PathBuf,
    },

    /// The source root exists but cannot be opened as a directory.
    #[error("source root {path} cannot be opened")]
    #[diagnostic(code(dolgen::ir::source_root_unreadable))]
    SourceRootUnreadable {
        /// Resolved source root.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A glob pattern could not be compiled.
    #[error("invalid source pattern `{pattern}`")]
    #[diagnostic(code(dolgen::ir::invalid_pattern))]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Parser failure.
        #[source]
        source: glob::PatternError,
    },

    /// A directory below the source root could not be scanned.
    #[error("failed to scan sources for `{pattern}`")]
    #[diagnostic(code(dolgen::ir::discovery))]
    Discovery {
        /// Pattern being expanded.
        pattern: String,
        /// Traversal failure.
        #[source]
        source: glob::GlobError,
    },

    /// A matched entry could not be inspected.
    #[error("failed to inspect {path}")]
    #[diagnostic(code(dolgen::ir::metadata))]
    Metadata {
        /// Entry being inspected.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A matched path is not valid UTF-8.
    #[error("source path {} is not valid UTF-8", .path.display())]
    #[diagnostic(code(dolgen::ir::non_utf8_path))]
    NonUtf8Path {
        /// Offending path.
        path: PathBuf,
    },

    /// Two sources derive the same object path.
    #[error("{first} and {second} both compile to {object}")]
    #[diagnostic(
        code(dolgen::ir::object_collision),
        help("rename one of the sources; objects are named after the source stem")
    )]
    ObjectCollision {
        /// Shared object path.
        object: Utf8PathBuf,
        /// Source that claimed the object first.
        first: Utf8PathBuf,
        /// Source that collided with it.
        second: Utf8PathBuf,
    },

    /// A derived object would overwrite the link or image output.
    #[error("{source_file} compiles to {object}, which is reserved for a pipeline output")]
    #[diagnostic(code(dolgen::ir::reserved_output))]
    ReservedOutput {
        /// Derived object path.
        object: Utf8PathBuf,
        /// Source that derived it.
        source_file: Utf8PathBuf,
    },

    /// No sources were found, which would link an empty image.
    #[error("no sources with extensions [{extensions}] found under {root}")]
    #[diagnostic(
        code(dolgen::ir::no_sources),
        help("add sources or adjust `source_root` and `source_extensions`")
    )]
    NoSources {
        /// Source root that was scanned.
        root: Utf8PathBuf,
        /// Comma-separated extension list.
        extensions: String,
    },
}
