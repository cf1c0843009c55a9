//! Ninja file generator.
//!
//! [`NinjaWriter`] implements [`ManifestEmitter`] by rendering declarations
//! into an in-memory buffer using Ninja syntax. Paths are escaped, long lines
//! are wrapped with `$` continuations, and nothing touches the filesystem
//! until the finished [`NinjaContent`] is handed back.

use std::fmt::{self, Write};

use itertools::Itertools;
use thiserror::Error;

use crate::config::GenConfig;
use crate::emitter::{ManifestEmitter, emit_manifest};
use crate::ir::{BuildEdge, BuildGraph};
use crate::rules::Rule;

/// Column at which long lines are wrapped.
pub const DEFAULT_WIDTH: usize = 78;

/// Header written at the top of every generated manifest.
pub const GENERATED_HEADER: &str = "Generated by dolgen. Do not edit; re-run dolgen instead.";

/// Errors raised while rendering Ninja syntax.
#[derive(Debug, Error)]
pub enum NinjaGenError {
    /// Writing into the output buffer failed.
    #[error("failed to write Ninja syntax")]
    Write(#[from] fmt::Error),
    /// A value contains a newline, which Ninja cannot represent.
    #[error("{what} contains a newline and cannot be written to a Ninja file")]
    Newline {
        /// Which declaration carried the newline.
        what: String,
    },
}

/// Wrapper around generated Ninja manifest text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NinjaContent(String);

impl NinjaContent {
    /// Store the provided Ninja manifest string.
    #[must_use]
    pub const fn new(content: String) -> Self {
        Self(content)
    }
    /// Borrow the underlying manifest text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// Consume the wrapper returning the owned manifest string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Render a graph as a complete Ninja file, header included.
///
/// # Errors
///
/// Returns [`NinjaGenError::Newline`] when a path or variable contains a
/// newline.
pub fn generate(config: &GenConfig, graph: &BuildGraph) -> Result<NinjaContent, NinjaGenError> {
    let mut writer = NinjaWriter::new();
    writer.comment(GENERATED_HEADER)?;
    writer.blank_line()?;
    emit_manifest(config, graph, writer)
}

/// Escape a path for use in a `build` line.
///
/// ```
/// use dolgen::ninja_gen::escape_path;
///
/// assert_eq!(escape_path("C:/my src/$a.c"), "C$:/my$ src/$$a.c");
/// ```
#[must_use]
pub fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for ch in path.chars() {
        match ch {
            '$' => out.push_str("$$"),
            ' ' => out.push_str("$ "),
            ':' => out.push_str("$:"),
            other => out.push(other),
        }
    }
    out
}

fn reject_newline(value: &str, what: impl FnOnce() -> String) -> Result<(), NinjaGenError> {
    if value.contains(['\n', '\r']) {
        Err(NinjaGenError::Newline { what: what() })
    } else {
        Ok(())
    }
}

/// Number of consecutive `$` bytes immediately before `index`.
fn dollars_before(bytes: &[u8], index: usize) -> usize {
    bytes
        .get(..index)
        .map_or(0, |head| head.iter().rev().take_while(|&&b| b == b'$').count())
}

/// Pick the byte offset of the space to wrap at.
///
/// Prefers the rightmost unescaped space that keeps the line within
/// `available` columns, falling back to the first unescaped space after it.
fn find_break(text: &str, available: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let unescaped = |i: &usize| bytes.get(*i) == Some(&b' ') && dollars_before(bytes, *i) % 2 == 0;
    (0..available.min(bytes.len()))
        .rev()
        .find(unescaped)
        .or_else(|| (available..bytes.len()).find(unescaped))
}

/// Streams Ninja declarations into a string buffer.
#[derive(Debug, Clone)]
pub struct NinjaWriter {
    out: String,
    width: usize,
}

impl Default for NinjaWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl NinjaWriter {
    /// Create a writer wrapping at [`DEFAULT_WIDTH`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_width(DEFAULT_WIDTH)
    }

    /// Create a writer wrapping at `width` columns.
    #[must_use]
    pub const fn with_width(width: usize) -> Self {
        Self {
            out: String::new(),
            width,
        }
    }

    /// Write one `# ` comment line per line of `text`.
    ///
    /// # Errors
    ///
    /// Returns [`NinjaGenError::Write`] if the buffer rejects the write.
    pub fn comment(&mut self, text: &str) -> Result<(), NinjaGenError> {
        for line in text.lines() {
            writeln!(self.out, "# {line}")?;
        }
        Ok(())
    }

    fn line(&mut self, text: &str, indent: usize) -> fmt::Result {
        let mut leading = "  ".repeat(indent);
        let mut rest = text;
        while leading.len() + rest.len() > self.width {
            let available = self.width.saturating_sub(leading.len() + 2);
            let Some(space) = find_break(rest, available) else {
                break;
            };
            let (head, tail) = rest.split_at(space);
            writeln!(self.out, "{leading}{head} $")?;
            rest = tail.get(1..).unwrap_or_default();
            leading = "  ".repeat(indent + 2);
        }
        writeln!(self.out, "{leading}{rest}")
    }

    fn binding(&mut self, key: &str, value: &str, indent: usize) -> Result<(), NinjaGenError> {
        reject_newline(value, || format!("variable `{key}`"))?;
        self.line(&format!("{key} = {value}"), indent)?;
        Ok(())
    }
}

impl ManifestEmitter for NinjaWriter {
    type Output = NinjaContent;
    type Error = NinjaGenError;

    fn declare_variable(&mut self, name: &str, value: &str) -> Result<(), Self::Error> {
        self.binding(name, value, 0)
    }

    fn declare_rule(&mut self, rule: &Rule) -> Result<(), Self::Error> {
        self.line(&format!("rule {}", rule.name), 0)?;
        self.binding("command", &rule.command, 1)?;
        self.binding("description", &rule.description, 1)?;
        if let Some(depfile) = &rule.depfile {
            self.binding("depfile", &depfile.path, 1)?;
        }
        if let Some(rsp) = &rule.rspfile {
            self.binding("rspfile", &rsp.path, 1)?;
            self.binding("rspfile_content", &rsp.content, 1)?;
        }
        if let Some(depfile) = &rule.depfile {
            self.binding("deps", &depfile.format, 1)?;
        }
        Ok(())
    }

    fn declare_edge(&mut self, edge: &BuildEdge) -> Result<(), Self::Error> {
        for path in edge.outputs.iter().chain(&edge.inputs) {
            reject_newline(path.as_str(), || format!("path `{}`", path.as_str().escape_debug()))?;
        }
        let outputs = edge.outputs.iter().map(|p| escape_path(p.as_str())).join(" ");
        let mut header = format!("build {outputs}: {}", edge.rule);
        for input in &edge.inputs {
            header.push(' ');
            header.push_str(&escape_path(input.as_str()));
        }
        self.line(&header, 0)?;
        for (key, value) in &edge.variables {
            self.binding(key, value, 1)?;
        }
        Ok(())
    }

    fn blank_line(&mut self) -> Result<(), Self::Error> {
        writeln!(self.out)?;
        Ok(())
    }

    fn finalize(self) -> Result<Self::Output, Self::Error> {
        Ok(NinjaContent::new(self.out))
    }
}
