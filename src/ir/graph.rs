//! Core IR data types.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Serialize;

use crate::rules::RuleCatalog;

/// One translatable input, addressed relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// `/`-separated path, e.g. `src/sub/b.cpp`.
    pub path: Utf8PathBuf,
    /// Extension group the file was discovered under, without the dot.
    pub extension: String,
}

impl SourceFile {
    /// Describe a source file by path and extension group.
    pub fn new(path: impl Into<Utf8PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extension: extension.into(),
        }
    }
}

/// Stage an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Source to object.
    Compile,
    /// Objects to executable.
    Link,
    /// Executable to loadable image.
    Convert,
}

/// A single build step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildEdge {
    /// Stage of the pipeline.
    pub kind: EdgeKind,
    /// Name of the rule that performs the step.
    pub rule: String,
    /// Explicit inputs in order.
    pub inputs: Vec<Utf8PathBuf>,
    /// Explicit outputs.
    pub outputs: Vec<Utf8PathBuf>,
    /// Edge-scoped variables in declaration order.
    pub variables: IndexMap<String, String>,
}

impl BuildEdge {
    /// The first output, used when naming an edge in logs and errors.
    #[must_use]
    pub fn primary_output(&self) -> Option<&Utf8Path> {
        self.outputs.first().map(Utf8PathBuf::as_path)
    }
}

/// The complete compile, link, convert graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildGraph {
    /// Rules referenced by the edges.
    pub rules: RuleCatalog,
    /// Sources in discovery order.
    pub sources: Vec<SourceFile>,
    /// One edge per source, in discovery order.
    pub compile_edges: Vec<BuildEdge>,
    /// Links every object into the executable.
    pub link_edge: BuildEdge,
    /// Converts the executable into the final image.
    pub convert_edge: BuildEdge,
}

impl BuildGraph {
    /// All edges in emission order: compile edges, then link, then convert.
    pub fn edges(&self) -> impl Iterator<Item = &BuildEdge> {
        self.compile_edges
            .iter()
            .chain([&self.link_edge, &self.convert_edge])
    }

    /// Object paths in link order.
    #[must_use]
    pub fn objects(&self) -> &[Utf8PathBuf] {
        &self.link_edge.inputs
    }
}
