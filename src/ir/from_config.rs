//! Configuration-to-IR conversion helpers.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use itertools::Itertools;
use tracing::{debug, info};

use super::{
    discover::discover_sources,
    error::GraphError,
    graph::{BuildEdge, BuildGraph, EdgeKind, SourceFile},
};
use crate::config::{GenConfig, join_slash};
use crate::rules::{BASEDIR_VAR, CFLAGS_VAR, LDFLAGS_VAR, RuleCatalog};

/// Derive the object path for a source: `<build_dir>/<source>` with the
/// final extension replaced by `.o`.
///
/// ```
/// use camino::Utf8Path;
/// use dolgen::ir::object_path;
///
/// let object = object_path(Utf8Path::new("build"), Utf8Path::new("src/sub/b.cpp"));
/// assert_eq!(object, "build/src/sub/b.o");
/// ```
#[must_use]
pub fn object_path(build_dir: &Utf8Path, source: &Utf8Path) -> Utf8PathBuf {
    let object = source.with_extension("o");
    join_slash(build_dir, object.as_str().trim_start_matches('/'))
}

/// Directory an object is written into, as passed to the compiler.
///
/// Edge variables are written verbatim, so a literal `$` is doubled.
fn object_dir(object: &Utf8Path) -> String {
    object
        .parent()
        .map(Utf8Path::as_str)
        .filter(|p| !p.is_empty())
        .unwrap_or(".")
        .replace('$', "$$")
}

impl BuildGraph {
    /// Discover the sources under `project_dir` and build the graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] when discovery fails or the sources do not form
    /// a valid graph; see [`BuildGraph::from_sources`].
    pub fn from_project(project_dir: &Utf8Path, config: &GenConfig) -> Result<Self, GraphError> {
        let sources = discover_sources(project_dir, config)?;
        Self::from_sources(config, &sources)
    }

    /// Build the graph for an already discovered, ordered source list.
    ///
    /// Compile edges and link inputs keep the order of `sources`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoSources`] for an empty list,
    /// [`GraphError::ObjectCollision`] when two sources derive the same object
    /// and [`GraphError::ReservedOutput`] when an object would overwrite the
    /// link or image output.
    pub fn from_sources(config: &GenConfig, sources: &[SourceFile]) -> Result<Self, GraphError> {
        if sources.is_empty() {
            return Err(GraphError::NoSources {
                root: config.source_root.clone(),
                extensions: config.source_extensions.iter().join(", "),
            });
        }

        let rules = RuleCatalog::new(&config.toolchain);
        let link_target = config.link_target();
        let image_target = config.image_target();
        let cflags = config.flags.cflags.render();

        let mut claimed: HashMap<Utf8PathBuf, &Utf8Path> = HashMap::new();
        let mut compile_edges = Vec::with_capacity(sources.len());
        for source in sources {
            let object = object_path(&config.build_dir, &source.path);
            if object == link_target || object == image_target {
                return Err(GraphError::ReservedOutput {
                    object,
                    source_file: source.path.clone(),
                });
            }
            match claimed.entry(object.clone()) {
                Entry::Occupied(first) => {
                    return Err(GraphError::ObjectCollision {
                        object,
                        first: (*first.get()).to_owned(),
                        second: source.path.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(&source.path);
                }
            }
            debug!(source = %source.path, object = %object, "compile edge");
            compile_edges.push(compile_edge(&rules, source, object, &cflags));
        }

        let objects = compile_edges
            .iter()
            .flat_map(|edge| edge.outputs.iter().cloned())
            .collect();
        let link_edge = BuildEdge {
            kind: EdgeKind::Link,
            rule: rules.link.name.clone(),
            inputs: objects,
            outputs: vec![link_target.clone()],
            variables: IndexMap::from([(
                LDFLAGS_VAR.to_owned(),
                config.flags.ldflags.render(),
            )]),
        };
        let convert_edge = BuildEdge {
            kind: EdgeKind::Convert,
            rule: rules.convert.name.clone(),
            inputs: vec![link_target],
            outputs: vec![image_target],
            variables: IndexMap::new(),
        };

        info!(
            sources = sources.len(),
            image = %config.image_target(),
            "constructed build graph"
        );
        Ok(Self {
            rules,
            sources: sources.to_vec(),
            compile_edges,
            link_edge,
            convert_edge,
        })
    }
}

fn compile_edge(
    rules: &RuleCatalog,
    source: &SourceFile,
    object: Utf8PathBuf,
    cflags: &str,
) -> BuildEdge {
    let variables = IndexMap::from([
        (CFLAGS_VAR.to_owned(), cflags.to_owned()),
        (BASEDIR_VAR.to_owned(), object_dir(&object)),
    ]);
    BuildEdge {
        kind: EdgeKind::Compile,
        rule: rules.compile.name.clone(),
        inputs: vec![source.path.clone()],
        outputs: vec![object],
        variables,
    }
}
