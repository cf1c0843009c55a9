//! Intermediate Representation structures.
//!
//! This module defines the build graph produced from a source tree and a
//! [`crate::config::GenConfig`]. The graph is a fixed three-stage DAG: one
//! compile edge per source feeding a single link edge, which feeds a single
//! image-conversion edge. It carries no manifest syntax; see
//! [`crate::emitter`] for how it is written out.
//!
//! # Examples
//!
//! ```
//! use dolgen::config::GenConfig;
//! use dolgen::ir::{BuildGraph, SourceFile};
//!
//! let config = GenConfig::default();
//! let sources = vec![SourceFile::new("src/a.c", "c"), SourceFile::new("src/sub/b.cpp", "cpp")];
//! let graph = BuildGraph::from_sources(&config, &sources).expect("graph");
//! assert_eq!(graph.link_edge.inputs, ["build/src/a.o", "build/src/sub/b.o"]);
//! assert_eq!(graph.convert_edge.outputs, ["out/main.dol"]);
//! ```

mod discover;
mod error;
mod from_config;
mod graph;

pub use discover::discover_sources;
pub use error::GraphError;
pub use from_config::object_path;
pub use graph::{BuildEdge, BuildGraph, EdgeKind, SourceFile};
