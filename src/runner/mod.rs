//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! resolves the project directory and configuration, builds the graph, and
//! either persists the manifest or lists the discovered sources.

mod file_io;

pub use file_io::{is_stdout_path, write_manifest_file, write_stdout};

use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use crate::cli::{Cli, Commands};
use crate::config::GenConfig;
use crate::ir::BuildGraph;
use crate::ninja_gen::{self, NinjaContent};

/// Default manifest written by `generate`.
pub const DEFAULT_MANIFEST: &str = "build.ninja";

/// Execute the parsed [`Cli`] command.
///
/// # Errors
///
/// Returns an error if configuration, discovery, graph construction, or
/// writing the output fails.
pub fn run(cli: &Cli) -> Result<()> {
    let project = resolve_project_dir(cli)?;
    let config = load_config(cli, &project)?;

    let command = cli.command.clone().unwrap_or_else(Commands::default_generate);
    match command {
        Commands::Generate { file } => {
            let ninja = generate_ninja(&project, &config)?;
            if is_stdout_path(&file) {
                write_stdout(ninja.as_str())
            } else {
                let output = resolve_in_project(cli, &file);
                let output = utf8(output.as_ref())?;
                write_manifest_file(&output, &ninja)
            }
        }
        Commands::Sources => {
            let graph = build_graph(&project, &config)?;
            write_stdout(&sources_listing(&graph))
        }
    }
}

/// Discover sources under `project` and build the graph.
///
/// # Errors
///
/// Returns an error when discovery or graph validation fails.
pub fn build_graph(project: &Utf8Path, config: &GenConfig) -> Result<BuildGraph> {
    let graph = BuildGraph::from_project(project, config)
        .with_context(|| format!("building graph for {project}"))?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        let json = serde_json::to_string_pretty(&graph).context("serialising build graph")?;
        debug!("Graph:\n{json}");
    }
    Ok(graph)
}

/// Build the graph for `project` and render it as Ninja text.
///
/// # Errors
///
/// Returns an error when the graph cannot be built or rendered.
pub fn generate_ninja(project: &Utf8Path, config: &GenConfig) -> Result<NinjaContent> {
    let graph = build_graph(project, config)?;
    let ninja = ninja_gen::generate(config, &graph).context("generating Ninja manifest")?;
    info!(
        edges = graph.edges().count(),
        bytes = ninja.as_str().len(),
        "rendered Ninja manifest"
    );
    Ok(ninja)
}

/// One `source -> object` line per compile edge, in manifest order.
#[must_use]
pub fn sources_listing(graph: &BuildGraph) -> String {
    graph
        .compile_edges
        .iter()
        .filter_map(|edge| {
            let source = edge.inputs.first()?;
            let object = edge.primary_output()?;
            Some(format!("{source} -> {object}\n"))
        })
        .collect()
}

fn resolve_project_dir(cli: &Cli) -> Result<Utf8PathBuf> {
    let dir = cli
        .directory
        .as_deref()
        .unwrap_or_else(|| Path::new("."));
    utf8(dir).context("resolving project directory")
}

fn load_config(cli: &Cli, project: &Utf8Path) -> Result<GenConfig> {
    let explicit = cli
        .config
        .as_deref()
        .map(|path| utf8(resolve_in_project(cli, path).as_ref()))
        .transpose()?;
    GenConfig::discover(project, explicit.as_deref())
        .with_context(|| format!("loading configuration for {project}"))
}

/// Resolve a command-line path relative to the `-C` directory.
fn resolve_in_project<'a>(cli: &Cli, path: &'a Path) -> Cow<'a, Path> {
    if path.is_relative() {
        cli.directory
            .as_ref()
            .map_or_else(|| Cow::Borrowed(path), |dir| Cow::Owned(dir.join(path)))
    } else {
        Cow::Borrowed(path)
    }
}

fn utf8(path: &Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|p| anyhow!("path {} is not valid UTF-8", p.display()))
}

#[cfg(test)]
mod tests;
