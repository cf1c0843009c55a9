//! Manifest emitter contract.
//!
//! Graph construction never produces manifest syntax itself. It drives a
//! [`ManifestEmitter`] with variables, rules, and edges in a fixed order, and
//! the emitter decides how to serialise them. [`crate::ninja_gen::NinjaWriter`]
//! is the production implementation; tests can substitute a recording fake.

use crate::config::GenConfig;
use crate::ir::{BuildEdge, BuildGraph};
use crate::rules::{COMPILER_VAR, CONVERTER_VAR, LINKER_VAR, Rule};

/// Sink for manifest declarations.
pub trait ManifestEmitter {
    /// Value produced once every declaration has been written.
    type Output;
    /// Failure raised by the underlying sink.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Declare a top-level `name = value` binding.
    ///
    /// # Errors
    ///
    /// Returns the sink's error when the declaration cannot be recorded.
    fn declare_variable(&mut self, name: &str, value: &str) -> Result<(), Self::Error>;

    /// Declare a rule with its command, description, depfile and response
    /// file settings.
    ///
    /// # Errors
    ///
    /// Returns the sink's error when the declaration cannot be recorded.
    fn declare_rule(&mut self, rule: &Rule) -> Result<(), Self::Error>;

    /// Declare a build edge with its outputs, rule, inputs and variables.
    ///
    /// # Errors
    ///
    /// Returns the sink's error when the declaration cannot be recorded.
    fn declare_edge(&mut self, edge: &BuildEdge) -> Result<(), Self::Error>;

    /// Visual separator between declaration groups.
    ///
    /// # Errors
    ///
    /// Returns the sink's error when the separator cannot be written.
    fn blank_line(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Finish the manifest and hand back the result.
    ///
    /// # Errors
    ///
    /// Returns the sink's error when the manifest cannot be completed.
    fn finalize(self) -> Result<Self::Output, Self::Error>;
}

/// Name of the top-level variable holding the build directory.
pub const BUILDDIR_VAR: &str = "builddir";
/// Name of the top-level variable holding the output directory.
pub const OUTDIR_VAR: &str = "outdir";
/// Name of the variable declaring the minimum executor version.
pub const REQUIRED_VERSION_VAR: &str = "ninja_required_version";

/// Feed a graph into `emitter` and finalise it.
///
/// Declarations are made in a fixed order: the required version, the
/// directory variables, the toolchain variables, the rules, every compile
/// edge, the link edge, and finally the conversion edge.
///
/// # Errors
///
/// Returns the emitter's error if any declaration or the final flush fails.
pub fn emit_manifest<E: ManifestEmitter>(
    config: &GenConfig,
    graph: &BuildGraph,
    mut emitter: E,
) -> Result<E::Output, E::Error> {
    emitter.declare_variable(REQUIRED_VERSION_VAR, &config.ninja_required_version)?;
    emitter.blank_line()?;

    emitter.declare_variable(BUILDDIR_VAR, config.build_dir.as_str())?;
    emitter.declare_variable(OUTDIR_VAR, config.out_dir.as_str())?;
    emitter.blank_line()?;

    emitter.declare_variable(COMPILER_VAR, &config.toolchain.compiler)?;
    emitter.declare_variable(LINKER_VAR, &config.toolchain.linker)?;
    emitter.declare_variable(CONVERTER_VAR, &config.toolchain.converter)?;
    emitter.blank_line()?;

    for rule in graph.rules.rules() {
        emitter.declare_rule(rule)?;
        emitter.blank_line()?;
    }

    for edge in &graph.compile_edges {
        emitter.declare_edge(edge)?;
    }
    emitter.blank_line()?;
    emitter.declare_edge(&graph.link_edge)?;
    emitter.blank_line()?;
    emitter.declare_edge(&graph.convert_edge)?;

    emitter.finalize()
}
