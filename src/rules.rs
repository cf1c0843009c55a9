//! Rule catalog.
//!
//! Supplies the three step templates used by the build graph: compiling a
//! source file, linking every object through a response file, and converting
//! the linked executable into a loadable image. Rules are static descriptors;
//! per-edge values such as flags travel as edge variables.

use serde::Serialize;

use crate::config::ToolchainPaths;

/// Name of the variable holding the compiler path.
pub const COMPILER_VAR: &str = "compiler";
/// Name of the variable holding the linker path.
pub const LINKER_VAR: &str = "linker";
/// Name of the variable holding the image converter path.
pub const CONVERTER_VAR: &str = "converter";
/// Edge variable carrying the compile flag set.
pub const CFLAGS_VAR: &str = "cflags";
/// Edge variable carrying the directory an object is written to.
pub const BASEDIR_VAR: &str = "basedir";
/// Edge variable carrying the link flag set.
pub const LDFLAGS_VAR: &str = "ldflags";

/// Compiler-emitted dependency file attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepfileSpec {
    /// Path template of the dependency file.
    pub path: String,
    /// Dependency file dialect understood by the executor.
    pub format: String,
}

/// Response file written by the executor before running a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseFileSpec {
    /// Path template of the response file.
    pub path: String,
    /// Template of the file contents.
    pub content: String,
}

/// A named invocation template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Identifier referenced by build edges.
    pub name: String,
    /// Command template with `$in`, `$out`, and variable references.
    pub command: String,
    /// Progress line shown by the executor.
    pub description: String,
    /// Dependency file produced by the command, if any.
    pub depfile: Option<DepfileSpec>,
    /// Response file consumed by the command, if any.
    pub rspfile: Option<ResponseFileSpec>,
}

/// The three rules of a compile, link, convert pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleCatalog {
    /// Compiles one source file into one object.
    pub compile: Rule,
    /// Links every object into the executable.
    pub link: Rule,
    /// Converts the executable into the loadable image.
    pub convert: Rule,
}

impl RuleCatalog {
    /// Build the catalog for a toolchain.
    ///
    /// Only the converter sub-command influences the templates; program
    /// paths are referenced through manifest variables.
    #[must_use]
    pub fn new(toolchain: &ToolchainPaths) -> Self {
        Self {
            compile: compile_rule(),
            link: link_rule(),
            convert: convert_rule(&toolchain.converter_subcommand),
        }
    }

    /// Rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> [&Rule; 3] {
        [&self.compile, &self.link, &self.convert]
    }
}

fn compile_rule() -> Rule {
    Rule {
        name: "mwcc".to_owned(),
        command: format!("${COMPILER_VAR} ${CFLAGS_VAR} -MMD -c $in -o ${BASEDIR_VAR}"),
        description: "MWCC $out".to_owned(),
        depfile: Some(DepfileSpec {
            path: "$out.d".to_owned(),
            format: "gcc".to_owned(),
        }),
        rspfile: None,
    }
}

fn link_rule() -> Rule {
    Rule {
        name: "mwld".to_owned(),
        command: format!("${LINKER_VAR} ${LDFLAGS_VAR} -o $out @$out.rsp"),
        description: "MWLD $out".to_owned(),
        depfile: None,
        rspfile: Some(ResponseFileSpec {
            path: "$out.rsp".to_owned(),
            content: "$in_newline".to_owned(),
        }),
    }
}

fn convert_rule(subcommand: &str) -> Rule {
    let command = if subcommand.trim().is_empty() {
        format!("${CONVERTER_VAR} $in $out")
    } else {
        format!("${CONVERTER_VAR} {subcommand} $in $out")
    };
    Rule {
        name: "dol".to_owned(),
        command,
        description: "DOL $out".to_owned(),
        depfile: None,
        rspfile: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_rule_requests_gcc_depfile() {
        let catalog = RuleCatalog::new(&ToolchainPaths::default());
        assert_eq!(
            catalog.compile.command,
            "$compiler $cflags -MMD -c $in -o $basedir"
        );
        let depfile = catalog.compile.depfile.as_ref().expect("compile depfile");
        assert_eq!(depfile.path, "$out.d");
        assert_eq!(depfile.format, "gcc");
        assert!(catalog.compile.rspfile.is_none());
    }

    #[test]
    fn link_rule_passes_inputs_through_response_file() {
        let catalog = RuleCatalog::new(&ToolchainPaths::default());
        assert_eq!(catalog.link.command, "$linker $ldflags -o $out @$out.rsp");
        let rsp = catalog.link.rspfile.as_ref().expect("link rspfile");
        assert_eq!(rsp.path, "$out.rsp");
        assert_eq!(rsp.content, "$in_newline");
        assert!(catalog.link.depfile.is_none());
    }

    #[test]
    fn convert_rule_honours_subcommand() {
        let stock = RuleCatalog::new(&ToolchainPaths::default());
        assert_eq!(stock.convert.command, "$converter elf2dol $in $out");

        let bare = RuleCatalog::new(&ToolchainPaths {
            converter_subcommand: String::new(),
            ..ToolchainPaths::default()
        });
        assert_eq!(bare.convert.command, "$converter $in $out");
    }

    #[test]
    fn rule_names_are_distinct_and_ordered() {
        let catalog = RuleCatalog::new(&ToolchainPaths::default());
        let names: Vec<_> = catalog.rules().into_iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["mwcc", "mwld", "dol"]);
    }
}
