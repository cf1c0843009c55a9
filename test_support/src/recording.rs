//! A [`ManifestEmitter`] that records declarations instead of rendering them.

use std::convert::Infallible;

use dolgen::emitter::ManifestEmitter;
use dolgen::ir::{BuildEdge, EdgeKind};
use dolgen::rules::Rule;

/// One recorded declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A top-level `name = value` binding.
    Variable {
        /// Variable name.
        name: String,
        /// Bound value.
        value: String,
    },
    /// A rule declaration, by name.
    Rule(String),
    /// A build edge.
    Edge(BuildEdge),
    /// A group separator.
    Blank,
}

/// Records every declaration in call order.
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    calls: Vec<Declaration>,
}

impl RecordingEmitter {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ManifestEmitter for RecordingEmitter {
    type Output = Vec<Declaration>;
    type Error = Infallible;

    fn declare_variable(&mut self, name: &str, value: &str) -> Result<(), Self::Error> {
        self.calls.push(Declaration::Variable {
            name: name.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    fn declare_rule(&mut self, rule: &Rule) -> Result<(), Self::Error> {
        self.calls.push(Declaration::Rule(rule.name.clone()));
        Ok(())
    }

    fn declare_edge(&mut self, edge: &BuildEdge) -> Result<(), Self::Error> {
        self.calls.push(Declaration::Edge(edge.clone()));
        Ok(())
    }

    fn blank_line(&mut self) -> Result<(), Self::Error> {
        self.calls.push(Declaration::Blank);
        Ok(())
    }

    fn finalize(self) -> Result<Self::Output, Self::Error> {
        Ok(self.calls)
    }
}

/// Short label for a declaration, handy for order assertions.
///
/// Variables become their name, rules `rule:<name>`, edges
/// `<kind>:<first output>`, and separators are `None`.
#[must_use]
pub fn label(decl: &Declaration) -> Option<String> {
    match decl {
        Declaration::Variable { name, .. } => Some(name.clone()),
        Declaration::Rule(name) => Some(format!("rule:{name}")),
        Declaration::Edge(edge) => {
            let kind = match edge.kind {
                EdgeKind::Compile => "compile",
                EdgeKind::Link => "link",
                EdgeKind::Convert => "convert",
            };
            let output = edge.primary_output().map(|p| p.as_str()).unwrap_or_default();
            Some(format!("{kind}:{output}"))
        }
        Declaration::Blank => None,
    }
}
