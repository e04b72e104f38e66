//! Parsed units handed over by the pipeline parser.
//!
//! A unit is either a module (`.nf`) holding processes or a config file
//! holding process scopes. Units are read-only for the whole lint run.

use crate::error::ConfigurationError;
use crate::models::directive::{ContainerDirective, Directive, DirectiveKind, DirectiveValue};
use serde::{Deserialize, Serialize};

fn default_dsl_version() -> u32 {
    2
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "unit", rename_all = "lowercase")]
/// A module or config file AST.
pub enum ParsedUnit {
    Module(Module),
    Config(ConfigFile),
}

impl ParsedUnit {
    pub fn path(&self) -> &str {
        match self {
            ParsedUnit::Module(m) => &m.path,
            ParsedUnit::Config(c) => &c.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Module {
    pub path: String,
    #[serde(default = "default_dsl_version")]
    pub dsl_version: u32,
    #[serde(default)]
    pub processes: Vec<Process>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Process {
    pub name: String,
    pub line: usize,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A `label` directive value with the line of its directive.
pub struct Label<'a> {
    pub value: &'a str,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A `container` directive with the line of its directive.
pub struct Container<'a> {
    pub directive: &'a ContainerDirective,
    pub line: usize,
}

impl<'a> Container<'a> {
    pub fn names(&self) -> Vec<&'a str> {
        self.directive.names()
    }
}

impl Process {
    /// Label directives in declaration order.
    pub fn labels(&self) -> Vec<Label<'_>> {
        self.directives
            .iter()
            .filter_map(|d| match &d.value {
                DirectiveValue::Label(label) => Some(Label {
                    value: &label.value,
                    line: d.line,
                }),
                _ => None,
            })
            .collect()
    }

    /// Container directives in declaration order.
    pub fn containers(&self) -> Vec<Container<'_>> {
        self.directives
            .iter()
            .filter_map(|d| match &d.value {
                DirectiveValue::Container(directive) => Some(Container {
                    directive,
                    line: d.line,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn directives_of(&self, kind: DirectiveKind) -> Vec<&Directive> {
        self.directives.iter().filter(|d| d.kind() == kind).collect()
    }

    /// Look up directives by their source name, e.g. `"cpus"` or `"publishDir"`.
    ///
    /// Fails with [`ConfigurationError::UnknownDirectiveKind`] when the name
    /// is not a recognized directive.
    pub fn get_directives(&self, kind: &str) -> Result<Vec<&Directive>, ConfigurationError> {
        let kind: DirectiveKind = kind.parse()?;
        Ok(self.directives_of(kind))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConfigFile {
    pub path: String,
    #[serde(default)]
    pub process_scopes: Vec<ProcessScope>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// A top-level `process { ... }` block.
pub struct ProcessScope {
    pub line: usize,
    #[serde(default)]
    pub directives: Vec<ConfigDirective>,
    #[serde(default)]
    pub named_scopes: Vec<NamedScope>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// A `withName:` / `withLabel:` selector block inside a process scope.
pub struct NamedScope {
    pub line: usize,
    pub name: String,
    #[serde(default)]
    pub directives: Vec<ConfigDirective>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// A directive assignment in a config scope. Holds either named options
/// (map syntax) or a plain value, never both.
pub struct ConfigDirective {
    pub line: usize,
    pub name: String,
    #[serde(default)]
    pub options: Vec<NamedOption>,
    #[serde(default)]
    pub value: ConfigValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NamedOption {
    pub line: usize,
    pub name: String,
    #[serde(default)]
    pub value: ConfigValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ConfigValue {
    /// `params.*` names referenced by the expression.
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub in_closure: bool,
}

impl ConfigFile {
    /// All directives of every process scope and named scope, in file order
    /// per scope.
    pub fn all_directives(&self) -> impl Iterator<Item = &ConfigDirective> {
        self.process_scopes.iter().flat_map(|scope| {
            scope
                .directives
                .iter()
                .chain(scope.named_scopes.iter().flat_map(|n| n.directives.iter()))
        })
    }
}
