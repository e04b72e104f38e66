//! Rule registration.
//!
//! A [`RuleRegistry`] is built by the caller (see [`RuleRegistry::builtin`])
//! and handed to the engine. Rules are kept per scope in insertion order,
//! which is also their execution order. The registry is read-only while
//! linting and can be shared across threads.

use crate::checks;
use crate::error::{ConfigurationError, RuleError};
use crate::models::unit::{ConfigFile, Module};
use crate::models::LintResult;
use std::fmt;
use std::sync::Arc;

/// Signature of a rule body over a unit of type `U`.
pub type CheckFn<U> = dyn Fn(&U, &mut LintResult) -> Result<(), RuleError> + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    Module,
    Config,
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleScope::Module => f.write_str("module"),
            RuleScope::Config => f.write_str("config"),
        }
    }
}

/// A named rule over units of type `U`.
pub struct Rule<U> {
    name: String,
    check: Arc<CheckFn<U>>,
}

impl<U> Rule<U> {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&U, &mut LintResult) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, unit: &U, results: &mut LintResult) -> Result<(), RuleError> {
        (self.check)(unit, results)
    }
}

impl<U> Clone for Rule<U> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            check: Arc::clone(&self.check),
        }
    }
}

impl<U> fmt::Debug for Rule<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    module_rules: Vec<Rule<Module>>,
    config_rules: Vec<Rule<ConfigFile>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the label rules followed by the container rules.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        checks::labels::register(&mut registry);
        checks::containers::register(&mut registry);
        registry
    }

    pub fn register_module_rule<F>(&mut self, name: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&Module, &mut LintResult) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        self.module_rules.push(Rule::new(name, check));
        self
    }

    pub fn register_config_rule<F>(&mut self, name: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&ConfigFile, &mut LintResult) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        self.config_rules.push(Rule::new(name, check));
        self
    }

    pub fn module_rules(&self) -> &[Rule<Module>] {
        &self.module_rules
    }

    pub fn config_rules(&self) -> &[Rule<ConfigFile>] {
        &self.config_rules
    }

    /// Rule names with their scope, module rules first.
    pub fn names(&self) -> Vec<(RuleScope, &str)> {
        self.module_rules
            .iter()
            .map(|r| (RuleScope::Module, r.name()))
            .chain(self.config_rules.iter().map(|r| (RuleScope::Config, r.name())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.module_rules.len() + self.config_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of this registry without the named rules. Every name must be
    /// registered.
    pub fn without(&self, disabled: &[String]) -> Result<Self, ConfigurationError> {
        let known = self.names();
        if let Some(unknown) = disabled
            .iter()
            .find(|d| !known.iter().any(|(_, name)| name == d))
        {
            return Err(ConfigurationError::UnknownRule(unknown.clone()));
        }
        let keep = |name: &str| !disabled.iter().any(|d| d == name);
        Ok(Self {
            module_rules: self
                .module_rules
                .iter()
                .filter(|r| keep(r.name()))
                .cloned()
                .collect(),
            config_rules: self
                .config_rules
                .iter()
                .filter(|r| keep(r.name()))
                .cloned()
                .collect(),
        })
    }
}
