//! Container directive rules.
//!
//! Each rule walks every name of every `container` directive; ternary
//! directives contribute both branches. Diagnostics point at the directive
//! line.

use crate::container::{classify, tag_errors};
use crate::error::RuleError;
use crate::models::unit::Module;
use crate::models::LintResult;
use crate::registry::RuleRegistry;

pub fn register(registry: &mut RuleRegistry) {
    registry
        .register_module_rule("container_with_space", container_with_space)
        .register_module_rule("multiple_containers", multiple_containers)
        .register_module_rule("must_be_tagged", must_be_tagged);
}

/// Every `(line, name)` of every container directive in the module.
fn container_names(module: &Module) -> impl Iterator<Item = (usize, &str)> {
    module.processes.iter().flat_map(|process| {
        process
            .containers()
            .into_iter()
            .flat_map(|c| c.names().into_iter().map(move |name| (c.line, name)))
    })
}

pub fn container_with_space(module: &Module, results: &mut LintResult) -> Result<(), RuleError> {
    for (line, name) in container_names(module) {
        if name.contains(' ') {
            results.error(
                line,
                format!("container name '{}' contains spaces, which is not allowed", name),
            );
        }
    }
    Ok(())
}

/// Literal check on a single name; ternary branches are separate names and
/// never trigger it together.
pub fn multiple_containers(module: &Module, results: &mut LintResult) -> Result<(), RuleError> {
    for (line, name) in container_names(module) {
        if name.contains("biocontainers/")
            && (name.contains("https://containers") || name.contains("https://depot"))
        {
            results.warning(
                line,
                "Docker and Singularity containers specified on the same line",
            );
        }
    }
    Ok(())
}

pub fn must_be_tagged(module: &Module, results: &mut LintResult) -> Result<(), RuleError> {
    for (line, name) in container_names(module) {
        let kind = match classify(name) {
            Ok(kind) => kind,
            Err(err) => {
                results.error(line, err.to_string());
                continue;
            }
        };
        for err in tag_errors(name, kind) {
            results.error(line, err.to_string());
        }
    }
    Ok(())
}
