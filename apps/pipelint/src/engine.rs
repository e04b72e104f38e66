//! Rule execution over parsed units.
//!
//! Every rule of the unit's scope runs once, in registration order, against
//! a fresh [`LintResult`]. A failing rule is not isolated: its error is
//! returned as-is and no further rules run for that unit.

use crate::error::RuleError;
use crate::models::unit::ParsedUnit;
use crate::models::LintResult;
use crate::registry::{Rule, RuleRegistry};
use tracing::{debug, warn};

/// Run the registry's rules for the unit's scope.
///
/// Modules run module rules; config files run config rules.
pub fn execute(unit: &ParsedUnit, registry: &RuleRegistry) -> Result<LintResult, RuleError> {
    match unit {
        ParsedUnit::Module(module) => execute_rules(&module.path, module, registry.module_rules()),
        ParsedUnit::Config(config) => execute_rules(&config.path, config, registry.config_rules()),
    }
}

/// Run `rules` in order against `unit`, accumulating into one result.
pub fn execute_rules<U>(
    unit_path: &str,
    unit: &U,
    rules: &[Rule<U>],
) -> Result<LintResult, RuleError> {
    let mut results = LintResult::new(unit_path);
    for rule in rules {
        debug!(rule = rule.name(), unit = unit_path, "running rule");
        results.set_active_rule(Some(rule.name()));
        if let Err(err) = rule.check(unit, &mut results) {
            warn!(rule = rule.name(), unit = unit_path, %err, "rule failed");
            return Err(err);
        }
    }
    results.set_active_rule(None);
    Ok(results)
}
