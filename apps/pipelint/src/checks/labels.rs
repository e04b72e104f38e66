//! Process label rules.
//!
//! Every process is expected to carry exactly one standard resource label.
//! All rules report at the process line except `alphanumerics`, which points
//! at the offending label.

use crate::error::RuleError;
use crate::models::unit::Module;
use crate::models::LintResult;
use crate::registry::RuleRegistry;

pub const STANDARD_LABELS: [&str; 6] = [
    "process_single",
    "process_low",
    "process_medium",
    "process_high",
    "process_long",
    "process_high_memory",
];

pub fn is_standard(label: &str) -> bool {
    STANDARD_LABELS.contains(&label)
}

pub fn register(registry: &mut RuleRegistry) {
    registry
        .register_module_rule("conflicting_labels", conflicting_labels)
        .register_module_rule("no_standard_label", no_standard_label)
        .register_module_rule("non_standard_label", non_standard_label)
        .register_module_rule("duplicate_labels", duplicate_labels)
        .register_module_rule("no_labels", no_labels)
        .register_module_rule("alphanumerics", alphanumerics);
}

/// `['a', 'b']`, quoting each value the way a Python list repr does.
fn quoted_list(values: &[&str]) -> String {
    let items: Vec<String> = values.iter().map(|v| quoted(v)).collect();
    format!("[{}]", items.join(", "))
}

/// Single quotes unless the value holds `'` and no `"`.
fn quoted(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(quote);
    out
}

pub fn conflicting_labels(module: &Module, results: &mut LintResult) -> Result<(), RuleError> {
    for process in &module.processes {
        let standard: Vec<&str> = process
            .labels()
            .iter()
            .map(|l| l.value)
            .filter(|v| is_standard(v))
            .collect();
        if standard.len() > 1 {
            results.warning(
                process.line,
                format!(
                    "process '{}' has conflicting labels: {}",
                    process.name,
                    quoted_list(&standard)
                ),
            );
        }
    }
    Ok(())
}

pub fn no_standard_label(module: &Module, results: &mut LintResult) -> Result<(), RuleError> {
    for process in &module.processes {
        if !process.labels().iter().any(|l| is_standard(l.value)) {
            results.warning(
                process.line,
                format!("process '{}' has no standard label", process.name),
            );
        }
    }
    Ok(())
}

pub fn non_standard_label(module: &Module, results: &mut LintResult) -> Result<(), RuleError> {
    for process in &module.processes {
        let others: Vec<&str> = process
            .labels()
            .iter()
            .map(|l| l.value)
            .filter(|v| !is_standard(v))
            .collect();
        if !others.is_empty() {
            results.warning(
                process.line,
                format!(
                    "process '{}' has non-standard labels: {}",
                    process.name,
                    quoted_list(&others)
                ),
            );
        }
    }
    Ok(())
}

pub fn duplicate_labels(module: &Module, results: &mut LintResult) -> Result<(), RuleError> {
    for process in &module.processes {
        // first-occurrence order
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for label in process.labels() {
            match counts.iter_mut().find(|(value, _)| *value == label.value) {
                Some((_, n)) => *n += 1,
                None => counts.push((label.value, 1)),
            }
        }
        for (value, count) in counts.into_iter().filter(|(_, n)| *n > 1) {
            results.warning(
                process.line,
                format!(
                    "process '{}' has duplicate label '{}' ({} times)",
                    process.name, value, count
                ),
            );
        }
    }
    Ok(())
}

pub fn no_labels(module: &Module, results: &mut LintResult) -> Result<(), RuleError> {
    for process in &module.processes {
        if process.labels().is_empty() {
            results.warning(
                process.line,
                format!("process '{}' has no labels", process.name),
            );
        }
    }
    Ok(())
}

pub fn alphanumerics(module: &Module, results: &mut LintResult) -> Result<(), RuleError> {
    for process in &module.processes {
        for label in process.labels() {
            if label
                .value
                .chars()
                .any(|c| !(c.is_alphanumeric() || c == '_'))
            {
                results.warning(
                    label.line,
                    format!(
                        "process label '{}' contains non-alphanumeric characters (only letters, numbers and underscores recommended)",
                        label.value
                    ),
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::execute_rules;
    use crate::models::directive::{Directive, DirectiveValue, LabelDirective};
    use crate::models::unit::Process;

    fn process(labels: &[(&str, usize)]) -> Process {
        Process {
            name: "FOO".into(),
            line: 10,
            directives: labels
                .iter()
                .map(|(value, line)| Directive {
                    line: *line,
                    value: DirectiveValue::Label(LabelDirective {
                        value: value.to_string(),
                    }),
                })
                .collect(),
        }
    }

    fn lint(processes: Vec<Process>) -> LintResult {
        let module = Module {
            path: "main.nf".into(),
            dsl_version: 2,
            processes,
        };
        let reg = RuleRegistry::builtin();
        execute_rules(&module.path, &module, reg.module_rules()).unwrap()
    }

    fn messages(res: &LintResult) -> Vec<&str> {
        res.warnings.iter().map(|w| w.message.as_str()).collect()
    }

    #[test]
    fn test_single_standard_label_is_clean() {
        let res = lint(vec![process(&[("process_single", 11)])]);
        assert!(res.is_clean(), "{:?}", res);
    }

    #[test]
    fn test_zero_labels() {
        let res = lint(vec![process(&[])]);
        assert_eq!(res.warnings.len(), 2);
        let msgs = messages(&res);
        assert!(msgs.contains(&"process 'FOO' has no labels"));
        assert!(msgs.contains(&"process 'FOO' has no standard label"));
        assert!(res.warnings.iter().all(|w| w.line == 10));
    }

    #[test]
    fn test_duplicated_standard_label() {
        let res = lint(vec![process(&[
            ("process_single", 11),
            ("process_single", 12),
        ])]);
        assert_eq!(
            messages(&res),
            vec![
                "process 'FOO' has conflicting labels: ['process_single', 'process_single']",
                "process 'FOO' has duplicate label 'process_single' (2 times)",
            ]
        );
    }

    #[test]
    fn test_non_alphanumeric_label() {
        let res = lint(vec![process(&[
            ("process_low", 11),
            ("label@123", 12),
        ])]);
        assert_eq!(res.warnings.len(), 2);
        assert_eq!(
            res.warnings[0].message,
            "process 'FOO' has non-standard labels: ['label@123']"
        );
        assert_eq!(res.warnings[0].line, 10);
        assert!(res.warnings[1]
            .message
            .contains("contains non-alphanumeric characters"));
        assert_eq!(res.warnings[1].line, 12);
        assert_eq!(res.warnings[1].rule.as_deref(), Some("alphanumerics"));
    }

    #[test]
    fn test_conflicting_lists_in_declaration_order() {
        let res = lint(vec![process(&[
            ("process_high", 11),
            ("gpu", 12),
            ("process_low", 13),
        ])]);
        assert_eq!(
            messages(&res),
            vec![
                "process 'FOO' has conflicting labels: ['process_high', 'process_low']",
                "process 'FOO' has non-standard labels: ['gpu']",
            ]
        );
    }

    #[test]
    fn test_duplicates_reported_in_first_occurrence_order() {
        let res = lint(vec![process(&[
            ("zeta", 11),
            ("process_medium", 12),
            ("alpha", 13),
            ("alpha", 14),
            ("zeta", 15),
        ])]);
        let dups: Vec<_> = messages(&res)
            .into_iter()
            .filter(|m| m.contains("duplicate"))
            .collect();
        assert_eq!(
            dups,
            vec![
                "process 'FOO' has duplicate label 'zeta' (2 times)",
                "process 'FOO' has duplicate label 'alpha' (2 times)",
            ]
        );
    }

    #[test]
    fn test_label_lists_quote_like_python_repr() {
        assert_eq!(quoted_list(&["gpu", "big"]), "['gpu', 'big']");
        assert_eq!(quoted_list(&["it's"]), r#"["it's"]"#);
        assert_eq!(quoted_list(&[r#"a'b"c"#]), r#"['a\'b"c']"#);
        assert_eq!(quoted_list(&[r"back\slash"]), r"['back\\slash']");

        let res = lint(vec![process(&[("process_low", 11), ("don't", 12)])]);
        assert_eq!(
            res.warnings[0].message,
            r#"process 'FOO' has non-standard labels: ["don't"]"#
        );
    }

    #[test]
    fn test_each_process_is_checked() {
        let mut ok = process(&[("process_single", 2)]);
        ok.name = "OK".into();
        ok.line = 1;
        let res = lint(vec![ok, process(&[])]);
        assert_eq!(res.warnings.len(), 2);
        assert!(res.warnings.iter().all(|w| w.message.contains("'FOO'")));
    }
}
