//! Shared data models: parsed units, directives, and lint output structs.

pub mod directive;
pub mod unit;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single diagnostic with its source line.
pub struct LintIssue {
    pub line: usize,
    pub message: String,
    /// Name of the rule that reported the issue, when run by the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Diagnostics for one unit from one run.
///
/// Errors and warnings are kept as two separate sequences, each in the
/// order rules appended them.
pub struct LintResult {
    pub unit_path: String,
    pub errors: Vec<LintIssue>,
    pub warnings: Vec<LintIssue>,
    #[serde(skip)]
    active_rule: Option<String>,
}

impl LintResult {
    pub fn new(unit_path: impl Into<String>) -> Self {
        Self {
            unit_path: unit_path.into(),
            errors: Vec::new(),
            warnings: Vec::new(),
            active_rule: None,
        }
    }

    pub fn error(&mut self, line: usize, message: impl Into<String>) {
        let issue = self.issue(line, message.into());
        self.errors.push(issue);
    }

    pub fn warning(&mut self, line: usize, message: impl Into<String>) {
        let issue = self.issue(line, message.into());
        self.warnings.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub(crate) fn set_active_rule(&mut self, rule: Option<&str>) {
        self.active_rule = rule.map(str::to_string);
    }

    fn issue(&self, line: usize, message: String) -> LintIssue {
        LintIssue {
            line,
            message,
            rule: self.active_rule.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
/// Aggregated lint summary used by printers.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub units: usize,
}

impl Summary {
    pub fn of(results: &[LintResult]) -> Self {
        Summary {
            errors: results.iter().map(|r| r.errors.len()).sum(),
            warnings: results.iter().map(|r| r.warnings.len()).sum(),
            units: results.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issues_append_in_order_per_severity() {
        let mut res = LintResult::new("main.nf");
        res.warning(3, "w1");
        res.error(1, "e1");
        res.warning(2, "w2");
        res.error(9, "e2");
        let w: Vec<_> = res.warnings.iter().map(|i| i.message.as_str()).collect();
        let e: Vec<_> = res.errors.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(w, vec!["w1", "w2"]);
        assert_eq!(e, vec!["e1", "e2"]);
        assert!(res.has_errors());
    }

    #[test]
    fn test_active_rule_is_stamped_on_issues() {
        let mut res = LintResult::new("main.nf");
        res.set_active_rule(Some("no_labels"));
        res.warning(1, "x");
        res.set_active_rule(None);
        res.warning(2, "y");
        assert_eq!(res.warnings[0].rule.as_deref(), Some("no_labels"));
        assert_eq!(res.warnings[1].rule, None);
    }

    #[test]
    fn test_summary_counts() {
        let mut a = LintResult::new("a.nf");
        a.error(1, "e");
        a.warning(1, "w");
        let mut b = LintResult::new("b.nf");
        b.warning(2, "w");
        let s = Summary::of(&[a, b]);
        assert_eq!(
            s,
            Summary {
                errors: 1,
                warnings: 2,
                units: 2
            }
        );
    }
}
