//! Output rendering for lint results.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-unit errors and warnings and a top-level summary.

use crate::models::{LintIssue, LintResult, Summary};
use crate::registry::RuleRegistry;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if use_colors("human") {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

/// Unit path as shown to users: relative to `root` when it lives below it.
pub fn display_path(unit_path: &str, root: &Path) -> String {
    let path = Path::new(unit_path);
    if path.is_absolute() {
        if let Some(rel) = pathdiff::diff_paths(path, root) {
            if !rel.starts_with("..") {
                return rel.to_string_lossy().to_string();
            }
        }
    }
    unit_path.to_string()
}

/// Print lint results in the requested format.
pub fn print_lint(results: &[LintResult], output: &str, root: &Path) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_lint_json(results, root))
                .unwrap_or_else(|_| "{}".to_string())
        ),
        _ => {
            let color = use_colors(output);
            for res in results.iter().filter(|r| !r.is_clean()) {
                let file = display_path(&res.unit_path, root);
                println!("\n{}", render_header(&file, color));
                for w in &res.warnings {
                    println!("{}", render_issue(w, &file, false, color));
                }
                for e in &res.errors {
                    println!("{}", render_issue(e, &file, true, color));
                }
            }
            let s = Summary::of(results);
            let summary = format!(
                "— Summary — errors={} warnings={} units={}",
                s.errors, s.warnings, s.units
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

fn render_header(file: &str, color: bool) -> String {
    if color {
        format!("{} {}", "Unit:".bold(), file.cyan())
    } else {
        format!("Unit: {}", file)
    }
}

fn render_issue(issue: &LintIssue, file: &str, is_error: bool, color: bool) -> String {
    let (icon, sev) = if is_error {
        ("✖", "error")
    } else {
        ("▲", "warn")
    };
    let location = format!("{}:{}", file, issue.line);
    let rule = issue
        .rule
        .as_deref()
        .map(|r| format!(" ❲{}❳", r))
        .unwrap_or_default();
    if !color {
        return format!("  {} ⟦{}⟧ {}{} — {}", icon, sev, location, rule, issue.message);
    }
    let badge = format!("⟦{}⟧", sev);
    let (icon, badge) = if is_error {
        (icon.red().to_string(), badge.red().bold().to_string())
    } else {
        (icon.yellow().to_string(), badge.yellow().bold().to_string())
    };
    format!(
        "  {} {} {}{} — {}",
        icon,
        badge,
        location.bold(),
        rule.bright_black(),
        issue.message
    )
}

/// Print the registered rules with their scope.
pub fn print_rules(registry: &RuleRegistry, output: &str) {
    match output {
        "json" => {
            let items: Vec<_> = registry
                .names()
                .into_iter()
                .map(|(scope, name)| json!({"name": name, "scope": scope.to_string()}))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "rules": items }))
                    .unwrap_or_else(|_| "{}".to_string())
            );
        }
        _ => {
            for (scope, name) in registry.names() {
                println!("{:<24} {}", name, scope);
            }
        }
    }
}

/// Compose lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(results: &[LintResult], root: &Path) -> JsonVal {
    let items: Vec<_> = results
        .iter()
        .map(|r| {
            json!({
                "unit": display_path(&r.unit_path, root),
                "errors": r.errors,
                "warnings": r.warnings,
            })
        })
        .collect();
    json!({"results": items, "summary": Summary::of(results)})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_lint_json_shape() {
        let mut a = LintResult::new("/repo/modules/foo/main.nf");
        a.set_active_rule(Some("must_be_tagged"));
        a.error(3, "docker container 'x/y' must specify a tag");
        a.set_active_rule(None);
        a.warning(1, "process 'FOO' has no labels");
        let b = LintResult::new("conf/base.config");

        let out = compose_lint_json(&[a, b], Path::new("/repo"));
        assert_eq!(out["summary"]["errors"], 1);
        assert_eq!(out["summary"]["warnings"], 1);
        assert_eq!(out["summary"]["units"], 2);
        assert_eq!(out["results"][0]["unit"], "modules/foo/main.nf");
        assert_eq!(out["results"][0]["errors"][0]["line"], 3);
        assert_eq!(out["results"][0]["errors"][0]["rule"], "must_be_tagged");
        assert!(out["results"][0]["warnings"][0].get("rule").is_none());
        assert_eq!(out["results"][1]["unit"], "conf/base.config");
    }

    #[test]
    fn test_display_path_outside_root_is_untouched() {
        assert_eq!(
            display_path("/elsewhere/main.nf", Path::new("/repo")),
            "/elsewhere/main.nf"
        );
        assert_eq!(display_path("main.nf", Path::new("/repo")), "main.nf");
    }

    #[test]
    fn test_header_names_any_unit_kind() {
        assert_eq!(render_header("conf/base.config", false), "Unit: conf/base.config");
        assert_eq!(render_header("main.nf", false), "Unit: main.nf");
    }

    #[test]
    fn test_render_issue_plain() {
        let issue = LintIssue {
            line: 4,
            message: "m".into(),
            rule: Some("no_labels".into()),
        };
        assert_eq!(
            render_issue(&issue, "main.nf", false, false),
            "  ▲ ⟦warn⟧ main.nf:4 ❲no_labels❳ — m"
        );
    }
}
