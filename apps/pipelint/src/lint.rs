//! Lint runner over serialized units on disk.
//!
//! Units are JSON documents written by the pipeline parser. Files matched by
//! the configured glob patterns are loaded and linted in parallel; results
//! come back in discovery order. The first unreadable unit or failing rule
//! aborts the run.

use crate::engine::execute;
use crate::error::LoadError;
use crate::models::unit::ParsedUnit;
use crate::models::LintResult;
use crate::registry::RuleRegistry;
use glob::glob;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Files under `root` matching any of `patterns`, sorted and deduplicated.
pub fn discover(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, LoadError> {
    let mut targets: BTreeSet<PathBuf> = BTreeSet::new();
    for pat in patterns {
        let pattern = root.join(pat).to_string_lossy().to_string();
        let entries = glob(&pattern).map_err(|source| LoadError::Pattern {
            pattern: pat.clone(),
            source,
        })?;
        for path in entries.flatten() {
            if path.is_file() {
                targets.insert(path);
            }
        }
    }
    debug!(count = targets.len(), "discovered units");
    Ok(targets.into_iter().collect())
}

pub fn load_unit(path: &Path) -> Result<ParsedUnit, LoadError> {
    let data = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Lint already-loaded units, one result per unit in input order.
///
/// Units run in parallel; when several fail, the error of the earliest
/// unit in input order is returned.
pub fn lint_units(
    units: &[ParsedUnit],
    registry: &RuleRegistry,
) -> Result<Vec<LintResult>, LoadError> {
    let outcomes: Vec<Result<LintResult, LoadError>> = units
        .par_iter()
        .map(|unit| {
            execute(unit, registry).map_err(|source| LoadError::Rule {
                unit: unit.path().to_string(),
                source,
            })
        })
        .collect();
    outcomes.into_iter().collect()
}

/// Discover, load, and lint every unit under `root`.
pub fn run_lint(
    root: &Path,
    patterns: &[String],
    registry: &RuleRegistry,
) -> Result<Vec<LintResult>, LoadError> {
    let targets = discover(root, patterns)?;
    info!(units = targets.len(), rules = registry.len(), "linting");
    let loaded: Vec<Result<ParsedUnit, LoadError>> =
        targets.par_iter().map(|path| load_unit(path)).collect();
    let units = loaded.into_iter().collect::<Result<Vec<_>, _>>()?;
    lint_units(&units, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use serde_json::json;
    use tempfile::tempdir;

    fn write_json(path: &Path, value: serde_json::Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }

    fn module_json(path: &str, container: &str) -> serde_json::Value {
        json!({
            "unit": "module",
            "path": path,
            "processes": [{
                "name": "FASTQC",
                "line": 1,
                "directives": [
                    {"kind": "label", "line": 2, "value": "process_single"},
                    {"kind": "container", "line": 3, "format": "simple", "simple_name": container}
                ]
            }]
        })
    }

    fn patterns() -> Vec<String> {
        vec!["**/*.nf.json".into(), "**/*.config.json".into()]
    }

    #[test]
    fn test_run_lint_over_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_json(
            &root.join("modules/a/main.nf.json"),
            module_json("modules/a/main.nf", "biocontainers/fastqc:0.11.9"),
        );
        write_json(
            &root.join("modules/b/main.nf.json"),
            module_json("modules/b/main.nf", "ubuntu latest"),
        );
        write_json(
            &root.join("conf/base.config.json"),
            json!({"unit": "config", "path": "conf/base.config", "process_scopes": []}),
        );
        fs::write(root.join("README.md"), "ignored").unwrap();

        let results = run_lint(root, &patterns(), &RuleRegistry::builtin()).unwrap();
        let paths: Vec<_> = results.iter().map(|r| r.unit_path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["conf/base.config", "modules/a/main.nf", "modules/b/main.nf"]
        );
        assert!(results[0].is_clean());
        assert!(results[1].is_clean());
        assert_eq!(results[2].errors.len(), 2);
    }

    #[test]
    fn test_overlapping_patterns_do_not_duplicate_units() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_json(
            &root.join("main.nf.json"),
            module_json("main.nf", "ubuntu:22.04"),
        );
        let pats = vec!["*.nf.json".to_string(), "**/*.json".to_string()];
        let found = discover(root, &pats).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_invalid_unit_is_a_load_error() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_json(
            &root.join("bad.nf.json"),
            json!({"unit": "module", "path": "bad.nf", "processes": [{
                "name": "X", "line": 1,
                "directives": [{"kind": "container", "line": 2, "format": "weird"}]
            }]}),
        );
        let err = run_lint(root, &patterns(), &RuleRegistry::builtin()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_bad_pattern() {
        let dir = tempdir().unwrap();
        let err = discover(dir.path(), &["[".to_string()]).unwrap_err();
        assert!(matches!(err, LoadError::Pattern { .. }));
    }

    #[test]
    fn test_first_failing_unit_in_discovery_order_is_reported() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for name in ["a", "b", "c", "d"] {
            write_json(
                &root.join(format!("{}.nf.json", name)),
                module_json(&format!("{}.nf", name), "ubuntu:22.04"),
            );
        }
        let mut reg = RuleRegistry::new();
        reg.register_module_rule("explode", |module, _| {
            if module.path == "a.nf" {
                Ok(())
            } else {
                Err(RuleError::failed(format!("boom in {}", module.path)))
            }
        });
        for _ in 0..20 {
            let err = run_lint(root, &patterns(), &reg).unwrap_err();
            assert_eq!(err.to_string(), "rule failed on b.nf: boom in b.nf");
        }
    }

    #[test]
    fn test_first_unparseable_unit_in_discovery_order_is_reported() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("x.nf.json"), "{").unwrap();
        fs::write(root.join("y.nf.json"), "[]").unwrap();
        for _ in 0..20 {
            match run_lint(root, &patterns(), &RuleRegistry::builtin()).unwrap_err() {
                LoadError::Parse { path, .. } => assert!(path.ends_with("x.nf.json")),
                other => panic!("unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn test_rule_failure_carries_unit_path() {
        let mut reg = RuleRegistry::new();
        reg.register_module_rule("explode", |_, _| Err(RuleError::failed("boom")));
        let unit: ParsedUnit =
            serde_json::from_value(module_json("main.nf", "ubuntu:22.04")).unwrap();
        let err = lint_units(&[unit], &reg).unwrap_err();
        assert_eq!(err.to_string(), "rule failed on main.nf: boom");
    }
}
