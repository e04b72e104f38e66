//! Configuration discovery and effective settings resolution.
//!
//! pipelint reads `pipelint.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `output`: `human`
//! - `patterns`: `["**/*.nf.json", "**/*.config.json"]`
//! - `rules.disable`: empty
//! - `debug`: false
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CONFIG_FILES: [&str; 3] = ["pipelint.toml", "pipelint.yaml", "pipelint.yml"];

pub fn default_patterns() -> Vec<String> {
    vec!["**/*.nf.json".to_string(), "**/*.config.json".to_string()]
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Rule selection under `[rules]`.
pub struct RulesCfg {
    #[serde(default)]
    pub disable: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `pipelint.toml|yaml`.
pub struct PipelintConfig {
    pub output: Option<String>,
    pub patterns: Option<Vec<String>>,
    pub debug: Option<bool>,
    #[serde(default)]
    pub rules: Option<RulesCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    pub patterns: Vec<String>,
    pub disabled_rules: Vec<String>,
    pub debug: bool,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `pipelint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `PipelintConfig` from `pipelint.toml` or `pipelint.yaml|yml` if
/// present. An unreadable or invalid file is reported and ignored.
pub fn load_config(root: &Path) -> Option<PipelintConfig> {
    let toml_path = root.join("pipelint.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        return match toml::from_str(&s) {
            Ok(cfg) => Some(cfg),
            Err(err) => {
                warn!(path = %toml_path.display(), %err, "ignoring invalid config");
                None
            }
        };
    }
    for yml in ["pipelint.yaml", "pipelint.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            return match serde_yaml::from_str(&s) {
                Ok(cfg) => Some(cfg),
                Err(err) => {
                    warn!(path = %p.display(), %err, "ignoring invalid config");
                    None
                }
            };
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// Empty CLI lists count as "not given". Disabled rules from the CLI are
/// added to those of the config file.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_patterns: &[String],
    cli_disable: &[String],
    cli_debug: Option<bool>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let patterns = if cli_patterns.is_empty() {
        cfg.patterns.unwrap_or_else(default_patterns)
    } else {
        cli_patterns.to_vec()
    };

    let mut disabled_rules = cfg.rules.map(|r| r.disable).unwrap_or_default();
    for name in cli_disable {
        if !disabled_rules.contains(name) {
            disabled_rules.push(name.clone());
        }
    }

    let debug = cli_debug.or(cfg.debug).unwrap_or(false);

    Effective {
        repo_root,
        output,
        patterns,
        disabled_rules,
        debug,
    }
}
