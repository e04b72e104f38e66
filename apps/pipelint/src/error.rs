//! Error types shared by the engine, the loader, and the CLI.

use std::path::PathBuf;

/// Caller asked for something the model does not know about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unknown directive kind '{kind}'; expected one of: {valid}")]
    UnknownDirectiveKind { kind: String, valid: String },

    #[error("unknown rule '{0}'")]
    UnknownRule(String),
}

/// Failure raised from inside a rule. The engine does not catch it; the
/// unit and the run abort with this error.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("{0}")]
    Failed(String),
}

impl RuleError {
    pub fn failed(message: impl Into<String>) -> Self {
        RuleError::Failed(message.into())
    }
}

/// Errors while discovering, reading, or linting serialized units.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid parsed unit: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("rule failed on {unit}: {source}")]
    Rule {
        unit: String,
        #[source]
        source: RuleError,
    },
}
