//! pipelint core library.
//!
//! This crate lints parsed pipeline units (process modules and config
//! files) with an ordered set of named rules.
//!
//! High-level modules:
//! - `models`: Parsed units, directives, and lint output structs.
//! - `registry`: Named rules per unit scope, in registration order.
//! - `engine`: Runs a registry's rules against one unit.
//! - `container`: Container reference classification and tag checks.
//! - `checks`: Built-in label and container rules.
//! - `lint`: Discovery and parallel linting of serialized units on disk.
//! - `config`: Discovery and effective configuration resolution.
//! - `output`: Human/JSON printers.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `error`: Error types shared across modules.
pub mod checks;
pub mod cli;
pub mod config;
pub mod container;
pub mod engine;
pub mod error;
pub mod lint;
pub mod models;
pub mod output;
pub mod registry;

pub use engine::execute;
pub use error::{ConfigurationError, LoadError, RuleError};
pub use models::{LintIssue, LintResult};
pub use registry::RuleRegistry;
