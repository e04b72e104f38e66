//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pipelint",
    version,
    about = "Lint parsed pipeline processes",
    long_about = "pipelint — run label and container checks over serialized pipeline modules and config files.\n\nConfiguration precedence: CLI > pipelint.toml > defaults.",
    after_help = "Examples:\n  pipelint lint\n  pipelint lint --pattern 'build/ast/**/*.json' --output json\n  pipelint lint --disable no_labels --disable alphanumerics\n  pipelint rules",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current pipelint version.")]
    Version,
    /// Lint serialized units
    #[command(
        about = "Run lint checks",
        long_about = "Load every unit matched by the configured patterns and run the enabled rules. Any error-level issue makes the exit status 1.",
        after_help = "Examples:\n  pipelint lint --repo-root ./my-pipeline\n  pipelint lint --output json"
    )]
    Lint {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long = "pattern", help = "Glob for serialized units, relative to the root (repeatable)")]
        patterns: Vec<String>,
        #[arg(long = "disable", help = "Rule name to skip (repeatable)")]
        disable: Vec<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Log each rule as it runs")]
        debug: bool,
    },
    /// List built-in rules
    #[command(
        about = "List rules",
        long_about = "Print every built-in rule in execution order with its scope."
    )]
    Rules {
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
