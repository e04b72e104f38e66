//! pipelint CLI binary entry point.
//! Resolves configuration, runs the lint engine, and prints results.

use clap::Parser;
use pipelint::cli::{Cli, Commands};
use pipelint::registry::RuleRegistry;
use pipelint::{config, lint, output};
use tracing_subscriber::EnvFilter;

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Rules { output } => {
            let output = output.unwrap_or_else(|| "human".to_string());
            output::print_rules(&RuleRegistry::builtin(), &output);
        }
        Commands::Lint {
            repo_root,
            output,
            patterns,
            disable,
            debug,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                output.as_deref(),
                &patterns,
                &disable,
                if debug { Some(true) } else { None },
            );
            init_tracing(eff.debug);

            let registry = match RuleRegistry::builtin().without(&eff.disabled_rules) {
                Ok(r) => r,
                Err(err) => {
                    eprintln!("{} {}", output::error_prefix(), err);
                    std::process::exit(2);
                }
            };
            let results = match lint::run_lint(&eff.repo_root, &eff.patterns, &registry) {
                Ok(r) => r,
                Err(err) => {
                    eprintln!("{} {}", output::error_prefix(), err);
                    std::process::exit(2);
                }
            };
            output::print_lint(&results, &eff.output, &eff.repo_root);
            if results.iter().any(|r| r.has_errors()) {
                std::process::exit(1);
            }
        }
    }
}
