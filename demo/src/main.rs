//! ruleward password verifier demo CLI
//!
//! Checks inputs against a TOML rule catalog, or walks through the built-in
//! scenarios showing ordered reasons, fail-fast construction, and fault
//! containment.
//!
//! Usage:
//!   cargo run -p demo -- check 'P@ssw0rd'
//!   cargo run -p demo -- check --catalog policies/password.toml --json '{"a": 1}'
//!   cargo run -p demo -- scenarios

mod scenarios;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ruleward_catalog::RuleCatalog;
use ruleward_contracts::error::{RulewardError, RulewardResult};
use ruleward_core::RuleRegistry;

const PASSWORD_CATALOG: &str = include_str!("../../policies/password.toml");

// ── CLI definition ────────────────────────────────────────────────────────────

/// ruleward: ordered, fail-fast rule verification.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "ruleward password rule verifier demo",
    long_about = "Checks inputs against a rule catalog and runs the ruleward scenarios:\n\
                  ordered failure reasons, construction-time validation, and\n\
                  containment of faulty rules."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check one input against a rule catalog.
    Check {
        /// Rule catalog to load. Defaults to the bundled password rules.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Parse INPUT as JSON instead of treating it as a plain string.
        #[arg(long)]
        json: bool,
        /// The value to check.
        input: String,
    },
    /// Run the built-in scenarios in sequence.
    Scenarios,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see every rule evaluation.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check {
            catalog,
            json,
            input,
        } => run_check(catalog, json, &input),
        Command::Scenarios => scenarios::run_all().map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(2);
        }
    }
}

// ── check ─────────────────────────────────────────────────────────────────────

/// Returns `Ok(true)` when the input passes every rule.
fn run_check(catalog: Option<PathBuf>, json: bool, input: &str) -> RulewardResult<bool> {
    let catalog = match &catalog {
        Some(path) => RuleCatalog::from_file(path)?,
        None => RuleCatalog::from_toml_str(PASSWORD_CATALOG)?,
    };
    let verifier = catalog.build(&RuleRegistry::new())?;
    info!(rule_count = verifier.len(), "catalog loaded");

    let value = if json {
        serde_json::from_str::<Value>(input)
            .map_err(|e| RulewardError::config(format!("input is not valid JSON: {e}")))?
    } else {
        Value::String(input.to_string())
    };

    let report = verifier.report(&value);
    if report.passed {
        println!("PASS");
    } else {
        println!("FAIL");
        for reason in report.reasons() {
            println!("  - {reason}");
        }
    }
    Ok(report.passed)
}
