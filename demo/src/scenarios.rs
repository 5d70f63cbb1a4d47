//! Walk-through scenarios for the demo CLI.
//!
//! Each scenario builds a verifier the way an application would at startup
//! and prints what callers see for a handful of inputs.

use serde_json::{json, Value};

use ruleward_contracts::error::{RulewardError, RulewardResult};
use ruleward_core::{build_verifier, verify, Rule, Verifier};

pub fn run_all() -> RulewardResult<()> {
    single_rule()?;
    ordered_rules()?;
    malformed_rule_set()?;
    faulty_rule()?;
    println!("All scenarios completed.");
    Ok(())
}

fn min_length(n: usize) -> Rule {
    verify(
        move |pw| pw.as_str().is_some_and(|s| s.chars().count() >= n),
        format!("Password must be at least {n} characters"),
    )
}

fn has_uppercase() -> Rule {
    verify(
        |pw| pw.as_str().is_some_and(|s| s.chars().any(char::is_uppercase)),
        "Password must contain an uppercase letter",
    )
}

fn show(verifier: &Verifier, input: &Value) {
    println!("  {input} -> {:?}", verifier.verify(input));
}

fn single_rule() -> RulewardResult<()> {
    println!("Scenario A: a single required-password rule");
    let verifier = build_verifier([verify(
        |pw| pw.as_str().is_some_and(|s| !s.is_empty()),
        "You must enter a password!",
    )])?;
    show(&verifier, &json!("P@ssw0rd"));
    show(&verifier, &json!(""));
    println!();
    Ok(())
}

fn ordered_rules() -> RulewardResult<()> {
    println!("Scenario B: reasons are reported in rule order");
    let verifier = build_verifier([min_length(6), has_uppercase()])?;
    show(&verifier, &json!(""));
    show(&verifier, &json!("Abcdef"));
    println!();
    Ok(())
}

fn malformed_rule_set() -> RulewardResult<()> {
    println!("Scenario C: an entry that is not a rule is rejected at construction");
    match build_verifier(["not a function"]) {
        Err(RulewardError::ConfigError { reason }) => println!("  rejected: {reason}"),
        Ok(_) => {
            return Err(RulewardError::config(
                "malformed rule set was accepted".to_string(),
            ))
        }
    }
    println!();
    Ok(())
}

fn faulty_rule() -> RulewardResult<()> {
    println!("Scenario D: a rule that faults on null input is contained");
    let verifier = build_verifier([Rule::new(
        |pw| {
            pw.as_str()
                .map(str::to_lowercase)
                .unwrap_or_else(|| panic!("cannot lowercase {pw}"))
                != "password"
        },
        "Password must not be 'password'",
    )])?;
    show(&verifier, &json!("hunter2"));
    // Keep the contained panic off the terminal; the verifier logs it.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));
    show(&verifier, &Value::Null);
    std::panic::set_hook(default_hook);
    println!();
    Ok(())
}
