//! Verifier builder and verification.
//!
//! `VerifierBuilder` collects rule entries, validates all of them before any
//! input is seen, and freezes the result into a `Verifier`.
//!
//! Verification algorithm:
//!
//! 1. Apply every rule, in rule-set order, to the input.
//! 2. Keep the `Failed` verdicts and project each to its reason.
//! 3. If any rule faults (returns a `RuleFault` or panics), discard the
//!    partial result, log the detail, and report only `FALLBACK_REASON`.
//!
//! A `Verifier` holds no mutable state, so one instance can be shared across
//! threads and called concurrently.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use ruleward_contracts::{
    error::{RuleFault, RulewardError, RulewardResult},
    verdict::{RuleFailure, VerificationReport, Verdict},
};

use crate::{registry::RuleRegistry, rule::Rule};

/// One element of the collection handed to the builder.
///
/// `Named` entries refer to a rule registered in the builder's
/// [`RuleRegistry`]. An entry whose name does not resolve is not a rule, and
/// building fails.
#[derive(Debug, Clone)]
pub enum RuleEntry {
    Rule(Rule),
    Named(String),
}

impl From<Rule> for RuleEntry {
    fn from(rule: Rule) -> Self {
        RuleEntry::Rule(rule)
    }
}

impl From<&str> for RuleEntry {
    fn from(name: &str) -> Self {
        RuleEntry::Named(name.to_string())
    }
}

impl From<String> for RuleEntry {
    fn from(name: String) -> Self {
        RuleEntry::Named(name)
    }
}

/// Collects rule entries and validates them into a [`Verifier`].
///
/// ```rust,ignore
/// let verifier = VerifierBuilder::new()
///     .with_registry(registry)
///     .rule(verify(|pw| pw != &json!(""), "You must enter a password!"))
///     .rule("no-common-passwords")
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct VerifierBuilder {
    registry: RuleRegistry,
    entries: Vec<RuleEntry>,
}

impl VerifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `registry` to resolve named entries.
    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn rule(mut self, entry: impl Into<RuleEntry>) -> Self {
        self.entries.push(entry.into());
        self
    }

    pub fn rules<I, E>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<RuleEntry>,
    {
        self.entries.extend(entries.into_iter().map(Into::into));
        self
    }

    /// Validate every entry and freeze the rule set.
    ///
    /// Returns `RulewardError::ConfigError` if an entry names no registered
    /// rule, a rule's reason is blank, or two rules share an id. Nothing is
    /// evaluated here; the rule set is only checked for shape.
    pub fn build(self) -> RulewardResult<Verifier> {
        let Self { registry, entries } = self;
        let mut rules = Vec::with_capacity(entries.len());
        let mut seen_ids = HashSet::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let rule = match entry {
                RuleEntry::Rule(rule) => rule,
                RuleEntry::Named(name) => match registry.resolve(&name) {
                    Some(rule) if rule.id().is_none() => rule.clone().with_id(name),
                    Some(rule) => rule.clone(),
                    None => {
                        warn!(index, entry = %name, "rule entry does not resolve to a rule");
                        return Err(RulewardError::config(format!(
                            "rule entry {index} ('{name}') is not a rule: no rule is registered under that name"
                        )));
                    }
                },
            };

            if rule.reason().trim().is_empty() {
                warn!(index, rule_id = %rule_id(index, &rule), "rule has an empty failure reason");
                return Err(RulewardError::config(format!(
                    "rule {index} has an empty failure reason"
                )));
            }

            if let Some(id) = rule.id() {
                if !seen_ids.insert(id.to_string()) {
                    warn!(index, rule_id = %id, "duplicate rule id");
                    return Err(RulewardError::config(format!(
                        "rule {index} reuses id '{id}'"
                    )));
                }
            }

            rules.push(rule);
        }

        debug!(rule_count = rules.len(), "verifier built");

        Ok(Verifier {
            rules: Arc::from(rules),
        })
    }
}

/// Build a verifier from `entries` with no registry.
///
/// Any named entry therefore fails with `RulewardError::ConfigError`.
pub fn build_verifier<I, E>(entries: I) -> RulewardResult<Verifier>
where
    I: IntoIterator<Item = E>,
    E: Into<RuleEntry>,
{
    VerifierBuilder::new().rules(entries).build()
}

/// A frozen rule set that checks inputs and never fails.
///
/// Clones share the same rule set.
#[derive(Debug, Clone)]
pub struct Verifier {
    rules: Arc<[Rule]>,
}

/// A fault raised by one rule, kept inside the verifier.
struct ContainedFault {
    index: usize,
    rule_id: String,
    fault: RuleFault,
}

impl Verifier {
    /// Check `input` and return the reasons of every failed rule, in rule
    /// order. Empty means the input passed.
    ///
    /// If a rule faults, the result is exactly `[FALLBACK_REASON]`. The fault
    /// detail only goes to the `error!` log, with one exception: a panicking
    /// predicate still triggers the process panic hook, which prints the
    /// panic message unless the application installs its own hook. Rules
    /// built with [`Rule::fallible`] report faults without panicking.
    pub fn verify(&self, input: &Value) -> Vec<String> {
        self.report(input).reasons()
    }

    /// Check `input` and return the full report.
    pub fn report(&self, input: &Value) -> VerificationReport {
        match self.evaluate(input) {
            Ok(failures) => {
                debug!(
                    rule_count = self.rules.len(),
                    failure_count = failures.len(),
                    passed = failures.is_empty(),
                    "verification complete"
                );
                VerificationReport::from_failures(failures)
            }
            Err(ContainedFault {
                index,
                rule_id,
                fault,
            }) => {
                error!(
                    index,
                    rule_id = %rule_id,
                    detail = %fault.detail,
                    "rule faulted; reporting fallback reason"
                );
                VerificationReport::fallback()
            }
        }
    }

    /// Consume the verifier and return it as a plain function.
    pub fn into_fn(self) -> impl Fn(&Value) -> Vec<String> + Clone + Send + Sync {
        move |input: &Value| self.verify(input)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn evaluate(&self, input: &Value) -> Result<Vec<RuleFailure>, ContainedFault> {
        let verdicts = self
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                debug!(index, rule_id = %rule_id(index, rule), "evaluating rule");
                apply_contained(rule, input)
                    .map(|verdict| (index, rule, verdict))
                    .map_err(|fault| ContainedFault {
                        index,
                        rule_id: rule_id(index, rule),
                        fault,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(verdicts
            .into_iter()
            .filter_map(|(index, rule, verdict)| match verdict {
                Verdict::Passed => None,
                Verdict::Failed { reason } => {
                    let rule_id = rule_id(index, rule);
                    warn!(index, rule_id = %rule_id, %reason, "rule failed");
                    Some(RuleFailure {
                        index,
                        rule_id,
                        reason,
                    })
                }
            })
            .collect())
    }
}

/// Apply `rule`, turning a panic inside its predicate into a `RuleFault`.
fn apply_contained(rule: &Rule, input: &Value) -> Result<Verdict, RuleFault> {
    panic::catch_unwind(AssertUnwindSafe(|| rule.apply(input))).unwrap_or_else(|payload| {
        Err(RuleFault::new(format!(
            "rule panicked: {}",
            panic_message(payload.as_ref())
        )))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn rule_id(index: usize, rule: &Rule) -> String {
    rule.id()
        .map(str::to_string)
        .unwrap_or_else(|| format!("rule-{index}"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use ruleward_contracts::{RuleFault, RulewardError, FALLBACK_REASON};

    use super::{build_verifier, RuleEntry, VerifierBuilder};
    use crate::{
        registry::RuleRegistry,
        rule::{verify, Rule},
    };

    // ── Helpers ───────────────────────────────────────────────────────────────

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

    /// Lowercases the input without checking that it is a string first.
    fn not_literally_password() -> Rule {
        verify(
            |pw| pw.as_str().unwrap().to_lowercase() != "password",
            "Password must not be 'password'",
        )
    }

    // ── Scenario A: single rule ───────────────────────────────────────────────

    #[test]
    fn test_single_rule_pass_and_fail() {
        let verifier = build_verifier([verify(
            |pw| pw.as_str().is_some_and(|s| !s.is_empty()),
            "You must enter a password!",
        )])
        .unwrap();

        assert!(verifier.verify(&json!("P@ssw0rd")).is_empty());
        assert_eq!(
            verifier.verify(&json!("")),
            vec!["You must enter a password!".to_string()]
        );
    }

    // ── Scenario B: ordering ──────────────────────────────────────────────────

    #[test]
    fn test_reasons_follow_rule_order() {
        let verifier = build_verifier([min_length(6), has_uppercase()]).unwrap();

        assert_eq!(
            verifier.verify(&json!("")),
            vec![
                "Password must be at least 6 characters".to_string(),
                "Password must contain an uppercase letter".to_string(),
            ]
        );
        assert!(verifier.verify(&json!("Abcdef")).is_empty());

        // Reversing the rules reverses the reasons.
        let reversed = build_verifier([has_uppercase(), min_length(6)]).unwrap();
        assert_eq!(
            reversed.verify(&json!("abc")),
            vec![
                "Password must contain an uppercase letter".to_string(),
                "Password must be at least 6 characters".to_string(),
            ]
        );
    }

    #[test]
    fn test_only_failed_rules_are_reported() {
        let verifier = build_verifier([min_length(6), has_uppercase()]).unwrap();
        let report = verifier.report(&json!("abcdefgh"));

        assert!(!report.passed);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].rule_id, "rule-1");
    }

    #[test]
    fn test_rule_id_falls_back_to_index() {
        assert_eq!(super::rule_id(3, &min_length(6)), "rule-3");
        assert_eq!(super::rule_id(3, &min_length(6).with_id("length")), "length");

        let verifier = build_verifier([min_length(6).with_id("length"), has_uppercase()]).unwrap();
        let ids: Vec<String> = verifier
            .report(&json!("abc"))
            .failures
            .into_iter()
            .map(|f| f.rule_id)
            .collect();
        assert_eq!(ids, vec!["length".to_string(), "rule-1".to_string()]);
    }

    // ── Scenario C: construction-time validation ─────────────────────────────

    #[test]
    fn test_non_rule_entry_fails_at_build() {
        let result = build_verifier(["not a function"]);

        match result {
            Err(RulewardError::ConfigError { reason }) => {
                assert!(reason.contains("not a function"), "unexpected reason: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_non_rule_entry_among_valid_rules_fails_at_build() {
        let entries: Vec<RuleEntry> = vec![min_length(6).into(), "not a function".into()];
        assert!(matches!(
            build_verifier(entries),
            Err(RulewardError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_empty_reason_rejected() {
        let result = build_verifier([verify(|_| true, "   ")]);
        match result {
            Err(RulewardError::ConfigError { reason }) => {
                assert!(reason.contains("empty failure reason"), "unexpected reason: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = build_verifier([
            min_length(6).with_id("length"),
            min_length(8).with_id("length"),
        ]);
        match result {
            Err(RulewardError::ConfigError { reason }) => {
                assert!(reason.contains("'length'"), "unexpected reason: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── Named entries ─────────────────────────────────────────────────────────

    #[test]
    fn test_named_entry_resolves_through_registry() {
        let mut registry = RuleRegistry::new();
        registry.register("uppercase", has_uppercase());

        let verifier = VerifierBuilder::new()
            .with_registry(registry)
            .rule(min_length(6))
            .rule("uppercase")
            .build()
            .unwrap();

        assert_eq!(verifier.len(), 2);
        let report = verifier.report(&json!("abcdefg"));
        assert_eq!(report.failures[0].rule_id, "uppercase");
    }

    // ── Scenario D: fault containment ─────────────────────────────────────────

    #[test]
    fn test_panicking_rule_yields_fallback() {
        let verifier = build_verifier([min_length(6), not_literally_password()]).unwrap();

        assert_eq!(verifier.verify(&Value::Null), vec![FALLBACK_REASON.to_string()]);
        assert!(FALLBACK_REASON.to_lowercase().contains("fail"));

        let report = verifier.report(&Value::Null);
        assert!(report.faulted);
        assert!(!report.passed);

        // The same verifier still works for well-formed input.
        assert!(verifier.verify(&json!("Tr0ub4dor")).is_empty());
    }

    #[test]
    fn test_fallible_fault_yields_fallback_without_detail() {
        let verifier = build_verifier([Rule::fallible(
            |_| Err(RuleFault::new("internal lookup table missing")),
            "unreachable reason",
        )])
        .unwrap();

        let reasons = verifier.verify(&json!("anything"));
        assert_eq!(reasons, vec![FALLBACK_REASON.to_string()]);
        assert!(reasons.iter().all(|r| !r.contains("lookup table")));
    }

    // ── Properties ────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_rule_set_always_passes() {
        let verifier = build_verifier(Vec::<RuleEntry>::new()).unwrap();
        assert!(verifier.is_empty());
        assert!(verifier.verify(&Value::Null).is_empty());
        assert!(verifier.report(&json!({ "any": "shape" })).passed);
    }

    #[test]
    fn test_verification_is_idempotent() {
        let verifier = build_verifier([min_length(6), has_uppercase()]).unwrap();
        for input in [json!(""), json!("abc"), json!("Abcdef"), Value::Null] {
            assert_eq!(verifier.verify(&input), verifier.verify(&input));
        }
    }

    #[test]
    fn test_concurrent_verification() {
        let verifier = build_verifier([min_length(6), has_uppercase()]).unwrap();
        let expected_pass = json!("Abcdef");
        let expected_fail = json!("");

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let verifier = verifier.clone();
                let (pass, fail) = (&expected_pass, &expected_fail);
                scope.spawn(move || {
                    for _ in 0..100 {
                        assert!(verifier.verify(pass).is_empty());
                        assert_eq!(verifier.verify(fail).len(), 2);
                    }
                });
            }
        });
    }

    #[test]
    fn test_into_fn_behaves_like_verify() {
        let verifier = build_verifier([min_length(6)]).unwrap();
        let check = verifier.clone().into_fn();

        assert_eq!(check(&json!("abc")), verifier.verify(&json!("abc")));
        assert!(check(&json!("abcdef")).is_empty());
    }
}
