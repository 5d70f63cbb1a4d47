//! Verdict and report types.
//!
//! Applying one rule to one input yields a `Verdict`. Applying a whole rule
//! set yields a `VerificationReport`, whose reasons are the plain result
//! callers usually want.

use serde::{Deserialize, Serialize};

/// Reason returned in place of any internal rule fault.
///
/// Stable, so callers can tell a contained fault apart from an ordinary
/// failed rule without seeing the fault itself.
pub const FALLBACK_REASON: &str = "Verification failed";

/// The outcome of applying one rule to one input.
///
/// A `Failed` verdict always carries a non-empty reason; the verifier builder
/// rejects rules whose reason is blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "kebab-case")]
pub enum Verdict {
    Passed,
    Failed { reason: String },
}

impl Verdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    /// The failure reason, or `None` for `Passed`.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Passed => None,
            Verdict::Failed { reason } => Some(reason),
        }
    }
}

/// One failed rule within a `VerificationReport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    /// Position of the rule in its rule set.
    pub index: usize,
    /// The rule's id, or `rule-<index>` when the rule was built without one.
    pub rule_id: String,
    /// Human-readable reason the rule failed.
    pub reason: String,
}

/// The result of applying every rule in a rule set to one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if every rule passed.
    pub passed: bool,
    /// True when a rule fault was contained. `failures` then holds a single
    /// entry carrying [`FALLBACK_REASON`].
    pub faulted: bool,
    /// Failed rules in rule-set order. Empty on pass.
    pub failures: Vec<RuleFailure>,
}

impl VerificationReport {
    pub fn from_failures(failures: Vec<RuleFailure>) -> Self {
        Self {
            passed: failures.is_empty(),
            faulted: false,
            failures,
        }
    }

    /// The opaque report substituted for a contained rule fault.
    pub fn fallback() -> Self {
        Self {
            passed: false,
            faulted: true,
            failures: vec![RuleFailure {
                index: 0,
                rule_id: "fallback".to_string(),
                reason: FALLBACK_REASON.to_string(),
            }],
        }
    }

    /// Failure reasons in rule-set order.
    pub fn reasons(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.reason.clone()).collect()
    }
}
