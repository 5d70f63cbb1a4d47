//! Error types for ruleward.
//!
//! Construction-time defects surface as `RulewardError`. Faults raised while a
//! rule runs are `RuleFault`s, which never leave the verification function.

use thiserror::Error;

/// The unified error type returned by fallible ruleward operations.
#[derive(Debug, Error)]
pub enum RulewardError {
    /// The supplied rule set is malformed: an entry is not a rule, a reason
    /// is empty, an id is duplicated, or a rule definition cannot be parsed.
    ///
    /// Raised while building a verifier, never while verifying an input.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl RulewardError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigError {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the ruleward crates.
pub type RulewardResult<T> = Result<T, RulewardError>;

/// A defect inside a rule's own logic for a particular input.
///
/// Returned by fallible rule criteria. The verifier logs the detail and
/// replaces it with [`FALLBACK_REASON`](crate::verdict::FALLBACK_REASON).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule fault: {detail}")]
pub struct RuleFault {
    pub detail: String,
}

impl RuleFault {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
