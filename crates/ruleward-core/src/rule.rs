//! Rules and the rule factory.
//!
//! A `Rule` pairs a predicate over the input with the reason reported when the
//! predicate does not hold. Predicates may be infallible (`Fn(&Value) -> bool`)
//! or fallible (`Fn(&Value) -> Result<bool, RuleFault>`). Neither kind is
//! guarded here: faults and panics are contained by the verifier.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use ruleward_contracts::{RuleFault, Verdict};

/// Shared, thread-safe predicate behind every rule.
pub type Criteria = Arc<dyn Fn(&Value) -> Result<bool, RuleFault> + Send + Sync>;

/// A predicate over an input plus the reason reported when it fails.
///
/// Rules are immutable and cheap to clone; clones share the predicate.
#[derive(Clone)]
pub struct Rule {
    id: Option<String>,
    reason: String,
    criteria: Criteria,
}

impl Rule {
    /// Build a rule from an infallible predicate.
    ///
    /// A panic inside `criteria` is contained by the verifier, but the
    /// process panic hook still runs and by default prints the panic message.
    /// Predicates that can meet inputs they cannot handle should use
    /// [`Rule::fallible`] and return a `RuleFault` instead.
    pub fn new<F>(criteria: F, reason: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::fallible(move |input| Ok(criteria(input)), reason)
    }

    /// Build a rule from a predicate that can report a fault for inputs it
    /// cannot handle.
    pub fn fallible<F>(criteria: F, reason: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> Result<bool, RuleFault> + Send + Sync + 'static,
    {
        Self {
            id: None,
            reason: reason.into(),
            criteria: Arc::new(criteria),
        }
    }

    /// Attach a stable identifier used in reports and logs.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The predicate, for composing it into another rule.
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Apply the rule to `input`.
    ///
    /// Returns `Verdict::Passed` when the predicate holds, otherwise
    /// `Verdict::Failed` carrying this rule's reason. A fault from the
    /// predicate is passed through untouched. Only reachable through a built
    /// `Verifier`, which has already rejected blank reasons.
    pub(crate) fn apply(&self, input: &Value) -> Result<Verdict, RuleFault> {
        if (self.criteria)(input)? {
            Ok(Verdict::Passed)
        } else {
            Ok(Verdict::Failed {
                reason: self.reason.clone(),
            })
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// Rule factory: a rule that passes when `criteria` holds for the input and
/// fails with `reason` otherwise.
pub fn verify<F>(criteria: F, reason: impl Into<String>) -> Rule
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Rule::new(criteria, reason)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
