//! Rule definition types and catalog schema.
//!
//! A `RuleCatalog` is deserialized from TOML and holds an ordered list of
//! `RuleDefinition`s. Each definition names a built-in `RuleKind`, the reason
//! reported when it fails, and optionally the part of the input it examines.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The built-in checks a catalog rule can perform.
///
/// Expressed as a kebab-case `kind` string in TOML, with the kind's own
/// parameters alongside:
/// ```toml
/// kind = "non-empty"
/// kind = "min-length"          # min = 8
/// kind = "forbidden-pattern"   # pattern = "password", case_insensitive = true
/// kind = "json-schema"         # schema = { type = "object", required = ["user"] }
/// kind = "custom"              # function = "not-breached"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RuleKind {
    /// The value must be present and non-empty (strings, arrays, objects).
    NonEmpty,

    /// The string must have at least `min` characters.
    MinLength { min: usize },

    /// The string must have at most `max` characters.
    MaxLength { max: usize },

    ContainsUppercase,
    ContainsLowercase,
    ContainsDigit,

    /// At least one character that is neither alphanumeric nor whitespace.
    ContainsSymbol,

    /// The string must not contain `pattern` as a substring. Non-string values
    /// pass; the rule only constrains strings.
    ForbiddenPattern {
        pattern: String,
        #[serde(default)]
        case_insensitive: bool,
    },

    /// The definition's `field` path must resolve to a non-null value.
    RequiredField,

    /// The value must equal one of `allowed`.
    AllowedValues { allowed: Vec<Value> },

    /// The value must validate against a JSON Schema document.
    JsonSchema { schema: Value },

    /// Delegate to a rule registered by the hosting application under
    /// `function`.
    Custom { function: String },
}

impl RuleKind {
    /// Parameter keys taken by the kind named `kind`, or `None` for a name
    /// that is not a kind.
    pub fn params(kind: &str) -> Option<&'static [&'static str]> {
        let params: &'static [&'static str] = match kind {
            "non-empty" | "contains-uppercase" | "contains-lowercase" | "contains-digit"
            | "contains-symbol" | "required-field" => &[],
            "min-length" => &["min"],
            "max-length" => &["max"],
            "forbidden-pattern" => &["pattern", "case_insensitive"],
            "allowed-values" => &["allowed"],
            "json-schema" => &["schema"],
            "custom" => &["function"],
            _ => return None,
        };
        Some(params)
    }
}

/// Keys every definition may carry, whatever its kind.
pub const DEFINITION_KEYS: &[&str] = &["id", "description", "reason", "field", "kind"];

/// A single rule loaded from a catalog.
///
/// String kinds fail, rather than fault, when the examined value is missing or
/// not a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Stable identifier used in reports and logs. Must be unique per catalog.
    pub id: String,

    /// Human-readable explanation of what this rule checks.
    #[serde(default)]
    pub description: Option<String>,

    /// Reason reported when the rule fails. Must not be empty.
    pub reason: String,

    /// Dot-notation path (e.g. `"credentials.password"`) selecting the value
    /// this rule examines. When absent the whole input is examined.
    #[serde(default)]
    pub field: Option<String>,

    #[serde(flatten)]
    pub kind: RuleKind,
}

/// The top-level structure deserialized from a TOML rule catalog.
///
/// Example:
/// ```toml
/// [[rules]]
/// id = "min-length"
/// kind = "min-length"
/// min = 6
/// reason = "Password must be at least 6 characters"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Ordered list of rules. Reasons are reported in this order.
    pub rules: Vec<RuleDefinition>,
}
