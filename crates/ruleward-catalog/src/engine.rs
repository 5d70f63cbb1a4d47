//! Compiles TOML rule catalogs into verifiers.
//!
//! Every definition is turned into a `ruleward_core::Rule` before any input is
//! checked. A catalog that cannot be compiled (unknown kind, blank reason,
//! unregistered custom function, invalid JSON Schema, duplicate id) fails with
//! `RulewardError::ConfigError` and no verifier is produced.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use ruleward_contracts::error::{RulewardError, RulewardResult};
use ruleward_core::{Rule, RuleRegistry, Verifier, VerifierBuilder};

use crate::rule::{CatalogConfig, RuleDefinition, RuleKind, DEFINITION_KEYS};

static NULL: Value = Value::Null;

/// A parsed rule catalog, ready to be compiled with [`RuleCatalog::build`].
///
/// ```rust,ignore
/// use ruleward_catalog::RuleCatalog;
///
/// let catalog = RuleCatalog::from_file(Path::new("policies/password.toml"))?;
/// let verifier = catalog.build(&RuleRegistry::new())?;
/// ```
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    config: CatalogConfig,
}

impl RuleCatalog {
    /// Parse `s` as TOML and build a `RuleCatalog`.
    ///
    /// Returns `RulewardError::ConfigError` if the TOML is malformed, a rule
    /// does not match a known kind, or a rule carries a key its kind does not
    /// take.
    pub fn from_toml_str(s: &str) -> RulewardResult<Self> {
        let table: toml::Table = s.parse().map_err(parse_error)?;
        reject_unknown_keys(&table)?;
        let config: CatalogConfig = toml::Value::Table(table).try_into().map_err(parse_error)?;
        Ok(Self { config })
    }

    /// Read the file at `path` and parse it as a TOML rule catalog.
    pub fn from_file(path: &Path) -> RulewardResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RulewardError::config(format!(
                "failed to read rule catalog '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn definitions(&self) -> &[RuleDefinition] {
        &self.config.rules
    }

    /// Compile every definition and freeze them into a `Verifier`.
    ///
    /// `registry` supplies the rules that `custom` definitions refer to.
    pub fn build(&self, registry: &RuleRegistry) -> RulewardResult<Verifier> {
        let rules = self
            .config
            .rules
            .iter()
            .map(|def| compile(def, registry))
            .collect::<RulewardResult<Vec<Rule>>>()?;

        debug!(rule_count = rules.len(), "rule catalog compiled");
        VerifierBuilder::new().rules(rules).build()
    }
}

fn parse_error(e: toml::de::Error) -> RulewardError {
    RulewardError::config(format!("failed to parse rule catalog TOML: {}", e))
}

/// Reject keys that no definition field or kind parameter would read.
///
/// Definitions flatten their kind parameters, so serde alone would drop a
/// misspelled key and compile the rule with defaults.
fn reject_unknown_keys(table: &toml::Table) -> RulewardResult<()> {
    if let Some(key) = table.keys().find(|key| key.as_str() != "rules") {
        warn!(key = %key, "unknown top-level key in rule catalog");
        return Err(RulewardError::config(format!(
            "unknown top-level key '{key}' in rule catalog"
        )));
    }

    let Some(rules) = table.get("rules").and_then(toml::Value::as_array) else {
        return Ok(());
    };

    for (index, rule) in rules.iter().enumerate() {
        let Some(rule) = rule.as_table() else {
            continue;
        };
        // Unknown or missing kinds are reported by deserialization.
        let Some(kind) = rule.get("kind").and_then(toml::Value::as_str) else {
            continue;
        };
        let Some(params) = RuleKind::params(kind) else {
            continue;
        };

        let unknown = rule.keys().find(|key| {
            !DEFINITION_KEYS.contains(&key.as_str()) && !params.contains(&key.as_str())
        });
        if let Some(key) = unknown {
            let id = rule.get("id").and_then(toml::Value::as_str).unwrap_or("?");
            warn!(index, rule_id = %id, key = %key, kind, "unknown key in rule definition");
            return Err(RulewardError::config(format!(
                "rule {index} ('{id}'): unknown key '{key}' for kind '{kind}'"
            )));
        }
    }

    Ok(())
}

/// Turn one definition into a rule carrying the definition's id and reason.
fn compile(def: &RuleDefinition, registry: &RuleRegistry) -> RulewardResult<Rule> {
    debug!(
        rule_id = %def.id,
        kind = ?def.kind,
        description = def.description.as_deref().unwrap_or(""),
        "compiling rule definition"
    );

    let field = def.field.clone();
    let reason = def.reason.clone();

    let rule = match &def.kind {
        RuleKind::NonEmpty => Rule::new(
            move |input| match select(input, field.as_deref()) {
                Some(Value::String(s)) => !s.is_empty(),
                Some(Value::Array(items)) => !items.is_empty(),
                Some(Value::Object(map)) => !map.is_empty(),
                Some(Value::Null) | None => false,
                Some(_) => true,
            },
            reason,
        ),

        RuleKind::MinLength { min } => {
            let min = *min;
            string_rule(field, reason, move |s| s.chars().count() >= min)
        }

        RuleKind::MaxLength { max } => {
            let max = *max;
            string_rule(field, reason, move |s| s.chars().count() <= max)
        }

        RuleKind::ContainsUppercase => {
            string_rule(field, reason, |s| s.chars().any(char::is_uppercase))
        }

        RuleKind::ContainsLowercase => {
            string_rule(field, reason, |s| s.chars().any(char::is_lowercase))
        }

        RuleKind::ContainsDigit => {
            string_rule(field, reason, |s| s.chars().any(|c| c.is_ascii_digit()))
        }

        RuleKind::ContainsSymbol => string_rule(field, reason, |s| {
            s.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace())
        }),

        RuleKind::ForbiddenPattern {
            pattern,
            case_insensitive,
        } => {
            if pattern.is_empty() {
                return Err(config_error(def, "forbidden-pattern needs a non-empty pattern"));
            }
            let case_insensitive = *case_insensitive;
            let pattern = if case_insensitive {
                pattern.to_lowercase()
            } else {
                pattern.clone()
            };
            Rule::new(
                move |input| match select(input, field.as_deref()).and_then(Value::as_str) {
                    Some(s) if case_insensitive => !s.to_lowercase().contains(&pattern),
                    Some(s) => !s.contains(&pattern),
                    None => true,
                },
                reason,
            )
        }

        RuleKind::RequiredField => {
            if field.is_none() {
                return Err(config_error(def, "required-field needs a 'field' path"));
            }
            Rule::new(
                move |input| {
                    select(input, field.as_deref()).is_some_and(|v| !v.is_null())
                },
                reason,
            )
        }

        RuleKind::AllowedValues { allowed } => {
            if allowed.is_empty() {
                return Err(config_error(def, "allowed-values needs at least one value"));
            }
            let allowed = allowed.clone();
            Rule::new(
                move |input| {
                    select(input, field.as_deref()).is_some_and(|v| allowed.contains(v))
                },
                reason,
            )
        }

        RuleKind::JsonSchema { schema } => {
            let validator = jsonschema::validator_for(schema).map_err(|e| {
                config_error(def, &format!("invalid JSON Schema document: {e}"))
            })?;
            Rule::new(
                move |input| validator.is_valid(select(input, field.as_deref()).unwrap_or(&NULL)),
                reason,
            )
        }

        RuleKind::Custom { function } => {
            let registered = registry.resolve(function).ok_or_else(|| {
                warn!(rule_id = %def.id, function = %function, "custom rule function is not registered");
                config_error(
                    def,
                    &format!("no rule registered for custom function '{function}'"),
                )
            })?;
            let criteria = registered.criteria().clone();
            Rule::fallible(
                move |input| criteria(select(input, field.as_deref()).unwrap_or(&NULL)),
                reason,
            )
        }
    };

    Ok(rule.with_id(def.id.clone()))
}

/// A rule over the selected string value. Missing or non-string values fail.
fn string_rule<F>(field: Option<String>, reason: String, check: F) -> Rule
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    Rule::new(
        move |input| {
            select(input, field.as_deref())
                .and_then(Value::as_str)
                .is_some_and(&check)
        },
        reason,
    )
}

/// Resolve the examined value. With no path the whole input is examined;
/// otherwise each dot-separated segment must exist.
fn select<'v>(input: &'v Value, path: Option<&str>) -> Option<&'v Value> {
    let Some(path) = path else {
        return Some(input);
    };
    let mut current = input;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

fn config_error(def: &RuleDefinition, message: &str) -> RulewardError {
    RulewardError::config(format!("rule '{}': {}", def.id, message))
}
