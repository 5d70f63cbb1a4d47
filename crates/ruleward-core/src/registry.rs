//! Named rules that rule entries and catalogs can refer to.

use std::collections::HashMap;

use crate::rule::Rule;

/// A table of rules keyed by name.
///
/// The hosting application registers the rules it provides at startup. A
/// named rule entry resolves here while the verifier is being built; names
/// that do not resolve are configuration errors.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Rule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` under `name`. Registering the same name twice replaces
    /// the previous rule.
    pub fn register(&mut self, name: impl Into<String>, rule: Rule) {
        self.rules.insert(name.into(), rule);
    }

    pub fn resolve(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::RuleRegistry;
    use crate::rule::verify;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = RuleRegistry::new();
        assert!(registry.is_empty());

        registry.register("non-empty", verify(|v| v != &json!(""), "required"));
        registry.register("digit", verify(|_| true, "needs a digit"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["digit", "non-empty"]);
        assert!(registry.resolve("non-empty").is_some());
        assert!(registry.resolve("missing").is_none());
    }

    #[test]
    fn test_register_replaces_existing_name() {
        let mut registry = RuleRegistry::new();
        registry.register("r", verify(|_| true, "first"));
        registry.register("r", verify(|_| true, "second"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("r").unwrap().reason(), "second");
    }
}
