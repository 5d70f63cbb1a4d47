//! # ruleward-core
//!
//! The rule verifier: build a rule set once, then check any number of inputs
//! against it.
//!
//! This crate provides:
//! - [`Rule`] and the [`verify`] factory that turn a predicate and a reason
//!   into a rule
//! - [`RuleRegistry`], a table of named rules that rule entries may refer to
//! - [`VerifierBuilder`], which validates a rule set eagerly and produces a
//!   [`Verifier`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ruleward_core::{build_verifier, verify};
//! use serde_json::json;
//!
//! let verifier = build_verifier([
//!     verify(|pw| pw.as_str().is_some_and(|s| s.len() >= 6), "Password must be at least 6 characters"),
//!     verify(|pw| pw.as_str().is_some_and(|s| s.chars().any(char::is_uppercase)), "Password must contain an uppercase letter"),
//! ])?;
//!
//! assert!(verifier.verify(&json!("Abcdef")).is_empty());
//! ```

pub mod registry;
pub mod rule;
pub mod verifier;

pub use registry::RuleRegistry;
pub use rule::{verify, Criteria, Rule};
pub use verifier::{build_verifier, RuleEntry, Verifier, VerifierBuilder};
