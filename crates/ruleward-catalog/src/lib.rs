//! # ruleward-catalog
//!
//! TOML-defined rule catalogs for ruleward.
//!
//! ## Overview
//!
//! This crate provides [`RuleCatalog`], which parses an ordered list of rule
//! definitions from TOML and compiles them into a
//! [`Verifier`](ruleward_core::Verifier). Every definition is checked while
//! compiling, so a broken catalog is rejected before any input is seen.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use ruleward_catalog::RuleCatalog;
//! use ruleward_core::RuleRegistry;
//!
//! let verifier = RuleCatalog::from_file(Path::new("policies/password.toml"))?
//!     .build(&RuleRegistry::new())?;
//! let reasons = verifier.verify(&serde_json::json!("hunter2"));
//! ```
//!
//! ## Field selection
//!
//! A definition may set `field = "a.b"` to examine part of a structured input.
//! Without it the whole input is examined.

pub mod engine;
pub mod rule;

pub use engine::RuleCatalog;
pub use rule::{CatalogConfig, RuleDefinition, RuleKind};

// ── Tests ─────────────────────────────────────────────────────────────────────
