//! # ruleward-contracts
//!
//! Shared types and error definitions for the ruleward rule verifier.
//!
//! All crates in the workspace import from here. No evaluation logic lives in
//! this crate, only data definitions and error types.

pub mod error;
pub mod verdict;

pub use error::{RuleFault, RulewardError, RulewardResult};
pub use verdict::{RuleFailure, VerificationReport, Verdict, FALLBACK_REASON};
