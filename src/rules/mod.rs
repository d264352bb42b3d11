//! Rule compilation and application for importfix.
//!
//! This module handles:
//! - Compiling literal, regex and sed-like rules
//! - Applying rules to file content in order

pub mod compile;
pub mod rewriter;

pub use compile::{CompiledRule, compile_rules};
pub use rewriter::{Matcher, Rewritten, Substitution, apply_rules};
