//! Recast Engine - text transformation layer
//!
//! This crate rewrites embedded automation scripts from the Postman API
//! surface to Insomnia's, and applies the ordered, user-extensible
//! text-substitution rule lists at the two configurable pipeline stages
//! (before document parsing and after script translation).

pub mod rules;
pub mod translator;

pub use rules::{RuleDiagnostic, RulePass, RulePassOutput, TransformRuleEngine, builtin_rules};
pub use translator::{ScriptTranslator, TranslatedScript};
