//! Declarative text-substitution rules.
//!
//! Rule sets are plain data so they can be supplied as external
//! configuration and merged with the built-in defaults. The engine that
//! compiles and applies them lives in `recast-engine`.

use serde::{Deserialize, Serialize};

/// One ordered text-substitution rule.
///
/// Rules are pure: given the same input text and rule list, the output is
/// deterministic. No dependency analysis between rules exists; rule-set
/// authors order their lists so earlier rewrites don't shadow later ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransformRule {
    /// Unique name, used for enable/disable and merge-by-name.
    pub name: String,
    /// Human-readable purpose of the rule.
    #[serde(default)]
    pub description: String,
    /// Regular expression applied to the text.
    pub pattern: String,
    /// Replacement template; `$1`/`${name}` refer to capture groups.
    pub replacement: String,
    /// Match case-insensitively.
    #[serde(default)]
    pub case_insensitive: bool,
    /// Let `^`/`$` match at line boundaries.
    #[serde(default)]
    pub multiline: bool,
    /// A disabled rule is a complete no-op.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Part of the extended subset that only applies when opted into.
    #[serde(default)]
    pub experimental: bool,
}

fn default_enabled() -> bool {
    true
}

impl TransformRule {
    /// Creates an enabled rule.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            pattern: pattern.into(),
            replacement: replacement.into(),
            case_insensitive: false,
            multiline: false,
            enabled: true,
            experimental: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the rule as part of the extended subset.
    #[must_use]
    pub fn experimental(mut self) -> Self {
        self.experimental = true;
        self
    }
}

/// The pair of ordered rule lists consumed by the rule engine: one applied
/// to raw text before parsing, one applied to script text after
/// translation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    /// Applied to the raw document text before parsing.
    #[serde(default)]
    pub preprocess_rules: Vec<TransformRule>,
    /// Applied to each script after namespace and scope rewriting.
    #[serde(default)]
    pub postprocess_rules: Vec<TransformRule>,
}

impl RuleSet {
    /// Returns true if both lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preprocess_rules.is_empty() && self.postprocess_rules.is_empty()
    }
}
