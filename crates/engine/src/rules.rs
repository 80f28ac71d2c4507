//! The ordered, enable/disable-able text-substitution engine.
//!
//! The engine holds two rule lists sharing one rule shape: a pre-parse
//! list applied to raw document text, and a post-translation list applied
//! to script text after namespace and scope rewriting. Rules run strictly
//! in list order, each rule's output feeding the next as input.

use recast_domain::rule::{RuleSet, TransformRule};
use regex::RegexBuilder;

/// Which of the two rule lists to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePass {
    /// The pre-parse list, applied to raw document text.
    Preprocess,
    /// The post-translation list, applied to translated script text.
    Postprocess,
}

/// Diagnostic for a rule that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDiagnostic {
    /// Name of the offending rule.
    pub rule: String,
    /// Why it was skipped.
    pub message: String,
}

/// Output of one rule pass over one text.
#[derive(Debug)]
pub struct RulePassOutput {
    /// The rewritten text.
    pub text: String,
    /// Rules whose patterns failed to compile; they were skipped and the
    /// remaining rules still ran.
    pub skipped: Vec<RuleDiagnostic>,
}

/// Holds the two ordered rule lists and applies them in sequence.
///
/// An engine's rule lists must be treated as immutable for the duration of
/// any conversion using them; callers sharing one engine across concurrent
/// conversions guard mutation with their own mutual exclusion.
#[derive(Debug, Clone)]
pub struct TransformRuleEngine {
    preprocess: Vec<TransformRule>,
    postprocess: Vec<TransformRule>,
}

impl TransformRuleEngine {
    /// Creates an engine from an explicit rule set, with no built-ins.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self {
            preprocess: rules.preprocess_rules,
            postprocess: rules.postprocess_rules,
        }
    }

    /// Creates an engine holding the built-in default set.
    #[must_use]
    pub fn with_defaults(experimental: bool) -> Self {
        Self::new(builtin_rules(experimental))
    }

    /// Creates an engine from the built-ins merged with a user-supplied
    /// set: a user rule replaces the built-in of the same name in place,
    /// and new rules are appended in their supplied order.
    #[must_use]
    pub fn merged(user: RuleSet, experimental: bool) -> Self {
        let defaults = builtin_rules(experimental);
        Self {
            preprocess: merge_rules(defaults.preprocess_rules, user.preprocess_rules),
            postprocess: merge_rules(defaults.postprocess_rules, user.postprocess_rules),
        }
    }

    /// The rules of one pass, in application order.
    #[must_use]
    pub fn rules(&self, pass: RulePass) -> &[TransformRule] {
        match pass {
            RulePass::Preprocess => &self.preprocess,
            RulePass::Postprocess => &self.postprocess,
        }
    }

    /// Enables or disables a rule by name. Returns false if no rule of
    /// that name exists in the given pass.
    pub fn set_enabled(&mut self, pass: RulePass, name: &str, enabled: bool) -> bool {
        let list = match pass {
            RulePass::Preprocess => &mut self.preprocess,
            RulePass::Postprocess => &mut self.postprocess,
        };
        match list.iter_mut().find(|r| r.name == name) {
            Some(rule) => {
                rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Appends a rule to the end of one pass's list.
    pub fn append(&mut self, pass: RulePass, rule: TransformRule) {
        match pass {
            RulePass::Preprocess => self.preprocess.push(rule),
            RulePass::Postprocess => self.postprocess.push(rule),
        }
    }

    /// Applies one pass to the text. Disabled rules are complete no-ops; a
    /// rule whose pattern fails to compile is skipped and reported, never
    /// aborting the remaining rules.
    #[must_use]
    pub fn apply(&self, text: &str, pass: RulePass) -> RulePassOutput {
        let mut output = text.to_string();
        let mut skipped = Vec::new();

        for rule in self.rules(pass) {
            if !rule.enabled {
                continue;
            }
            match RegexBuilder::new(&rule.pattern)
                .case_insensitive(rule.case_insensitive)
                .multi_line(rule.multiline)
                .build()
            {
                Ok(re) => {
                    output = re
                        .replace_all(&output, rule.replacement.as_str())
                        .into_owned();
                }
                Err(err) => skipped.push(RuleDiagnostic {
                    rule: rule.name.clone(),
                    message: err.to_string(),
                }),
            }
        }

        RulePassOutput {
            text: output,
            skipped,
        }
    }
}

fn merge_rules(defaults: Vec<TransformRule>, user: Vec<TransformRule>) -> Vec<TransformRule> {
    let mut merged = defaults;
    for rule in user {
        match merged.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => *existing = rule,
            None => merged.push(rule),
        }
    }
    merged
}

/// The built-in default rule set.
///
/// Preprocess rules rewrite Postman dynamic-variable templates in the raw
/// document text into Insomnia template tags. Postprocess rules patch
/// script API calls that the namespace rewrite alone cannot fix.
/// Experimental-flagged rules are included only when opted into.
#[must_use]
pub fn builtin_rules(experimental: bool) -> RuleSet {
    let preprocess = vec![
        TransformRule::new("dynamic-guid", r"\{\{\$guid\}\}", "{% uuid 'v4' %}")
            .describe("rewrite the {{$guid}} dynamic variable to a template tag"),
        TransformRule::new("dynamic-timestamp", r"\{\{\$timestamp\}\}", "{% now 'unix' %}")
            .describe("rewrite the {{$timestamp}} dynamic variable to a template tag"),
        TransformRule::new(
            "dynamic-iso-timestamp",
            r"\{\{\$isoTimestamp\}\}",
            "{% now 'iso-8601' %}",
        )
        .describe("rewrite the {{$isoTimestamp}} dynamic variable to a template tag"),
        TransformRule::new("dynamic-random-int", r"\{\{\$randomInt\}\}", "{% random 0, 1000 %}")
            .describe("rewrite the {{$randomInt}} dynamic variable to a template tag")
            .experimental(),
    ];

    let postprocess = vec![
        TransformRule::new(
            "globals-to-base-environment",
            r"insomnia\.globals\.",
            "insomnia.baseEnvironment.",
        )
        .describe("the target API keeps workspace-wide values on the base environment"),
        TransformRule::new(
            "variables-to-environment",
            r"insomnia\.variables\.",
            "insomnia.environment.",
        )
        .describe("the generic variable accessor maps onto the active environment"),
        TransformRule::new(
            "iteration-data-to-environment",
            r"insomnia\.iterationData\.",
            "insomnia.environment.",
        )
        .describe("runner iteration data has no direct equivalent; read the environment")
        .experimental(),
    ];

    let keep = |rules: Vec<TransformRule>| {
        rules
            .into_iter()
            .filter(|r| experimental || !r.experimental)
            .collect()
    };

    RuleSet {
        preprocess_rules: keep(preprocess),
        postprocess_rules: keep(postprocess),
    }
}
