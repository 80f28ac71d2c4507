//! Script source rewriting from the Postman API surface to Insomnia's.
//!
//! The rewriting is deliberately text/pattern-based rather than
//! syntax-aware: it can misfire inside string literals or comments, and it
//! rewrites qualified references such as `foo.pm.environment`. Both are
//! preserved source behavior, not guarantees.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::rules::{RuleDiagnostic, RulePass, TransformRuleEngine};

#[allow(clippy::expect_used)]
static NAMESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[^A-Za-z0-9_$])pm\.").expect("namespace pattern"));

#[allow(clippy::expect_used)]
static SHARED_GET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"insomnia\.collectionVariables\.get\(").expect("shared get pattern"));

#[allow(clippy::expect_used)]
static SHARED_SET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"insomnia\.collectionVariables\.set\(").expect("shared set pattern"));

/// Result of translating one script.
#[derive(Debug)]
pub struct TranslatedScript {
    /// The rewritten script source.
    pub text: String,
    /// Postprocess rules that failed to compile while patching the script.
    pub skipped_rules: Vec<RuleDiagnostic>,
}

/// Rewrites one script's source text.
///
/// `translate` is a pure function of the script and the enclosing scope
/// name, but it is NOT idempotent in general: re-running it over its own
/// output can double-rewrite when a rule's output matches that rule's own
/// pattern. Callers translate each raw script exactly once.
#[derive(Debug, Clone, Copy)]
pub struct ScriptTranslator<'a> {
    engine: &'a TransformRuleEngine,
    postprocess: bool,
}

impl<'a> ScriptTranslator<'a> {
    /// Creates a translator backed by the given engine. When `postprocess`
    /// is false the final rule pass is skipped.
    #[must_use]
    pub const fn new(engine: &'a TransformRuleEngine, postprocess: bool) -> Self {
        Self {
            engine,
            postprocess,
        }
    }

    /// Rewrites a script for the target API.
    ///
    /// `enclosing_scope` is the name of the nearest enclosing folder, or
    /// the collection's own name for scripts at the top level. It keys the
    /// folder handle that shared-variable accessors are rewritten to.
    #[must_use]
    pub fn translate(&self, source: &str, enclosing_scope: &str) -> TranslatedScript {
        if source.is_empty() {
            return TranslatedScript {
                text: String::new(),
                skipped_rules: Vec::new(),
            };
        }

        // Namespace rewrite at token boundaries. `foo.pm.` is still
        // rewritten: a dot is not an identifier character.
        let text = NAMESPACE.replace_all(source, "${1}insomnia.");

        // Shared collection-level accessors become folder-scoped: resolve a
        // handle for the enclosing scope, then get/set through it.
        let scope = escape_scope(enclosing_scope);
        let get_target = format!("(await insomnia.parentFolders.get('{scope}')).environment.get(");
        let set_target = format!("(await insomnia.parentFolders.get('{scope}')).environment.set(");
        let text = SHARED_GET.replace_all(&text, NoExpand(&get_target));
        let text = SHARED_SET.replace_all(&text, NoExpand(&set_target));

        if self.postprocess {
            let output = self.engine.apply(&text, RulePass::Postprocess);
            TranslatedScript {
                text: output.text,
                skipped_rules: output.skipped,
            }
        } else {
            TranslatedScript {
                text: text.into_owned(),
                skipped_rules: Vec::new(),
            }
        }
    }
}

fn escape_scope(name: &str) -> String {
    name.replace('\\', "\\\\").replace('\'', "\\'")
}
