//! Conversion entry points.
//!
//! [`CollectionConverter`] wires the rule engine, script translator and
//! tree builder together. One converter can serve many documents; each
//! `convert` call is a pure function of the document text and the
//! converter's configuration, with its own identifier state.

use recast_domain::error::ConvertError;
use recast_domain::rule::RuleSet;
use recast_engine::rules::{RulePass, TransformRuleEngine};
use recast_engine::translator::ScriptTranslator;

use super::detector::{DocumentKind, classify};
use super::postman::builder::{BuiltCollection, ResourceTreeBuilder};
use super::postman::environment::{ConvertedEnvironment, convert_environment};
use super::postman::environment_types::PostmanEnvironment;
use super::postman::types::PostmanCollection;
use super::warning::ImportWarning;

/// Toggles consumed by the conversion pipeline.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Run the pre-parse rule pass over the raw document text.
    pub preprocess: bool,
    /// Run the post-translation rule pass over each script.
    pub postprocess: bool,
    /// Include the experimental subset of the built-in rules.
    pub experimental: bool,
    /// Wrap the collection's content in an extra same-named folder.
    pub root_folder: bool,
    /// User rule set, merged over the built-in defaults.
    pub rules: Option<RuleSet>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            preprocess: true,
            postprocess: true,
            experimental: false,
            root_folder: true,
            rules: None,
        }
    }
}

/// Outcome of converting one document.
#[derive(Debug)]
pub enum Conversion {
    /// A collection became a resource tree.
    Collection(BuiltCollection),
    /// An environment became a flat data map.
    Environment(ConvertedEnvironment),
}

/// Result of validating a document without converting it.
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether the document would convert.
    pub is_valid: bool,
    /// Detected shape.
    pub kind: DocumentKind,
    /// Validation issues found.
    pub issues: Vec<String>,
}

/// Counts gathered by a preview run.
#[derive(Debug)]
pub struct ImportPreview {
    /// Detected shape.
    pub kind: DocumentKind,
    /// Document name.
    pub name: String,
    /// Folders that would be emitted.
    pub folder_count: usize,
    /// Requests that would be emitted.
    pub request_count: usize,
    /// Variables that would be carried over.
    pub variable_count: usize,
    /// Diagnostics the conversion would produce.
    pub warnings: Vec<ImportWarning>,
}

/// Converts Postman documents into the intermediate resource tree.
pub struct CollectionConverter {
    engine: TransformRuleEngine,
    options: ConvertOptions,
}

impl CollectionConverter {
    /// Creates a converter. The rule engine is assembled once from the
    /// options: built-in defaults, optionally merged with a user set.
    #[must_use]
    pub fn new(options: ConvertOptions) -> Self {
        let engine = options.rules.clone().map_or_else(
            || TransformRuleEngine::with_defaults(options.experimental),
            |rules| TransformRuleEngine::merged(rules, options.experimental),
        );
        Self { engine, options }
    }

    /// The engine, for runtime rule mutation (enable/disable/append).
    /// Do not mutate while conversions using this converter are in flight.
    pub fn engine_mut(&mut self) -> &mut TransformRuleEngine {
        &mut self.engine
    }

    /// Converts one document.
    ///
    /// # Errors
    ///
    /// [`ConvertError::MalformedInput`] when the text does not parse;
    /// [`ConvertError::FormatRejected`] when it parses but matches no
    /// recognized shape. Zero emitted items is a valid result, distinct
    /// from both.
    pub fn convert(&self, raw: &str) -> Result<Conversion, ConvertError> {
        let mut warnings = Vec::new();

        let text = if self.options.preprocess {
            let output = self.engine.apply(raw, RulePass::Preprocess);
            warnings.extend(
                output
                    .skipped
                    .into_iter()
                    .map(|d| ImportWarning::rule_skipped("preprocess", d)),
            );
            output.text
        } else {
            raw.to_string()
        };

        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|err| ConvertError::MalformedInput(err.to_string()))?;

        match classify(&value) {
            kind if kind.is_collection() => {
                let collection: PostmanCollection = serde_json::from_value(value)
                    .map_err(|err| ConvertError::MalformedInput(err.to_string()))?;

                let translator = ScriptTranslator::new(&self.engine, self.options.postprocess);
                let builder =
                    ResourceTreeBuilder::new(raw, collection.info.name.clone(), translator);
                let mut built = builder.build(&collection, self.options.root_folder);
                warnings.append(&mut built.warnings);
                built.warnings = warnings;
                Ok(Conversion::Collection(built))
            }
            DocumentKind::Environment => {
                let env: PostmanEnvironment = serde_json::from_value(value)
                    .map_err(|err| ConvertError::MalformedInput(err.to_string()))?;

                let mut converted = convert_environment(&env);
                warnings.append(&mut converted.warnings);
                converted.warnings = warnings;
                Ok(Conversion::Environment(converted))
            }
            _ => Err(ConvertError::FormatRejected),
        }
    }

    /// Checks a document's shape without converting it.
    #[must_use]
    pub fn validate(&self, raw: &str) -> ValidationResult {
        let mut issues = Vec::new();

        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                issues.push(format!("invalid JSON: {err}"));
                return ValidationResult {
                    is_valid: false,
                    kind: DocumentKind::Unrecognized,
                    issues,
                };
            }
        };

        let kind = classify(&value);
        match kind {
            DocumentKind::Unrecognized => {
                issues.push(
                    "document is neither a Postman collection nor an environment".to_string(),
                );
            }
            DocumentKind::Environment => {
                if let Err(err) = serde_json::from_value::<PostmanEnvironment>(value) {
                    issues.push(format!("invalid environment: {err}"));
                }
            }
            _ => {
                if let Err(err) = serde_json::from_value::<PostmanCollection>(value) {
                    issues.push(format!("invalid collection: {err}"));
                }
            }
        }

        ValidationResult {
            is_valid: issues.is_empty(),
            kind,
            issues,
        }
    }

    /// Converts a document and reports counts instead of the result.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::convert`].
    pub fn preview(&self, raw: &str) -> Result<ImportPreview, ConvertError> {
        let kind = serde_json::from_str::<serde_json::Value>(raw)
            .map_or(DocumentKind::Unrecognized, |value| classify(&value));

        match self.convert(raw)? {
            Conversion::Collection(built) => {
                let folder_count = built
                    .resources
                    .iter()
                    .filter(|node| node.is_folder())
                    .count();
                let request_count = built.resources.len() - folder_count;
                Ok(ImportPreview {
                    kind,
                    name: built.name,
                    folder_count,
                    request_count,
                    variable_count: built.variables.len(),
                    warnings: built.warnings,
                })
            }
            Conversion::Environment(converted) => Ok(ImportPreview {
                kind: DocumentKind::Environment,
                name: converted.name,
                folder_count: 0,
                request_count: 0,
                variable_count: converted.data.len(),
                warnings: converted.warnings,
            }),
        }
    }
}

impl Default for CollectionConverter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recast_domain::resource::ResourceNode;
    use recast_domain::rule::TransformRule;

    const COLLECTION: &str = r#"{
        "info": {"name": "Shop API", "schema": "v2.1"},
        "item": [
            {"name": "Ping", "request": "https://api.example.com/ping"}
        ]
    }"#;

    #[test]
    fn test_convert_collection() {
        let converter = CollectionConverter::default();
        let Conversion::Collection(built) = converter.convert(COLLECTION).unwrap() else {
            panic!("collection expected");
        };
        assert_eq!(built.name, "Shop API");
        // Wrapper folder plus the request.
        assert_eq!(built.resources.len(), 2);
    }

    #[test]
    fn test_convert_environment() {
        let converter = CollectionConverter::default();
        let raw = r#"{"name": "Dev", "values": [{"key": "a", "value": "1"}]}"#;
        let Conversion::Environment(env) = converter.convert(raw).unwrap() else {
            panic!("environment expected");
        };
        assert_eq!(env.name, "Dev");
        assert_eq!(env.data.len(), 1);
    }

    #[test]
    fn test_malformed_input_aborts_only_that_document() {
        let converter = CollectionConverter::default();
        let err = converter.convert("{not json").unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput(_)));
        // The converter is still usable afterwards.
        assert!(converter.convert(COLLECTION).is_ok());
    }

    #[test]
    fn test_unrecognized_shape_is_rejected_not_failed() {
        let converter = CollectionConverter::default();
        let err = converter.convert(r#"{"foo": 1}"#).unwrap_err();
        assert_eq!(err, ConvertError::FormatRejected);
        assert!(err.is_rejection());
    }

    #[test]
    fn test_empty_collection_is_valid_and_distinct_from_failure() {
        let converter = CollectionConverter::new(ConvertOptions {
            root_folder: false,
            ..ConvertOptions::default()
        });
        let raw = r#"{"info": {"name": "Empty", "schema": "v2.1"}, "item": []}"#;
        let Conversion::Collection(built) = converter.convert(raw).unwrap() else {
            panic!("collection expected");
        };
        assert!(built.resources.is_empty());
    }

    #[test]
    fn test_preprocess_pass_rewrites_raw_text() {
        let converter = CollectionConverter::default();
        let raw = r#"{
            "info": {"name": "Dyn", "schema": "v2.1"},
            "item": [{"name": "New", "request": {
                "method": "POST",
                "url": "https://api.example.com",
                "body": {"mode": "raw", "raw": "{\"id\": \"{{$guid}}\"}"}
            }}]
        }"#;

        let Conversion::Collection(built) = converter.convert(raw).unwrap() else {
            panic!("collection expected");
        };
        let ResourceNode::Request(request) = built.resources.last().unwrap() else {
            panic!("request expected");
        };
        let text = request.body.text.as_deref().unwrap();
        assert!(text.contains("{% uuid 'v4' %}"), "{text}");
    }

    #[test]
    fn test_preprocess_pass_can_be_disabled() {
        let converter = CollectionConverter::new(ConvertOptions {
            preprocess: false,
            ..ConvertOptions::default()
        });
        let raw = r#"{
            "info": {"name": "Dyn", "schema": "v2.1"},
            "item": [{"name": "New", "request": {
                "method": "POST",
                "url": "https://api.example.com",
                "body": {"mode": "raw", "raw": "{\"id\": \"{{$guid}}\"}"}
            }}]
        }"#;

        let Conversion::Collection(built) = converter.convert(raw).unwrap() else {
            panic!("collection expected");
        };
        let ResourceNode::Request(request) = built.resources.last().unwrap() else {
            panic!("request expected");
        };
        assert!(request.body.text.as_deref().unwrap().contains("{{$guid}}"));
    }

    #[test]
    fn test_disabled_user_rule_never_alters_text() {
        let mut off_rule = TransformRule::new("kill-ping", "ping", "pong");
        off_rule.enabled = false;
        let converter = CollectionConverter::new(ConvertOptions {
            rules: Some(RuleSet {
                preprocess_rules: vec![off_rule],
                postprocess_rules: Vec::new(),
            }),
            ..ConvertOptions::default()
        });

        let Conversion::Collection(built) = converter.convert(COLLECTION).unwrap() else {
            panic!("collection expected");
        };
        let ResourceNode::Request(request) = built.resources.last().unwrap() else {
            panic!("request expected");
        };
        assert_eq!(request.url, "https://api.example.com/ping");
    }

    #[test]
    fn test_broken_preprocess_rule_reports_and_continues() {
        let converter = CollectionConverter::new(ConvertOptions {
            rules: Some(RuleSet {
                preprocess_rules: vec![TransformRule::new("broken", "(oops", "x")],
                postprocess_rules: Vec::new(),
            }),
            ..ConvertOptions::default()
        });

        let Conversion::Collection(built) = converter.convert(COLLECTION).unwrap() else {
            panic!("collection expected");
        };
        assert!(built.warnings.iter().any(|w| w.message.contains("broken")));
    }

    #[test]
    fn test_validate_reports_shape() {
        let converter = CollectionConverter::default();
        let result = converter.validate(COLLECTION);
        assert!(result.is_valid);
        assert_eq!(result.kind, DocumentKind::CollectionV21);

        let result = converter.validate("{broken");
        assert!(!result.is_valid);
        assert_eq!(result.kind, DocumentKind::Unrecognized);
    }

    #[test]
    fn test_preview_counts() {
        let converter = CollectionConverter::default();
        let raw = r#"{
            "info": {"name": "Shop", "schema": "v2.1"},
            "item": [
                {"name": "Users", "item": [
                    {"name": "List", "request": "https://api.example.com/users"},
                    {"name": "Create", "request": {"method": "POST", "url": "https://api.example.com/users"}}
                ]}
            ],
            "variable": [{"key": "base", "value": "x"}]
        }"#;

        let preview = converter.preview(raw).unwrap();
        // Wrapper folder + Users folder.
        assert_eq!(preview.folder_count, 2);
        assert_eq!(preview.request_count, 2);
        assert_eq!(preview.variable_count, 1);
    }
}
