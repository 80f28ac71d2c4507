//! Entry gate: classifies a parsed document before conversion.

use serde_json::Value;

/// The recognized document shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Postman Collection, schema v2.1.
    CollectionV21,
    /// Postman Collection, schema v2.0.
    CollectionV20,
    /// Postman Environment (flat key/value list).
    Environment,
    /// Anything else. Never force-converted.
    Unrecognized,
}

impl DocumentKind {
    /// Returns true for either collection flavor.
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::CollectionV21 | Self::CollectionV20)
    }

    /// Display label used in previews and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CollectionV21 => "Postman Collection v2.1",
            Self::CollectionV20 => "Postman Collection v2.0",
            Self::Environment => "Postman Environment",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Classifies a parsed document by required-field shape.
///
/// A collection carries an `info.schema` URL naming the version plus a
/// nested `item` array. An environment carries a `name` plus a flat
/// `values` array of `{key, value, enabled}` entries and no `info` block.
#[must_use]
pub fn classify(document: &Value) -> DocumentKind {
    if let Some(info) = document.get("info") {
        let schema = info.get("schema").and_then(Value::as_str).unwrap_or("");
        if document.get("item").is_some_and(Value::is_array) {
            if schema.contains("v2.1") {
                return DocumentKind::CollectionV21;
            }
            if schema.contains("v2.0") {
                return DocumentKind::CollectionV20;
            }
        }
        return DocumentKind::Unrecognized;
    }

    let has_name = document.get("name").is_some_and(Value::is_string);
    let values_shape = document
        .get("values")
        .and_then(Value::as_array)
        .is_some_and(|values| values.iter().all(|entry| entry.get("key").is_some()));
    if has_name && values_shape {
        return DocumentKind::Environment;
    }

    DocumentKind::Unrecognized
}
