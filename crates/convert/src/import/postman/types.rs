//! Postman Collection v2.x type definitions.
//!
//! These types mirror the exported JSON closely and use `#[serde(default)]`
//! extensively: real-world exports omit fields freely, and a missing field
//! must become an empty structure rather than a parse failure.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

/// Root structure for a Postman Collection export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanCollection {
    pub info: PostmanInfo,
    #[serde(default)]
    pub item: Vec<PostmanItem>,
    #[serde(default)]
    pub variable: Vec<PostmanVariable>,
    #[serde(default)]
    pub auth: Option<PostmanAuth>,
    #[serde(default)]
    pub event: Vec<PostmanEvent>,
}

/// Collection metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanInfo {
    pub name: String,
    #[serde(rename = "_postman_id", default)]
    pub postman_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
}

/// An item is a folder when it carries a nested `item` list, and a request
/// when it carries a `request` value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub item: Option<Vec<Self>>,
    #[serde(default)]
    pub request: Option<PostmanRequest>,
    /// Saved response examples.
    #[serde(default)]
    pub response: Vec<PostmanResponseExample>,
    /// Scripts attached to this item.
    #[serde(default)]
    pub event: Vec<PostmanEvent>,
    /// Item-level auth override (folders).
    #[serde(default)]
    pub auth: Option<PostmanAuth>,
}

impl PostmanItem {
    /// Returns true if this item is a folder.
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        self.item.is_some()
    }

    /// Returns true if this item is a request.
    #[must_use]
    pub const fn is_request(&self) -> bool {
        self.request.is_some()
    }
}

/// A request is either a bare URL string shorthand or a full object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostmanRequest {
    Url(String),
    Detailed(Box<PostmanRequestDetails>),
}

impl PostmanRequest {
    /// The uppercase HTTP method, defaulting to GET.
    #[must_use]
    pub fn method(&self) -> String {
        match self {
            Self::Url(_) => "GET".to_string(),
            Self::Detailed(details) => details
                .method
                .as_deref()
                .filter(|m| !m.trim().is_empty())
                .map_or_else(|| "GET".to_string(), str::to_uppercase),
        }
    }

    /// The request URL.
    #[must_use]
    pub fn url(&self) -> PostmanUrl {
        match self {
            Self::Url(raw) => PostmanUrl::Simple(raw.clone()),
            Self::Detailed(details) => details.url.clone(),
        }
    }

    /// Request headers; empty for the shorthand form.
    #[must_use]
    pub fn headers(&self) -> &[PostmanHeader] {
        match self {
            Self::Url(_) => &[],
            Self::Detailed(details) => &details.header,
        }
    }

    /// Request body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&PostmanBody> {
        match self {
            Self::Url(_) => None,
            Self::Detailed(details) => details.body.as_ref(),
        }
    }

    /// Request-level auth, if any.
    #[must_use]
    pub const fn auth(&self) -> Option<&PostmanAuth> {
        match self {
            Self::Url(_) => None,
            Self::Detailed(details) => details.auth.as_ref(),
        }
    }

    /// Request description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Url(_) => None,
            Self::Detailed(details) => details.description.as_deref(),
        }
    }
}

/// Full request object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanRequestDetails {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub url: PostmanUrl,
    #[serde(default)]
    pub header: Vec<PostmanHeader>,
    #[serde(default)]
    pub body: Option<PostmanBody>,
    #[serde(default)]
    pub auth: Option<PostmanAuth>,
    #[serde(default)]
    pub description: Option<String>,
}

/// URL: a simple string or a structured object.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum PostmanUrl {
    #[default]
    Empty,
    Simple(String),
    Structured(PostmanUrlStructured),
}

impl PostmanUrl {
    /// The raw URL string; reconstructed from parts when the structured
    /// form omits `raw`.
    #[must_use]
    pub fn raw(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Simple(raw) => raw.clone(),
            Self::Structured(url) => url.raw.clone().unwrap_or_else(|| url.compose()),
        }
    }

    /// Structured query parameters, when present.
    #[must_use]
    pub fn query_params(&self) -> &[PostmanQueryParam] {
        match self {
            Self::Structured(url) => &url.query,
            _ => &[],
        }
    }

    /// Structured path placeholder values, when present.
    #[must_use]
    pub fn path_variables(&self) -> &[PostmanPathVariable] {
        match self {
            Self::Structured(url) => &url.variable,
            _ => &[],
        }
    }
}

/// Structured URL object.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PostmanUrlStructured {
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub host: Vec<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub query: Vec<PostmanQueryParam>,
    #[serde(default)]
    pub variable: Vec<PostmanPathVariable>,
}

impl PostmanUrlStructured {
    fn compose(&self) -> String {
        let mut raw = String::new();
        if let Some(protocol) = &self.protocol {
            raw.push_str(protocol);
            raw.push_str("://");
        }
        raw.push_str(&self.host.join("."));
        if let Some(port) = &self.port {
            raw.push(':');
            raw.push_str(port);
        }
        if !self.path.is_empty() {
            raw.push('/');
            raw.push_str(&self.path.join("/"));
        }
        raw
    }
}

/// Query parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanQueryParam {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Path placeholder (for URL templates like `:id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanPathVariable {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Request header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanHeader {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanBody {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub urlencoded: Vec<PostmanFormParam>,
    #[serde(default)]
    pub formdata: Vec<PostmanFormDataParam>,
    #[serde(default)]
    pub file: Option<PostmanBodyFile>,
    #[serde(default)]
    pub graphql: Option<PostmanGraphQl>,
    #[serde(default)]
    pub options: Option<PostmanBodyOptions>,
}

impl PostmanBody {
    /// Raw-mode language hint (e.g. `json`), when exported.
    #[must_use]
    pub fn raw_language(&self) -> Option<&str> {
        self.options
            .as_ref()
            .and_then(|options| options.raw.as_ref())
            .and_then(|raw| raw.language.as_deref())
    }
}

/// Form URL-encoded parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanFormParam {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Multipart form-data parameter; may reference a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanFormDataParam {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(rename = "type", default)]
    pub param_type: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl PostmanFormDataParam {
    /// Returns true for file-upload fields.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.param_type.as_deref() == Some("file")
    }
}

/// Binary file body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanBodyFile {
    #[serde(default)]
    pub src: Option<String>,
}

/// GraphQL body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanGraphQl {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub variables: Option<String>,
}

/// Raw-mode body options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanBodyOptions {
    #[serde(default)]
    pub raw: Option<PostmanRawOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanRawOptions {
    #[serde(default)]
    pub language: Option<String>,
}

/// Authentication configuration. Each known type carries its parameters in
/// a keyed list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanAuth {
    #[serde(rename = "type", default)]
    pub auth_type: String,
    #[serde(default)]
    pub basic: Vec<PostmanAuthParam>,
    #[serde(default)]
    pub bearer: Vec<PostmanAuthParam>,
    #[serde(default)]
    pub apikey: Vec<PostmanAuthParam>,
    #[serde(default)]
    pub oauth2: Vec<PostmanAuthParam>,
    #[serde(default)]
    pub digest: Vec<PostmanAuthParam>,
    #[serde(default)]
    pub hawk: Vec<PostmanAuthParam>,
    #[serde(default)]
    pub ntlm: Vec<PostmanAuthParam>,
    #[serde(default)]
    pub awsv4: Vec<PostmanAuthParam>,
}

impl PostmanAuth {
    /// Looks up a parameter value by key in one of the keyed lists.
    #[must_use]
    pub fn param(&self, params: &[PostmanAuthParam], key: &str) -> Option<String> {
        params
            .iter()
            .find(|p| p.key == key)
            .and_then(|p| p.value.clone())
    }
}

/// Auth parameter (key/value pair).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanAuthParam {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Collection-level variable definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanVariable {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Event (pre-request or test script hook).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanEvent {
    #[serde(default)]
    pub listen: String,
    #[serde(default)]
    pub script: Option<PostmanScript>,
}

/// Script definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanScript {
    #[serde(rename = "type", default)]
    pub script_type: Option<String>,
    #[serde(default)]
    pub exec: ScriptSource,
}

/// Script source: exporters emit either a single string or a line array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptSource {
    Single(String),
    Lines(Vec<String>),
}

impl Default for ScriptSource {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl ScriptSource {
    /// The script source as one newline-joined string.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::Single(source) => source.clone(),
            Self::Lines(lines) => lines.join("\n"),
        }
    }
}

/// A saved response example attached to a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanResponseExample {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_collection() {
        let json = r#"{
            "info": {
                "name": "Shop API",
                "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
            },
            "item": []
        }"#;

        let collection: PostmanCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.info.name, "Shop API");
        assert!(collection.item.is_empty());
        assert!(collection.variable.is_empty());
    }

    #[test]
    fn test_request_shorthand_url_string() {
        let json = r#"{
            "name": "Ping",
            "request": "https://api.example.com/ping"
        }"#;

        let item: PostmanItem = serde_json::from_str(json).unwrap();
        assert!(item.is_request());
        let request = item.request.unwrap();
        assert_eq!(request.method(), "GET");
        assert_eq!(request.url().raw(), "https://api.example.com/ping");
    }

    #[test]
    fn test_request_method_defaults_and_uppercases() {
        let json = r#"{"url": "https://api.example.com", "method": "patch"}"#;
        let request: PostmanRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.method(), "PATCH");

        let json = r#"{"url": "https://api.example.com"}"#;
        let request: PostmanRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.method(), "GET");
    }

    #[test]
    fn test_structured_url_composes_when_raw_missing() {
        let json = r#"{
            "protocol": "https",
            "host": ["api", "example", "com"],
            "path": ["users", ":id"]
        }"#;

        let url: PostmanUrlStructured = serde_json::from_str(json).unwrap();
        assert_eq!(
            PostmanUrl::Structured(url).raw(),
            "https://api.example.com/users/:id"
        );
    }

    #[test]
    fn test_script_source_forms() {
        let single: PostmanScript =
            serde_json::from_str(r#"{"exec": "pm.test('a', fn);"}"#).unwrap();
        assert_eq!(single.exec.joined(), "pm.test('a', fn);");

        let lines: PostmanScript =
            serde_json::from_str(r#"{"exec": ["line1", "line2"]}"#).unwrap();
        assert_eq!(lines.exec.joined(), "line1\nline2");
    }

    #[test]
    fn test_auth_param_lookup() {
        let json = r#"{
            "type": "bearer",
            "bearer": [{"key": "token", "value": "abc123"}]
        }"#;

        let auth: PostmanAuth = serde_json::from_str(json).unwrap();
        assert_eq!(auth.param(&auth.bearer, "token"), Some("abc123".to_string()));
        assert_eq!(auth.param(&auth.bearer, "missing"), None);
    }

    #[test]
    fn test_folder_detection() {
        let json = r#"{"name": "Orders", "item": []}"#;
        let item: PostmanItem = serde_json::from_str(json).unwrap();
        assert!(item.is_folder());
        assert!(!item.is_request());
    }

    #[test]
    fn test_response_example_is_lenient() {
        let json = r#"{"name": "Created", "code": 201, "status": "Created",
                       "originalRequest": {"method": "POST"}, "body": "{}"}"#;
        let example: PostmanResponseExample = serde_json::from_str(json).unwrap();
        assert_eq!(example.code, Some(201));
    }
}
