//! The flat, parent-linked resource tree emitted by the import pipeline.
//!
//! Nodes are produced in depth-first pre-order during a single traversal of
//! one source document and are immutable afterwards. A node's `parent_id`
//! is always either [`WORKSPACE_PARENT`] or the id of a node appearing
//! earlier in the emitted list, so the list is a valid forward-only
//! parent-linked forest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel parent id for nodes attached directly to the workspace root.
/// The serializer replaces it with the generated workspace id.
pub const WORKSPACE_PARENT: &str = "__WORKSPACE_ID__";

/// A single emitted node: either a folder or a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceNode {
    /// A named grouping node.
    Folder(FolderResource),
    /// An HTTP request definition.
    Request(RequestResource),
}

impl ResourceNode {
    /// The node's generated identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(f) => &f.id,
            Self::Request(r) => &r.id,
        }
    }

    /// The id of the enclosing node, or [`WORKSPACE_PARENT`].
    #[must_use]
    pub fn parent_id(&self) -> &str {
        match self {
            Self::Folder(f) => &f.parent_id,
            Self::Request(r) => &r.parent_id,
        }
    }

    /// The node's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.name,
            Self::Request(r) => &r.name,
        }
    }

    /// The ordering scalar; strictly increasing across one emitted list.
    #[must_use]
    pub const fn sort_key(&self) -> i64 {
        match self {
            Self::Folder(f) => f.sort_key,
            Self::Request(r) => r.sort_key,
        }
    }

    /// Returns true for folder nodes.
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

/// A folder node. Carries the collection-level variable map when it is the
/// synthesized root wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FolderResource {
    /// Generated identifier (`fld_` + 32 hex chars).
    pub id: String,
    /// Enclosing folder id or [`WORKSPACE_PARENT`].
    pub parent_id: String,
    /// Display name.
    pub name: String,
    /// Markdown description.
    #[serde(default)]
    pub description: String,
    /// Ordering scalar.
    pub sort_key: i64,
    /// Folder-scoped variable data.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    /// Default authentication for requests below this folder.
    #[serde(default)]
    pub authentication: Authentication,
    /// Translated pre-request script source.
    #[serde(default)]
    pub pre_request_script: String,
    /// Translated after-response script source.
    #[serde(default)]
    pub after_response_script: String,
}

/// A request node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestResource {
    /// Generated identifier (`req_` + 32 hex chars).
    pub id: String,
    /// Enclosing folder id or [`WORKSPACE_PARENT`].
    pub parent_id: String,
    /// Display name.
    pub name: String,
    /// Markdown description, possibly with appended response examples.
    #[serde(default)]
    pub description: String,
    /// Ordering scalar.
    pub sort_key: i64,
    /// Uppercase HTTP method.
    pub method: String,
    /// Request URL with any inline query string trimmed off.
    pub url: String,
    /// Request headers.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Query parameters, including those trimmed from the URL.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Path placeholders such as `:id`.
    #[serde(default)]
    pub path_parameters: Vec<PathParameter>,
    /// Request body.
    #[serde(default)]
    pub body: RequestBody,
    /// Request authentication.
    #[serde(default)]
    pub authentication: Authentication,
    /// Translated pre-request script source.
    #[serde(default)]
    pub pre_request_script: String,
    /// Translated after-response script source.
    #[serde(default)]
    pub after_response_script: String,
}

/// A single request header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    #[serde(default)]
    pub value: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the header is switched off.
    #[serde(default)]
    pub disabled: bool,
}

/// A query parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    #[serde(default)]
    pub value: String,
    /// Whether the parameter is switched off.
    #[serde(default)]
    pub disabled: bool,
}

/// A path placeholder value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathParameter {
    /// Placeholder name without the leading `:`.
    pub name: String,
    /// Default value, if the source carried one.
    #[serde(default)]
    pub value: String,
}

/// The request body. The default value is an empty body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequestBody {
    /// MIME type of the payload, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Textual payload for raw bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Form fields for urlencoded and multipart bodies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<BodyParameter>,
    /// Source file path for binary bodies. The file content itself is not
    /// carried over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl RequestBody {
    /// Returns true if no payload of any kind is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mime_type.is_none()
            && self.text.is_none()
            && self.params.is_empty()
            && self.file_name.is_none()
    }
}

/// One form field of a urlencoded or multipart body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BodyParameter {
    /// Field name.
    pub name: String,
    /// Field value; empty for file fields.
    #[serde(default)]
    pub value: String,
    /// Source file path for file fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Whether the field is switched off.
    #[serde(default)]
    pub disabled: bool,
}

/// Request or folder authentication. The default is an empty configuration
/// rather than a missing value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Authentication {
    /// No authentication configured.
    #[default]
    Empty,
    /// HTTP basic authentication.
    Basic {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The token value.
        token: String,
        /// Header prefix; empty means the conventional `Bearer`.
        #[serde(default)]
        prefix: String,
    },
    /// API key authentication.
    ApiKey {
        /// Key name.
        key: String,
        /// Key value.
        value: String,
        /// Where the key is sent.
        #[serde(default)]
        placement: ApiKeyPlacement,
    },
    /// OAuth 2.0 authentication. Only the fields that survive a static
    /// conversion; tokens usually need re-acquisition in the target tool.
    #[serde(rename = "oauth2")]
    OAuth2 {
        /// Grant type name as carried by the source document.
        #[serde(default)]
        grant_type: String,
        /// Access token, if one was exported.
        #[serde(default)]
        access_token: String,
        /// Token endpoint URL.
        #[serde(default)]
        access_token_url: String,
        /// Client identifier.
        #[serde(default)]
        client_id: String,
        /// Client secret.
        #[serde(default)]
        client_secret: String,
    },
    /// HTTP digest authentication.
    Digest {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
}

impl Authentication {
    /// Returns true if no authentication is configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Placement of an API key credential.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyPlacement {
    /// Sent as a request header.
    #[default]
    Header,
    /// Sent as a query parameter.
    QueryParams,
}
