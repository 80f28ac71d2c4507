//! Resource tree construction from a parsed Postman collection.
//!
//! A single depth-first, pre-order traversal turns the nested folder and
//! request hierarchy into a flat, parent-linked list. Identifier state is
//! scoped to one source document; the folder-name stack exists only for
//! the duration of one build and keys the folder-scoped variable rewrite
//! inside scripts.

use std::collections::BTreeMap;

use recast_domain::id::IdentifierGenerator;
use recast_domain::resource::{
    ApiKeyPlacement, Authentication, BodyParameter, FolderResource, Header, Parameter,
    PathParameter, RequestBody, RequestResource, ResourceNode, WORKSPACE_PARENT,
};
use recast_engine::translator::ScriptTranslator;

use super::response_examples::append_response_examples;
use super::types::{
    PostmanAuth, PostmanBody, PostmanCollection, PostmanEvent, PostmanHeader, PostmanItem,
    PostmanQueryParam, PostmanRequest, PostmanUrl, PostmanVariable,
};
use crate::import::warning::ImportWarning;

/// Result of building one collection.
#[derive(Debug)]
pub struct BuiltCollection {
    /// Collection name.
    pub name: String,
    /// Collection description.
    pub description: String,
    /// The flat resource list, folders always preceding their descendants.
    pub resources: Vec<ResourceNode>,
    /// Enabled collection-level variables.
    pub variables: BTreeMap<String, String>,
    /// Diagnostics collected along the way.
    pub warnings: Vec<ImportWarning>,
}

/// Walks the source tree, assigning identifiers, parent links and ordering
/// keys, and converting per-request fields.
pub struct ResourceTreeBuilder<'a> {
    ids: IdentifierGenerator,
    translator: ScriptTranslator<'a>,
    collection_name: String,
    folder_stack: Vec<String>,
    epoch_millis: i64,
    emitted: i64,
    warnings: Vec<ImportWarning>,
}

impl<'a> ResourceTreeBuilder<'a> {
    /// Creates a builder for one conversion call. `raw_source` seeds the
    /// identifier generator; the ordering epoch is captured here, once.
    #[must_use]
    pub fn new(
        raw_source: &str,
        collection_name: impl Into<String>,
        translator: ScriptTranslator<'a>,
    ) -> Self {
        Self {
            ids: IdentifierGenerator::new(raw_source),
            translator,
            collection_name: collection_name.into(),
            folder_stack: Vec::new(),
            epoch_millis: chrono::Utc::now().timestamp_millis(),
            emitted: 0,
            warnings: Vec::new(),
        }
    }

    /// Builds the flat resource list for a collection.
    ///
    /// With `wrap_root` the collection's content is nested inside an extra
    /// folder named after the collection, which also carries the
    /// collection-level variable map, default authentication and scripts.
    #[must_use]
    pub fn build(mut self, collection: &PostmanCollection, wrap_root: bool) -> BuiltCollection {
        let name = collection.info.name.clone();
        let description = collection.info.description.clone().unwrap_or_default();
        let variables = collection_variables(&collection.variable);
        let mut resources = Vec::new();

        let root_parent = if wrap_root {
            let folder = self.root_wrapper(collection, variables.clone());
            let id = folder.id.clone();
            resources.push(ResourceNode::Folder(folder));
            id
        } else {
            if collection.auth.is_some() || !collection.event.is_empty() {
                self.warnings.push(ImportWarning::info(
                    &name,
                    "collection-level authentication/scripts need the root folder and were skipped",
                ));
            }
            WORKSPACE_PARENT.to_string()
        };

        self.import_items(&collection.item, &root_parent, &mut resources);

        BuiltCollection {
            name,
            description,
            resources,
            variables,
            warnings: self.warnings,
        }
    }

    fn root_wrapper(
        &mut self,
        collection: &PostmanCollection,
        variables: BTreeMap<String, String>,
    ) -> FolderResource {
        let name = collection.info.name.clone();
        let (authentication, auth_warnings) = convert_auth(collection.auth.as_ref(), &name);
        self.warnings.extend(auth_warnings);
        let (pre_request_script, after_response_script) =
            self.convert_scripts(&collection.event, &name);

        FolderResource {
            id: self.ids.next("fld"),
            parent_id: WORKSPACE_PARENT.to_string(),
            name,
            description: collection.info.description.clone().unwrap_or_default(),
            sort_key: self.next_sort_key(),
            environment: variables,
            authentication,
            pre_request_script,
            after_response_script,
        }
    }

    /// Imports a sibling list in source order. Folders recurse depth-first,
    /// so every folder is emitted before its descendants.
    fn import_items(
        &mut self,
        items: &[PostmanItem],
        parent_id: &str,
        out: &mut Vec<ResourceNode>,
    ) {
        for item in items {
            if item.is_folder() {
                self.folder_stack.push(item.name.clone());
                let folder = self.convert_folder(item, parent_id);
                let id = folder.id.clone();
                out.push(ResourceNode::Folder(folder));
                if let Some(children) = &item.item {
                    self.import_items(children, &id, out);
                }
                self.folder_stack.pop();
            } else if let Some(request) = &item.request {
                let converted = self.convert_request(item, request, parent_id);
                out.push(ResourceNode::Request(converted));
            } else {
                self.warnings.push(ImportWarning::info(
                    self.item_path(&item.name),
                    "item has neither sub-items nor a request and was skipped",
                ));
            }
        }
    }

    fn convert_folder(&mut self, item: &PostmanItem, parent_id: &str) -> FolderResource {
        // The stack already holds this folder, so its own scripts scope to
        // itself.
        let path = self.folder_stack.join("/");
        let (authentication, auth_warnings) = convert_auth(item.auth.as_ref(), &path);
        self.warnings.extend(auth_warnings);
        let (pre_request_script, after_response_script) = self.convert_scripts(&item.event, &path);

        FolderResource {
            id: self.ids.next("fld"),
            parent_id: parent_id.to_string(),
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            sort_key: self.next_sort_key(),
            environment: BTreeMap::new(),
            authentication,
            pre_request_script,
            after_response_script,
        }
    }

    fn convert_request(
        &mut self,
        item: &PostmanItem,
        request: &PostmanRequest,
        parent_id: &str,
    ) -> RequestResource {
        let path = self.item_path(&item.name);

        let url = request.url();
        let (trimmed_url, inline_params) = split_inline_query(&url.raw());
        let parameters = if url.query_params().is_empty() {
            inline_params
        } else {
            convert_query(url.query_params())
        };
        let path_parameters = collect_path_parameters(&url, &trimmed_url);

        let headers = convert_headers(request.headers());
        let body = convert_body(request.body(), &path, &mut self.warnings);
        let (authentication, auth_warnings) = convert_auth(request.auth(), &path);
        self.warnings.extend(auth_warnings);
        let (pre_request_script, after_response_script) = self.convert_scripts(&item.event, &path);

        let description = item
            .description
            .clone()
            .or_else(|| request.description().map(str::to_string))
            .unwrap_or_default();
        let description =
            append_response_examples(&description, &item.response, &path, &mut self.warnings);

        RequestResource {
            id: self.ids.next("req"),
            parent_id: parent_id.to_string(),
            name: item.name.clone(),
            description,
            sort_key: self.next_sort_key(),
            method: request.method(),
            url: trimmed_url,
            headers,
            parameters,
            path_parameters,
            body,
            authentication,
            pre_request_script,
            after_response_script,
        }
    }

    /// Translates the pre-request and test hooks of one item. The enclosing
    /// scope handed to the translator is the top of the folder stack, or
    /// the collection's own name when the stack is empty.
    fn convert_scripts(&mut self, events: &[PostmanEvent], path: &str) -> (String, String) {
        let scope = self
            .folder_stack
            .last()
            .cloned()
            .unwrap_or_else(|| self.collection_name.clone());

        let mut pre_request = String::new();
        let mut after_response = String::new();

        for event in events {
            let Some(script) = &event.script else {
                continue;
            };
            let source = script.exec.joined();
            if source.trim().is_empty() {
                continue;
            }

            let translated = self.translator.translate(&source, &scope);
            for diagnostic in translated.skipped_rules {
                self.warnings
                    .push(ImportWarning::rule_skipped(path, diagnostic));
            }

            let target = match event.listen.as_str() {
                "prerequest" => &mut pre_request,
                "test" => &mut after_response,
                other => {
                    self.warnings.push(ImportWarning::info(
                        path,
                        format!("script hook '{other}' has no equivalent and was skipped"),
                    ));
                    continue;
                }
            };
            if !target.is_empty() {
                target.push('\n');
            }
            target.push_str(&translated.text);
        }

        (pre_request, after_response)
    }

    fn next_sort_key(&mut self) -> i64 {
        let key = -(self.epoch_millis - self.emitted);
        self.emitted += 1;
        key
    }

    fn item_path(&self, name: &str) -> String {
        if self.folder_stack.is_empty() {
            name.to_string()
        } else {
            format!("{}/{name}", self.folder_stack.join("/"))
        }
    }
}

/// Enabled collection-level variables as an ordered map.
#[must_use]
pub fn collection_variables(variables: &[PostmanVariable]) -> BTreeMap<String, String> {
    variables
        .iter()
        .filter(|v| !v.disabled)
        .map(|v| (v.key.clone(), v.value.clone().unwrap_or_default()))
        .collect()
}

/// Converts headers, keeping disabled entries with their flag.
#[must_use]
pub fn convert_headers(headers: &[PostmanHeader]) -> Vec<Header> {
    headers
        .iter()
        .map(|h| Header {
            name: h.key.clone(),
            value: h.value.clone(),
            description: h.description.clone(),
            disabled: h.disabled,
        })
        .collect()
}

/// Trims an inline query string off a URL, returning the bare URL and the
/// parsed parameter list.
#[must_use]
pub fn split_inline_query(raw: &str) -> (String, Vec<Parameter>) {
    let Some((base, query)) = raw.split_once('?') else {
        return (raw.to_string(), Vec::new());
    };

    let parameters = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            Parameter {
                name: name.to_string(),
                value: value.to_string(),
                disabled: false,
            }
        })
        .collect();

    (base.to_string(), parameters)
}

/// Converts structured query parameters, keeping disabled entries.
#[must_use]
pub fn convert_query(params: &[PostmanQueryParam]) -> Vec<Parameter> {
    params
        .iter()
        .map(|p| Parameter {
            name: p.key.clone(),
            value: p.value.clone().unwrap_or_default(),
            disabled: p.disabled,
        })
        .collect()
}

/// Collects path placeholders: explicit values from the structured URL,
/// plus any `:segment` in the path that lacks one.
#[must_use]
pub fn collect_path_parameters(url: &PostmanUrl, trimmed_url: &str) -> Vec<PathParameter> {
    let mut parameters: Vec<PathParameter> = url
        .path_variables()
        .iter()
        .map(|v| PathParameter {
            name: v.key.clone(),
            value: v.value.clone().unwrap_or_default(),
        })
        .collect();

    for segment in trimmed_url.split('/') {
        if let Some(name) = segment.strip_prefix(':') {
            if !name.is_empty() && !parameters.iter().any(|p| p.name == name) {
                parameters.push(PathParameter {
                    name: name.to_string(),
                    value: String::new(),
                });
            }
        }
    }

    parameters
}

/// Converts a request body, defaulting to an empty structure.
#[must_use]
pub fn convert_body(
    body: Option<&PostmanBody>,
    path: &str,
    warnings: &mut Vec<ImportWarning>,
) -> RequestBody {
    let Some(body) = body else {
        return RequestBody::default();
    };

    match body.mode.as_str() {
        "raw" => {
            let text = body.raw.clone().unwrap_or_default();
            if text.is_empty() {
                return RequestBody::default();
            }
            let mime_type = match body.raw_language() {
                Some("json") => "application/json",
                Some("xml") => "application/xml",
                Some("html") => "text/html",
                Some("javascript") => "application/javascript",
                _ => {
                    let trimmed = text.trim_start();
                    if trimmed.starts_with('{') || trimmed.starts_with('[') {
                        "application/json"
                    } else {
                        "text/plain"
                    }
                }
            };
            RequestBody {
                mime_type: Some(mime_type.to_string()),
                text: Some(text),
                ..RequestBody::default()
            }
        }
        "urlencoded" => RequestBody {
            mime_type: Some("application/x-www-form-urlencoded".to_string()),
            params: body
                .urlencoded
                .iter()
                .map(|p| BodyParameter {
                    name: p.key.clone(),
                    value: p.value.clone().unwrap_or_default(),
                    file_name: None,
                    disabled: p.disabled,
                })
                .collect(),
            ..RequestBody::default()
        },
        "formdata" => {
            let params: Vec<BodyParameter> = body
                .formdata
                .iter()
                .map(|p| BodyParameter {
                    name: p.key.clone(),
                    value: if p.is_file() {
                        String::new()
                    } else {
                        p.value.clone().unwrap_or_default()
                    },
                    file_name: if p.is_file() { p.src.clone() } else { None },
                    disabled: p.disabled,
                })
                .collect();

            let file_count = params.iter().filter(|p| p.file_name.is_some()).count();
            if file_count > 0 {
                warnings.push(ImportWarning::warning(
                    path,
                    format!("{file_count} file field(s) reference paths; file content is not carried over"),
                ));
            }

            RequestBody {
                mime_type: Some("multipart/form-data".to_string()),
                params,
                ..RequestBody::default()
            }
        }
        "file" => {
            warnings.push(ImportWarning::warning(
                path,
                "binary body converted without file content; re-attach the file",
            ));
            RequestBody {
                mime_type: Some("application/octet-stream".to_string()),
                file_name: body.file.as_ref().and_then(|f| f.src.clone()),
                ..RequestBody::default()
            }
        }
        "graphql" => body.graphql.as_ref().map_or_else(RequestBody::default, |gql| {
            let payload = serde_json::json!({
                "query": gql.query,
                "variables": gql.variables.clone().unwrap_or_default(),
            });
            RequestBody {
                mime_type: Some("application/graphql".to_string()),
                text: Some(payload.to_string()),
                ..RequestBody::default()
            }
        }),
        "" => RequestBody::default(),
        other => {
            warnings.push(ImportWarning::warning(
                path,
                format!("unknown body mode '{other}' was skipped"),
            ));
            RequestBody::default()
        }
    }
}

/// Converts authentication, defaulting to the empty configuration.
#[must_use]
pub fn convert_auth(
    auth: Option<&PostmanAuth>,
    path: &str,
) -> (Authentication, Vec<ImportWarning>) {
    let mut warnings = Vec::new();
    let Some(auth) = auth else {
        return (Authentication::Empty, warnings);
    };

    let converted = match auth.auth_type.as_str() {
        "" | "noauth" => Authentication::Empty,
        "basic" => Authentication::Basic {
            username: auth.param(&auth.basic, "username").unwrap_or_default(),
            password: auth.param(&auth.basic, "password").unwrap_or_default(),
        },
        "bearer" => Authentication::Bearer {
            token: auth.param(&auth.bearer, "token").unwrap_or_default(),
            prefix: String::new(),
        },
        "apikey" => {
            let placement = match auth.param(&auth.apikey, "in").as_deref() {
                Some("query") => ApiKeyPlacement::QueryParams,
                _ => ApiKeyPlacement::Header,
            };
            Authentication::ApiKey {
                key: auth.param(&auth.apikey, "key").unwrap_or_default(),
                value: auth.param(&auth.apikey, "value").unwrap_or_default(),
                placement,
            }
        }
        "oauth2" => {
            warnings.push(ImportWarning::warning(
                path,
                "OAuth2 settings converted partially; tokens usually need re-acquisition",
            ));
            Authentication::OAuth2 {
                grant_type: auth.param(&auth.oauth2, "grant_type").unwrap_or_default(),
                access_token: auth.param(&auth.oauth2, "accessToken").unwrap_or_default(),
                access_token_url: auth
                    .param(&auth.oauth2, "accessTokenUrl")
                    .unwrap_or_default(),
                client_id: auth.param(&auth.oauth2, "clientId").unwrap_or_default(),
                client_secret: auth.param(&auth.oauth2, "clientSecret").unwrap_or_default(),
            }
        }
        "digest" => Authentication::Digest {
            username: auth.param(&auth.digest, "username").unwrap_or_default(),
            password: auth.param(&auth.digest, "password").unwrap_or_default(),
        },
        "hawk" | "ntlm" | "awsv4" | "edgegrid" => {
            warnings.push(ImportWarning::warning(
                path,
                format!(
                    "authentication type '{}' is not supported and was skipped",
                    auth.auth_type
                ),
            ));
            Authentication::Empty
        }
        other => {
            warnings.push(ImportWarning::warning(
                path,
                format!("unknown authentication type '{other}' was skipped"),
            ));
            Authentication::Empty
        }
    };

    (converted, warnings)
}
