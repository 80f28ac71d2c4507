//! Maps the flat resource tree into an Insomnia v4 export document.

use std::collections::BTreeMap;

use recast_domain::id::IdentifierGenerator;
use recast_domain::resource::{
    ApiKeyPlacement, Authentication, FolderResource, RequestBody, RequestResource, ResourceNode,
    WORKSPACE_PARENT,
};
use serde_json::{Value, json};

use super::{ExportError, ExportFormat};
use crate::import::postman::builder::BuiltCollection;
use crate::import::postman::environment::ConvertedEnvironment;
use crate::serialization::to_json_stable;

const EXPORT_FORMAT_VERSION: u32 = 4;
const EXPORT_SOURCE: &str = concat!("recast:v", env!("CARGO_PKG_VERSION"));

/// Serializes a converted collection as an Insomnia v4 export document.
///
/// # Errors
///
/// Returns an error if rendering to the requested format fails.
pub fn export_collection(
    built: &BuiltCollection,
    format: ExportFormat,
) -> Result<String, ExportError> {
    let mut ids = IdentifierGenerator::new(&built.name);
    let workspace_id = ids.next("wrk");

    let mut resources = Vec::with_capacity(built.resources.len() + 3);
    resources.push(workspace_resource(
        &workspace_id,
        &built.name,
        &built.description,
    ));
    resources.push(environment_resource(
        &ids.next("env"),
        &workspace_id,
        "Base Environment",
        &built.variables,
    ));
    resources.push(cookie_jar_resource(&ids.next("jar"), &workspace_id));
    for node in &built.resources {
        resources.push(node_resource(node, &workspace_id));
    }

    render(resources, format)
}

/// Serializes a converted environment through the same document wrapper.
///
/// # Errors
///
/// Returns an error if rendering to the requested format fails.
pub fn export_environment(
    env: &ConvertedEnvironment,
    format: ExportFormat,
) -> Result<String, ExportError> {
    let mut ids = IdentifierGenerator::new(&env.name);
    let workspace_id = ids.next("wrk");

    let resources = vec![
        workspace_resource(&workspace_id, &env.name, ""),
        environment_resource(&ids.next("env"), &workspace_id, &env.name, &env.data),
        cookie_jar_resource(&ids.next("jar"), &workspace_id),
    ];

    render(resources, format)
}

fn render(resources: Vec<Value>, format: ExportFormat) -> Result<String, ExportError> {
    let document = json!({
        "_type": "export",
        "__export_format": EXPORT_FORMAT_VERSION,
        "__export_date": chrono::Utc::now().to_rfc3339(),
        "__export_source": EXPORT_SOURCE,
        "resources": resources,
    });

    match format {
        ExportFormat::Json => Ok(to_json_stable(&document)?),
        ExportFormat::Yaml => Ok(serde_yaml::to_string(&document)?),
    }
}

fn workspace_resource(id: &str, name: &str, description: &str) -> Value {
    json!({
        "_id": id,
        "parentId": Value::Null,
        "_type": "workspace",
        "name": name,
        "description": description,
        "scope": "collection",
    })
}

fn environment_resource(
    id: &str,
    workspace_id: &str,
    name: &str,
    data: &BTreeMap<String, String>,
) -> Value {
    json!({
        "_id": id,
        "parentId": workspace_id,
        "_type": "environment",
        "name": name,
        "data": data,
    })
}

fn cookie_jar_resource(id: &str, workspace_id: &str) -> Value {
    json!({
        "_id": id,
        "parentId": workspace_id,
        "_type": "cookie_jar",
        "name": "Default Jar",
        "cookies": [],
    })
}

fn node_resource(node: &ResourceNode, workspace_id: &str) -> Value {
    match node {
        ResourceNode::Folder(folder) => folder_resource(folder, workspace_id),
        ResourceNode::Request(request) => request_resource(request, workspace_id),
    }
}

fn resolve_parent<'a>(parent_id: &'a str, workspace_id: &'a str) -> &'a str {
    if parent_id == WORKSPACE_PARENT {
        workspace_id
    } else {
        parent_id
    }
}

fn folder_resource(folder: &FolderResource, workspace_id: &str) -> Value {
    json!({
        "_id": folder.id,
        "parentId": resolve_parent(&folder.parent_id, workspace_id),
        "_type": "request_group",
        "name": folder.name,
        "description": folder.description,
        "environment": folder.environment,
        "authentication": authentication_value(&folder.authentication),
        "preRequestScript": folder.pre_request_script,
        "afterResponseScript": folder.after_response_script,
        "metaSortKey": folder.sort_key,
    })
}

fn request_resource(request: &RequestResource, workspace_id: &str) -> Value {
    json!({
        "_id": request.id,
        "parentId": resolve_parent(&request.parent_id, workspace_id),
        "_type": "request",
        "name": request.name,
        "description": request.description,
        "method": request.method,
        "url": request.url,
        "headers": request.headers.iter().map(|h| {
            json!({
                "name": h.name,
                "value": h.value,
                "description": h.description.clone().unwrap_or_default(),
                "disabled": h.disabled,
            })
        }).collect::<Vec<_>>(),
        "parameters": request.parameters.iter().map(|p| {
            json!({"name": p.name, "value": p.value, "disabled": p.disabled})
        }).collect::<Vec<_>>(),
        "pathParameters": request.path_parameters.iter().map(|p| {
            json!({"name": p.name, "value": p.value})
        }).collect::<Vec<_>>(),
        "body": body_value(&request.body),
        "authentication": authentication_value(&request.authentication),
        "preRequestScript": request.pre_request_script,
        "afterResponseScript": request.after_response_script,
        "metaSortKey": request.sort_key,
    })
}

fn body_value(body: &RequestBody) -> Value {
    if body.is_empty() {
        return json!({});
    }

    let mut value = json!({});
    if let Some(mime_type) = &body.mime_type {
        value["mimeType"] = json!(mime_type);
    }
    if let Some(text) = &body.text {
        value["text"] = json!(text);
    }
    if let Some(file_name) = &body.file_name {
        value["fileName"] = json!(file_name);
    }
    if !body.params.is_empty() {
        value["params"] = body
            .params
            .iter()
            .map(|p| {
                let mut param = json!({
                    "name": p.name,
                    "value": p.value,
                    "disabled": p.disabled,
                });
                if let Some(file_name) = &p.file_name {
                    param["fileName"] = json!(file_name);
                    param["type"] = json!("file");
                }
                param
            })
            .collect::<Vec<_>>()
            .into();
    }
    value
}

fn authentication_value(auth: &Authentication) -> Value {
    match auth {
        Authentication::Empty => json!({}),
        Authentication::Basic { username, password } => json!({
            "type": "basic",
            "username": username,
            "password": password,
        }),
        Authentication::Bearer { token, prefix } => json!({
            "type": "bearer",
            "token": token,
            "prefix": prefix,
        }),
        Authentication::ApiKey {
            key,
            value,
            placement,
        } => json!({
            "type": "apikey",
            "key": key,
            "value": value,
            "addTo": match placement {
                ApiKeyPlacement::Header => "header",
                ApiKeyPlacement::QueryParams => "queryParams",
            },
        }),
        Authentication::OAuth2 {
            grant_type,
            access_token,
            access_token_url,
            client_id,
            client_secret,
        } => json!({
            "type": "oauth2",
            "grantType": grant_type,
            "accessToken": access_token,
            "accessTokenUrl": access_token_url,
            "clientId": client_id,
            "clientSecret": client_secret,
        }),
        Authentication::Digest { username, password } => json!({
            "type": "digest",
            "username": username,
            "password": password,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::import::warning::ImportWarning;

    fn sample_collection() -> BuiltCollection {
        let folder = FolderResource {
            id: "fld_0000000000000000000000000000aaaa".to_string(),
            parent_id: WORKSPACE_PARENT.to_string(),
            name: "Orders".to_string(),
            description: String::new(),
            sort_key: -100,
            environment: BTreeMap::new(),
            authentication: Authentication::Empty,
            pre_request_script: String::new(),
            after_response_script: String::new(),
        };
        let request = RequestResource {
            id: "req_0000000000000000000000000000bbbb".to_string(),
            parent_id: folder.id.clone(),
            name: "Create".to_string(),
            description: String::new(),
            sort_key: -99,
            method: "POST".to_string(),
            url: "https://api.example.com/orders".to_string(),
            headers: Vec::new(),
            parameters: Vec::new(),
            path_parameters: Vec::new(),
            body: RequestBody::default(),
            authentication: Authentication::Bearer {
                token: "tok".to_string(),
                prefix: String::new(),
            },
            pre_request_script: "insomnia.environment.get('a');".to_string(),
            after_response_script: String::new(),
        };

        let mut variables = BTreeMap::new();
        variables.insert("base".to_string(), "https://api.example.com".to_string());

        BuiltCollection {
            name: "Shop API".to_string(),
            description: "demo".to_string(),
            resources: vec![
                ResourceNode::Folder(folder),
                ResourceNode::Request(request),
            ],
            variables,
            warnings: Vec::<ImportWarning>::new(),
        }
    }

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_export_synthesizes_wrapper_resources() {
        let out = export_collection(&sample_collection(), ExportFormat::Json).unwrap();
        let doc = parse(&out);

        assert_eq!(doc["_type"], "export");
        assert_eq!(doc["__export_format"], 4);
        let resources = doc["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 5);
        assert_eq!(resources[0]["_type"], "workspace");
        assert_eq!(resources[1]["_type"], "environment");
        assert_eq!(resources[1]["data"]["base"], "https://api.example.com");
        assert_eq!(resources[2]["_type"], "cookie_jar");
        assert_eq!(resources[2]["cookies"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_sentinel_parent_is_rewritten_to_workspace_id() {
        let out = export_collection(&sample_collection(), ExportFormat::Json).unwrap();
        let doc = parse(&out);

        let resources = doc["resources"].as_array().unwrap();
        let workspace_id = resources[0]["_id"].as_str().unwrap();
        assert!(workspace_id.starts_with("wrk_"));

        let folder = &resources[3];
        assert_eq!(folder["_type"], "request_group");
        assert_eq!(folder["parentId"].as_str().unwrap(), workspace_id);
        assert!(!out.contains(WORKSPACE_PARENT));

        let request = &resources[4];
        assert_eq!(request["parentId"], folder["_id"]);
    }

    #[test]
    fn test_request_fields_are_mapped() {
        let out = export_collection(&sample_collection(), ExportFormat::Json).unwrap();
        let doc = parse(&out);

        let request = &doc["resources"].as_array().unwrap()[4];
        assert_eq!(request["method"], "POST");
        assert_eq!(request["url"], "https://api.example.com/orders");
        assert_eq!(request["authentication"]["type"], "bearer");
        assert_eq!(request["preRequestScript"], "insomnia.environment.get('a');");
        assert_eq!(request["metaSortKey"], -99);
    }

    #[test]
    fn test_empty_body_and_auth_serialize_as_empty_objects() {
        let out = export_collection(&sample_collection(), ExportFormat::Json).unwrap();
        let doc = parse(&out);

        let folder = &doc["resources"].as_array().unwrap()[3];
        assert_eq!(folder["authentication"], json!({}));
        let request = &doc["resources"].as_array().unwrap()[4];
        assert_eq!(request["body"], json!({}));
    }

    #[test]
    fn test_yaml_flavor_renders() {
        let out = export_collection(&sample_collection(), ExportFormat::Yaml).unwrap();
        assert!(out.contains("_type: export"));
        assert!(out.contains("request_group"));
    }

    #[test]
    fn test_export_environment_document() {
        let mut data = BTreeMap::new();
        data.insert("BASE_URL".to_string(), "https://dev.example.com".to_string());
        let env = ConvertedEnvironment {
            name: "Dev".to_string(),
            data,
            warnings: Vec::new(),
        };

        let out = export_environment(&env, ExportFormat::Json).unwrap();
        let doc = parse(&out);
        let resources = doc["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[1]["name"], "Dev");
        assert_eq!(resources[1]["data"]["BASE_URL"], "https://dev.example.com");
    }
}
