//! Postman Environment type definitions.

use serde::{Deserialize, Serialize};

/// Root structure for a Postman Environment export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanEnvironment {
    /// Environment name.
    pub name: String,
    /// Environment variables.
    #[serde(default)]
    pub values: Vec<PostmanEnvVariable>,
    /// Export scope marker emitted by the source tool.
    #[serde(rename = "_postman_variable_scope", default)]
    pub variable_scope: Option<String>,
}

/// One environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanEnvVariable {
    /// Variable name.
    pub key: String,
    /// Variable value.
    #[serde(default)]
    pub value: String,
    /// Disabled variables are dropped during conversion.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Variable type (`default`, `secret`, `any`).
    #[serde(rename = "type", default)]
    pub var_type: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl PostmanEnvVariable {
    /// Returns true for secret-typed variables.
    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.var_type.as_deref() == Some("secret")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_environment() {
        let json = r#"{
            "name": "Staging",
            "values": [
                {"key": "BASE_URL", "value": "https://staging.example.com", "enabled": true},
                {"key": "API_KEY", "value": "shhh", "enabled": false, "type": "secret"}
            ],
            "_postman_variable_scope": "environment"
        }"#;

        let env: PostmanEnvironment = serde_json::from_str(json).unwrap();
        assert_eq!(env.name, "Staging");
        assert_eq!(env.values.len(), 2);
        assert!(!env.values[0].is_secret());
        assert!(env.values[1].is_secret());
        assert!(!env.values[1].enabled);
    }

    #[test]
    fn test_enabled_defaults_to_true() {
        let var: PostmanEnvVariable =
            serde_json::from_str(r#"{"key": "HOST", "value": "example.com"}"#).unwrap();
        assert!(var.enabled);
    }
}
