//! Flat environment conversion.
//!
//! No hierarchy here: enabled variables become entries of an ordered data
//! map, disabled variables are dropped.

use std::collections::BTreeMap;

use super::environment_types::PostmanEnvironment;
use crate::import::warning::ImportWarning;

/// A converted environment document.
#[derive(Debug)]
pub struct ConvertedEnvironment {
    /// Environment name.
    pub name: String,
    /// Enabled variables keyed by name.
    pub data: BTreeMap<String, String>,
    /// Diagnostics collected during conversion.
    pub warnings: Vec<ImportWarning>,
}

/// Converts a Postman environment into the flat data map.
#[must_use]
pub fn convert_environment(env: &PostmanEnvironment) -> ConvertedEnvironment {
    let mut warnings = Vec::new();
    let mut data = BTreeMap::new();

    for variable in &env.values {
        if !variable.enabled {
            continue;
        }
        if variable.is_secret() {
            warnings.push(ImportWarning::info(
                format!("{}/{}", env.name, variable.key),
                "secret variable converted as a plain value",
            ));
        }
        data.insert(variable.key.clone(), variable.value.clone());
    }

    ConvertedEnvironment {
        name: env.name.clone(),
        data,
        warnings,
    }
}
