//! Insomnia v4 export serialization.
//!
//! The serializer maps the flat resource list into a complete export
//! document, synthesizing the pieces the resource tree itself does not
//! carry: the workspace wrapper, a base environment with the collection's
//! variable data, and an empty cookie jar.

mod insomnia;

pub use insomnia::{export_collection, export_environment};

use thiserror::Error;

/// Output flavor for the export document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Deterministic pretty-printed JSON.
    Json,
    /// YAML, the format the target tool itself exports by default.
    #[default]
    Yaml,
}

impl ExportFormat {
    /// Conventional file extension for this flavor.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Export error type.
#[derive(Debug, Error)]
pub enum ExportError {
    /// JSON rendering failed.
    #[error("JSON export failed: {0}")]
    Json(#[from] crate::serialization::SerializationError),

    /// YAML rendering failed.
    #[error("YAML export failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
