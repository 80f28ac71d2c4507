//! Recast Convert - import/export pipeline
//!
//! Imports Postman Collection v2.1/v2.0 and Environment documents into a
//! flat, parent-linked resource tree, and serializes that tree as an
//! Insomnia v4 export document (JSON or YAML).
//!
//! The pipeline performs no file I/O; callers hand in document text and
//! receive document text back, along with a structured warning stream.

pub mod export;
pub mod import;
pub mod serialization;

pub use export::{ExportError, ExportFormat, export_collection, export_environment};
pub use import::{
    BuiltCollection, CollectionConverter, ConvertOptions, ConvertedEnvironment, Conversion,
    DocumentKind, ImportPreview, ImportWarning, ValidationResult, WarningSeverity, WarningStats,
    classify,
};
pub use serialization::{SerializationError, to_json_stable};
