//! Recast Domain - Core conversion types
//!
//! This crate defines the intermediate resource model produced by the
//! import pipeline, the declarative transform-rule model consumed by the
//! rule engine, and identifier generation for emitted resources.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod id;
pub mod resource;
pub mod rule;

pub use error::{ConvertError, ConvertResult};
pub use id::IdentifierGenerator;
pub use resource::{
    ApiKeyPlacement, Authentication, BodyParameter, FolderResource, Header, Parameter,
    PathParameter, RequestBody, RequestResource, ResourceNode, WORKSPACE_PARENT,
};
pub use rule::{RuleSet, TransformRule};
