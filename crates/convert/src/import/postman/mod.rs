//! Postman source-document handling.

pub mod builder;
pub mod environment;
pub mod environment_types;
pub mod response_examples;
pub mod types;

pub use builder::{BuiltCollection, ResourceTreeBuilder};
pub use environment::{ConvertedEnvironment, convert_environment};
pub use environment_types::{PostmanEnvVariable, PostmanEnvironment};
pub use types::PostmanCollection;
