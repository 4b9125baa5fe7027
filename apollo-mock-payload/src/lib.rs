//! Generates mock responses for compiled GraphQL operations.
//!
//! Given the normalized selection tree of an operation, the generator walks every selection and
//! produces a payload that has the exact shape the operation expects. Values come from caller
//! supplied [`MockResolver`]s when they exist, and from deterministic placeholders otherwise.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]
#![warn(unreachable_pub)]

pub mod configuration;
mod defaults;
pub mod error;
mod generator;
pub mod json_ext;
mod metadata;
mod resolver;
mod response;
pub mod selection;

pub use configuration::Configuration;
pub use error::MockError;
pub use generator::generate_data;
pub use generator::generate_data_for_operation;
pub use generator::MockPayloadGenerator;
pub use generator::OperationKind;
pub use generator::DEFAULT_MOCK_TYPENAME;
pub use generator::TYPENAME;
pub use metadata::FieldTypeDetails;
pub use metadata::SelectionMetadata;
pub use metadata::SELECTION_TYPE_INFO_KEY;
pub use resolver::FieldContext;
pub use resolver::IdGenerator;
pub use resolver::MockResolver;
pub use resolver::MockResolvers;
pub use response::Response;
