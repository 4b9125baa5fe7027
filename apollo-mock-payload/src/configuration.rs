//! Declarative configuration for mock payload generation.
//!
//! Example:
//!
//! ```yaml
//! variables:
//!   showEmail: true
//! mocks:
//!   User:
//!     name: Alice
//!   Int: 7
//! selection_metadata:
//!   viewer.status:
//!     type: Status
//!     plural: false
//!     nullable: false
//!     enumValues: [ACTIVE, BLOCKED]
//! ```

use std::collections::HashMap;
use std::str::FromStr;

use displaydoc::Display;
use schemars::gen::SchemaSettings;
use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::generator::MockPayloadGenerator;
use crate::json_ext::Object;
use crate::metadata::SelectionMetadata;
use crate::resolver::MockResolvers;

/// Configuration error.
#[derive(Debug, Error, Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// could not deserialize configuration: {0}
    DeserializeConfigError(serde_yaml::Error),
}

/// Inputs of a generation that can be written down as data.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct Configuration {
    /// Operation variables, by name
    #[schemars(with = "HashMap<String, serde_json::Value>")]
    pub variables: Object,

    /// Constant mock values, by GraphQL type name. Objects are used as defaults for every object
    /// of the type, other values for every field of the type.
    #[schemars(with = "HashMap<String, serde_json::Value>")]
    pub mocks: Object,

    /// Type details of the selections, by dotted response path
    #[schemars(with = "HashMap<String, serde_json::Value>")]
    pub selection_metadata: Object,
}

impl FromStr for Configuration {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_yaml::from_str(s).map_err(ConfigurationError::DeserializeConfigError)
    }
}

impl Configuration {
    /// Registers one constant resolver per entry of `mocks`.
    pub fn resolvers(&self) -> MockResolvers {
        self.mocks
            .iter()
            .fold(MockResolvers::new(), |resolvers, (type_name, value)| {
                resolvers.with_constant(type_name.as_str(), value.clone())
            })
    }

    /// The selection metadata, without its malformed entries.
    pub fn selection_metadata(&self) -> SelectionMetadata {
        SelectionMetadata::from_raw(&self.selection_metadata)
    }

    pub fn into_generator(self) -> MockPayloadGenerator {
        MockPayloadGenerator::builder()
            .resolvers(self.resolvers())
            .selection_metadata(self.selection_metadata())
            .variables(self.variables)
            .build()
    }
}

/// Generate a JSON schema for the configuration.
pub fn generate_config_schema() -> RootSchema {
    let settings = SchemaSettings::draft07().with(|s| {
        s.option_nullable = true;
        s.option_add_null_type = false;
        s.inline_subschemas = true;
    });
    settings
        .into_generator()
        .into_root_schema_for::<Configuration>()
}

#[cfg(test)]
mod tests {
    use serde_json_bytes::json;

    use super::*;
    use crate::json_ext::Value;
    use crate::selection::Operation;

    const CONFIG: &str = r#"
variables:
  showEmail: true
mocks:
  User:
    name: Alice
  Int: 7
selection_metadata:
  viewer.status:
    type: Status
    plural: false
    nullable: false
    enumValues: [ACTIVE, BLOCKED]
  viewer.broken:
    type: String
"#;

    #[test]
    fn parses_yaml() {
        let configuration: Configuration = CONFIG.parse().unwrap();
        assert_eq!(configuration.variables.get("showEmail"), Some(&json!(true)));
        assert_eq!(
            configuration.mocks.get("User"),
            Some(&json!({"name": "Alice"}))
        );
        assert_eq!(configuration.selection_metadata().len(), 1);
        assert_eq!(
            format!("{:?}", configuration.resolvers()),
            r#"MockResolvers { types: ["Int", "User"] }"#
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let error = "mock:\n  User: {}\n".parse::<Configuration>().unwrap_err();
        assert!(error
            .to_string()
            .starts_with("could not deserialize configuration: "));
    }

    #[test]
    fn empty_configuration() {
        let configuration: Configuration = "{}".parse().unwrap();
        assert_eq!(configuration, Configuration::default());
    }

    #[test]
    fn generates_from_configuration() {
        let generator = CONFIG.parse::<Configuration>().unwrap().into_generator();
        let operation: Operation = serde_json::from_str(
            r#"{
                "name": "ViewerQuery",
                "selections": [
                    {
                        "kind": "LinkedField",
                        "name": "viewer",
                        "concreteType": "User",
                        "plural": false,
                        "selections": [
                            {"kind": "ScalarField", "name": "name"},
                            {"kind": "ScalarField", "name": "status"},
                            {
                                "kind": "Condition",
                                "condition": "showEmail",
                                "passingValue": true,
                                "selections": [{"kind": "ScalarField", "name": "email"}]
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();
        let data = generator.generate_operation(&operation).unwrap();
        assert_eq!(
            Value::Object(data),
            json!({
                "viewer": {
                    "name": "Alice",
                    "status": "ACTIVE",
                    "email": "<mock-value-for-field-\"email\">",
                    "__typename": "User"
                }
            })
        );
    }

    #[test]
    fn config_schema() {
        let schema = serde_json::to_value(generate_config_schema()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("variables"));
        assert!(properties.contains_key("mocks"));
        assert!(properties.contains_key("selection_metadata"));
    }
}
