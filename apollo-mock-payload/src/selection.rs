//! Normalized selection tree of a compiled operation.
//!
//! These types mirror the JSON artifacts emitted by the GraphQL compiler, and are read-only for
//! the generator.

use serde::Deserialize;
use serde::Serialize;

use crate::error::MockError;
use crate::json_ext::Object;
use crate::json_ext::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Selection {
    ScalarField(ScalarField),
    LinkedField(LinkedField),
    Condition(Condition),
    InlineFragment(InlineFragment),
    Defer(Deferrable),
    Stream(Deferrable),
    TypeDiscriminator(TypeDiscriminator),
    ClientExtension(ClientExtension),
    ModuleImport(ModuleImport),
    ScalarHandle(Handle),
    LinkedHandle(Handle),
    /// Any kind this crate does not know about. Reaching it during generation is an error.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarField {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
}

impl ScalarField {
    /// The key under which the field appears in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedField {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
    /// `None` when the runtime type is not known statically (interfaces and unions).
    #[serde(default)]
    pub concrete_type: Option<String>,
    #[serde(default)]
    pub plural: bool,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

impl LinkedField {
    /// The key under which the field appears in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Selections included only when a variable has the expected value (`@include`/`@skip`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub condition: String,
    pub passing_value: bool,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineFragment {
    #[serde(rename = "type")]
    pub type_condition: String,
    #[serde(default)]
    pub abstract_key: Option<String>,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

/// Body of a `@defer` or `@stream` selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deferrable {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "if")]
    pub if_condition: Option<String>,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDiscriminator {
    pub abstract_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientExtension {
    #[serde(default)]
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleImport {
    #[serde(default)]
    pub document_name: String,
    #[serde(default)]
    pub fragment_name: String,
    #[serde(default)]
    pub fragment_prop_name: String,
}

/// A `@__clientField` handle on a scalar or linked field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub key: String,
}

/// A field argument, either inline or bound to an operation variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Argument {
    Literal {
        #[serde(default)]
        name: String,
        value: Value,
    },
    Variable {
        #[serde(default)]
        name: String,
        #[serde(rename = "variableName")]
        variable_name: String,
    },
    ObjectValue {
        #[serde(default)]
        name: String,
        #[serde(default)]
        fields: Vec<Argument>,
    },
    ListValue {
        #[serde(default)]
        name: String,
        #[serde(default)]
        items: Vec<Option<Argument>>,
    },
}

impl Argument {
    pub fn name(&self) -> &str {
        match self {
            Argument::Literal { name, .. }
            | Argument::Variable { name, .. }
            | Argument::ObjectValue { name, .. }
            | Argument::ListValue { name, .. } => name,
        }
    }
}

/// The root of a compiled operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestParameters {
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form compiler metadata, where the selection type info lives.
    #[serde(default)]
    pub metadata: Object,
}

/// A compiled request: the normalized operation and its parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcreteRequest {
    pub operation: Operation,
    #[serde(default)]
    pub params: RequestParameters,
}

/// A compiled request bound to its variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub node: ConcreteRequest,
    #[serde(default)]
    pub variables: Object,
}

impl OperationDescriptor {
    /// Parse a descriptor from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, MockError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json_bytes::json;

    use super::*;

    #[test]
    fn deserializes_compiled_selections() {
        let operation: Operation = serde_json::from_str(
            r#"{
                "kind": "Operation",
                "name": "ViewerQuery",
                "selections": [
                    {
                        "kind": "LinkedField",
                        "alias": null,
                        "args": [
                            {"kind": "Literal", "name": "first", "value": 10},
                            {"kind": "Variable", "name": "after", "variableName": "cursor"}
                        ],
                        "concreteType": null,
                        "name": "viewer",
                        "plural": false,
                        "storageKey": null,
                        "selections": [
                            {"kind": "ScalarField", "alias": "userName", "args": null, "name": "name", "storageKey": null},
                            {
                                "kind": "Condition",
                                "passingValue": false,
                                "condition": "skipId",
                                "selections": [{"kind": "ScalarField", "name": "id"}]
                            },
                            {
                                "kind": "InlineFragment",
                                "type": "User",
                                "abstractKey": null,
                                "selections": []
                            },
                            {"kind": "Defer", "label": "ViewerQuery$defer", "if": null, "selections": []}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(operation.name.as_deref(), Some("ViewerQuery"));
        let Selection::LinkedField(viewer) = &operation.selections[0] else {
            panic!("expected a linked field");
        };
        assert_eq!(viewer.response_key(), "viewer");
        assert_eq!(viewer.concrete_type, None);
        assert_eq!(
            viewer.args.as_deref().unwrap(),
            &[
                Argument::Literal {
                    name: "first".into(),
                    value: json!(10),
                },
                Argument::Variable {
                    name: "after".into(),
                    variable_name: "cursor".into(),
                },
            ]
        );
        let Selection::ScalarField(name) = &viewer.selections[0] else {
            panic!("expected a scalar field");
        };
        assert_eq!(name.response_key(), "userName");
        assert!(matches!(
            &viewer.selections[1],
            Selection::Condition(Condition { passing_value: false, condition, .. }) if condition == "skipId"
        ));
        assert!(matches!(
            &viewer.selections[2],
            Selection::InlineFragment(InlineFragment { type_condition, .. }) if type_condition == "User"
        ));
        assert!(matches!(
            &viewer.selections[3],
            Selection::Defer(Deferrable { label: Some(_), .. })
        ));
    }

    #[test]
    fn unknown_kinds_are_kept() {
        let selections: Vec<Selection> = serde_json::from_str(
            r#"[{"kind": "ActorChange", "linkedField": {}}, {"kind": "ScalarField", "name": "id"}]"#,
        )
        .unwrap();
        assert_eq!(selections[0], Selection::Unknown);
    }

    #[test]
    fn nested_arguments() {
        let argument: Argument = serde_json::from_str(
            r#"{
                "kind": "ObjectValue",
                "name": "input",
                "fields": [
                    {"kind": "Literal", "name": "text", "value": "hello"},
                    {"kind": "ListValue", "name": "ids", "items": [null, {"kind": "Variable", "name": "ids.1", "variableName": "id"}]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(argument.name(), "input");
        let Argument::ObjectValue { fields, .. } = argument else {
            panic!("expected an object argument");
        };
        assert!(matches!(&fields[1], Argument::ListValue { items, .. } if items.len() == 2 && items[0].is_none()));
    }

    #[test]
    fn descriptor_from_json() {
        let descriptor = OperationDescriptor::from_json(
            r#"{
                "node": {
                    "operation": {"name": "AddCommentMutation", "selections": []},
                    "params": {"name": "AddCommentMutation", "metadata": {}}
                },
                "variables": {"input": {"text": "hi"}}
            }"#,
        )
        .unwrap();
        assert_eq!(
            descriptor.node.operation.name.as_deref(),
            Some("AddCommentMutation")
        );
        assert_eq!(descriptor.variables.get("input"), Some(&json!({"text": "hi"})));

        assert!(matches!(
            OperationDescriptor::from_json("{"),
            Err(MockError::InvalidOperation(_))
        ));
    }
}
