//! Per-path type information for selections whose type the selection tree does not carry.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::json_ext::Object;
use crate::json_ext::Path;
use crate::json_ext::Value;

/// Key of the selection type info in a compiled request's metadata.
pub const SELECTION_TYPE_INFO_KEY: &str = "relayTestingSelectionTypeInfo";

/// Type facts about the field at a given selection path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTypeDetails {
    #[serde(rename = "type")]
    pub type_name: String,
    pub plural: bool,
    pub nullable: bool,
    pub enum_values: Option<Vec<String>>,
}

impl FieldTypeDetails {
    /// Details assumed for a scalar field with no metadata entry.
    pub(crate) fn scalar_fallback(field_name: &str) -> Self {
        Self {
            type_name: if field_name == "id" { "ID" } else { "String" }.to_string(),
            plural: false,
            nullable: false,
            enum_values: None,
        }
    }

    /// Validates one raw entry. Anything that is not exactly
    /// `{type: string, plural: bool, nullable: bool, enumValues: null | [string]}` is rejected.
    fn from_value(value: &Value) -> Option<Self> {
        let entry = value.as_object()?;
        let type_name = entry.get("type")?.as_str()?.to_string();
        let plural = entry.get("plural")?.as_bool()?;
        let nullable = entry.get("nullable")?.as_bool()?;
        let enum_values = match entry.get("enumValues")? {
            Value::Null => None,
            Value::Array(values) => Some(
                values
                    .iter()
                    .map(|value| value.as_str().map(ToString::to_string))
                    .collect::<Option<Vec<_>>>()?,
            ),
            _ => return None,
        };
        Some(Self {
            type_name,
            plural,
            nullable,
            enum_values,
        })
    }
}

/// Selection type details keyed by dotted response path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionMetadata(HashMap<String, FieldTypeDetails>);

impl SelectionMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, details: FieldTypeDetails) {
        self.0.insert(path.into(), details);
    }

    pub fn get(&self, path: &Path) -> Option<&FieldTypeDetails> {
        self.0.get(&path.dotted())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds the table from a raw `path -> details` map, dropping malformed entries.
    pub fn from_raw(raw: &Object) -> Self {
        let entries = raw
            .iter()
            .filter_map(|(path, value)| match FieldTypeDetails::from_value(value) {
                Some(details) => Some((path.as_str().to_string(), details)),
                None => {
                    tracing::debug!(
                        path = path.as_str(),
                        "dropping malformed selection type info entry"
                    );
                    None
                }
            })
            .collect();
        Self(entries)
    }

    /// Extracts the table from a compiled request's metadata, if it has one.
    pub fn from_operation_metadata(metadata: &Object) -> Option<Self> {
        match metadata.get(SELECTION_TYPE_INFO_KEY)? {
            Value::Object(raw) => Some(Self::from_raw(raw)),
            _ => None,
        }
    }
}

impl FromIterator<(String, FieldTypeDetails)> for SelectionMetadata {
    fn from_iter<T: IntoIterator<Item = (String, FieldTypeDetails)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
