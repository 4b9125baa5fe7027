//! Caller authored overrides for whole objects.

use crate::generator::TYPENAME;
use crate::json_ext::Object;
use crate::json_ext::Value;

/// Defaults computed for one object before its fields are generated.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum DefaultValue {
    /// Nothing to override, generate normally.
    #[default]
    Absent,
    /// The branch is explicitly null.
    Null,
    Object(Object),
    List(Vec<Value>),
}

impl DefaultValue {
    /// Interprets a resolver result. Scalars carry no object defaults.
    pub(crate) fn from_resolved(value: Option<Value>) -> Self {
        match value {
            Some(Value::Null) => DefaultValue::Null,
            Some(Value::Object(object)) => DefaultValue::Object(object),
            Some(Value::Array(items)) => DefaultValue::List(items),
            _ => DefaultValue::Absent,
        }
    }

    pub(crate) fn is_absent(&self) -> bool {
        matches!(self, DefaultValue::Absent)
    }

    /// The defaults nested under `key`, for a linked field of this object.
    pub(crate) fn field(&self, key: &str) -> DefaultValue {
        match self {
            DefaultValue::Object(object) => DefaultValue::from_resolved(object.get(key).cloned()),
            _ => DefaultValue::Absent,
        }
    }

    /// The default for a scalar field of this object. An explicit null is a value.
    pub(crate) fn scalar(&self, key: &str) -> Option<&Value> {
        match self {
            DefaultValue::Object(object) => object.get(key),
            _ => None,
        }
    }

    pub(crate) fn type_name(&self) -> Option<&str> {
        self.scalar(TYPENAME).and_then(Value::as_str)
    }

    pub(crate) fn id(&self) -> Option<&Value> {
        self.scalar("id").filter(|id| !id.is_null())
    }

    /// One placeholder per element of a plural linked field.
    pub(crate) fn list_items(&self) -> Vec<DefaultValue> {
        match self {
            DefaultValue::List(items) => items
                .iter()
                .map(|item| DefaultValue::from_resolved(Some(item.clone())))
                .collect(),
            DefaultValue::Object(_) => vec![self.clone()],
            DefaultValue::Absent | DefaultValue::Null => vec![DefaultValue::Absent],
        }
    }
}
