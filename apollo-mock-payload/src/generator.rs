//! Mock payload generation.
//!
//! Walks the selection tree of an operation and builds the response data it expects, one object
//! level at a time. Every recursive call takes ownership of the object it populates and returns
//! it, so sibling branches never alias each other's data.

use std::fmt;

use crate::defaults::DefaultValue;
use crate::error::MockError;
use crate::json_ext::Object;
use crate::json_ext::Path;
use crate::json_ext::Value;
use crate::metadata::FieldTypeDetails;
use crate::metadata::SelectionMetadata;
use crate::resolver::FieldContext;
use crate::resolver::IdGenerator;
use crate::resolver::MockResolvers;
use crate::response::Response;
use crate::selection::Argument;
use crate::selection::Deferrable;
use crate::selection::InlineFragment;
use crate::selection::LinkedField;
use crate::selection::Operation;
use crate::selection::OperationDescriptor;
use crate::selection::ScalarField;
use crate::selection::Selection;
use crate::selection::TypeDiscriminator;

pub const TYPENAME: &str = "__typename";

/// Type name given to objects whose type is not known.
pub const DEFAULT_MOCK_TYPENAME: &str = "__MockObject";

/// Root operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// Guesses the root type from the operation name, by convention `<Name>Mutation` or
    /// `<Name>Subscription`. Anything else is a query.
    pub fn from_operation_name(name: Option<&str>) -> Self {
        match name {
            Some(name) if name.ends_with("Mutation") => OperationKind::Mutation,
            Some(name) if name.ends_with("Subscription") => OperationKind::Subscription,
            _ => OperationKind::Query,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates mock payloads for operations, given variables, resolvers and selection metadata.
#[derive(Debug, Default)]
pub struct MockPayloadGenerator {
    variables: Object,
    resolvers: MockResolvers,
    selection_metadata: SelectionMetadata,
}

#[buildstructor::buildstructor]
impl MockPayloadGenerator {
    #[builder(visibility = "pub")]
    fn new(
        variables: Option<Object>,
        resolvers: Option<MockResolvers>,
        selection_metadata: Option<SelectionMetadata>,
    ) -> Self {
        Self {
            variables: variables.unwrap_or_default(),
            resolvers: resolvers.unwrap_or_default(),
            selection_metadata: selection_metadata.unwrap_or_default(),
        }
    }

    /// Generates data for `selections`, rooted at the object type `root_type`.
    ///
    /// Ids are numbered from 1 on every call.
    #[tracing::instrument(skip_all, level = "trace", fields(root_type = root_type))]
    pub fn generate(&self, selections: &[Selection], root_type: &str) -> Result<Object, MockError> {
        let mut generation = Generation {
            variables: &self.variables,
            resolvers: &self.resolvers,
            metadata: &self.selection_metadata,
            ids: IdGenerator::new(),
        };
        let mut path = Path::empty();
        let defaults = generation.defaults_for_object(root_type, None, None, &path, &Object::new());
        generation.traverse_selections(
            selections,
            root_type,
            false,
            &mut path,
            Object::new(),
            &defaults,
        )
    }

    /// Generates data for a whole operation, picking the root type from its name.
    pub fn generate_operation(&self, operation: &Operation) -> Result<Object, MockError> {
        let kind = OperationKind::from_operation_name(operation.name.as_deref());
        tracing::trace!(
            operation = operation.name.as_deref().unwrap_or_default(),
            root_type = kind.as_str(),
            "generating mock payload"
        );
        self.generate(&operation.selections, kind.as_str())
    }
}

/// Generates the data of `operation`.
pub fn generate_data(
    operation: &Operation,
    variables: Object,
    resolvers: MockResolvers,
    selection_metadata: Option<SelectionMetadata>,
) -> Result<Object, MockError> {
    MockPayloadGenerator::new(Some(variables), Some(resolvers), selection_metadata)
        .generate_operation(operation)
}

/// Generates a `{ data }` response for a compiled request bound to its variables.
///
/// Selection metadata is read from the request's compiler metadata, if present.
#[tracing::instrument(skip_all, level = "trace")]
pub fn generate_data_for_operation(
    descriptor: &OperationDescriptor,
    resolvers: MockResolvers,
) -> Result<Response, MockError> {
    let selection_metadata =
        SelectionMetadata::from_operation_metadata(&descriptor.node.params.metadata);
    let data = generate_data(
        &descriptor.node.operation,
        descriptor.variables.clone(),
        resolvers,
        selection_metadata,
    )?;
    Ok(Response::builder().data(Value::Object(data)).build())
}

/// State of one generation.
struct Generation<'a> {
    variables: &'a Object,
    resolvers: &'a MockResolvers,
    metadata: &'a SelectionMetadata,
    ids: IdGenerator,
}

impl Generation<'_> {
    fn traverse_selections(
        &mut self,
        selections: &[Selection],
        type_name: &str,
        is_abstract: bool,
        path: &mut Path,
        mut data: Object,
        defaults: &DefaultValue,
    ) -> Result<Object, MockError> {
        for selection in selections {
            data = match selection {
                Selection::ScalarField(field) => {
                    self.mock_scalar(field, type_name, path, data, defaults)?
                }
                Selection::LinkedField(field) => self.mock_link(field, path, data, defaults)?,
                Selection::Condition(condition) => {
                    if self.variable(&condition.condition)? == &Value::Bool(condition.passing_value)
                    {
                        self.traverse_selections(
                            &condition.selections,
                            type_name,
                            is_abstract,
                            path,
                            data,
                            defaults,
                        )?
                    } else {
                        data
                    }
                }
                // deferred and streamed data is generated as if it was already delivered
                Selection::Defer(Deferrable { selections, .. })
                | Selection::Stream(Deferrable { selections, .. }) => self.traverse_selections(
                    selections,
                    type_name,
                    is_abstract,
                    path,
                    data,
                    defaults,
                )?,
                Selection::InlineFragment(fragment) => self.mock_inline_fragment(
                    fragment,
                    type_name,
                    is_abstract,
                    path,
                    data,
                    defaults,
                )?,
                Selection::TypeDiscriminator(TypeDiscriminator { abstract_key }) => {
                    data.insert(abstract_key.as_str(), Value::Bool(true));
                    data
                }
                Selection::ClientExtension(_)
                | Selection::ModuleImport(_)
                | Selection::ScalarHandle(_)
                | Selection::LinkedHandle(_) => data,
                Selection::Unknown => return Err(MockError::UnexpectedSelection(path.dotted())),
            };
        }
        Ok(data)
    }

    fn mock_scalar(
        &mut self,
        field: &ScalarField,
        type_name: &str,
        path: &mut Path,
        mut data: Object,
        defaults: &DefaultValue,
    ) -> Result<Object, MockError> {
        let key = field.response_key();
        if field.name == TYPENAME {
            data.insert(key, Value::from(type_name));
            return Ok(data);
        }
        // first write wins: conditions and fragments can select the same field twice
        if data.contains_key(key) {
            return Ok(data);
        }

        path.push(key);
        let value = self.scalar_value(field, type_name, path, defaults);
        path.pop();
        data.insert(key, value?);
        Ok(data)
    }

    fn scalar_value(
        &mut self,
        field: &ScalarField,
        type_name: &str,
        path: &Path,
        defaults: &DefaultValue,
    ) -> Result<Value, MockError> {
        let details = self
            .metadata
            .get(path)
            .cloned()
            .unwrap_or_else(|| FieldTypeDetails::scalar_fallback(&field.name));

        if let Some(value) = defaults.scalar(field.response_key()) {
            return Ok(match &details.enum_values {
                Some(enum_values) => normalize_enum(enum_values, value, path),
                None => value.clone(),
            });
        }

        let args = self.arguments(field.args.as_deref())?;
        let context = FieldContext {
            parent_type: Some(type_name),
            name: Some(field.name.as_str()),
            alias: field.alias.as_deref(),
            path,
            args: &args,
        };
        let enum_default = details
            .enum_values
            .as_ref()
            .and_then(|values| values.first())
            .map(|value| Value::from(value.as_str()));
        Ok(self.resolvers.resolve_value(
            Some(details.type_name.as_str()),
            &context,
            details.plural,
            enum_default.as_ref(),
            &mut self.ids,
        ))
    }

    fn mock_link(
        &mut self,
        field: &LinkedField,
        path: &mut Path,
        mut data: Object,
        defaults: &DefaultValue,
    ) -> Result<Object, MockError> {
        let key = field.response_key();
        let args = self.arguments(field.args.as_deref())?;
        // data generated by an earlier selection of the same field is merged into
        let previous = data.get_mut(key).map(std::mem::take);

        path.push(key);
        let value = self.linked_value(field, path, &args, previous, defaults);
        path.pop();
        data.insert(key, value?);
        Ok(data)
    }

    fn linked_value(
        &mut self,
        field: &LinkedField,
        path: &mut Path,
        args: &Object,
        previous: Option<Value>,
        parent_defaults: &DefaultValue,
    ) -> Result<Value, MockError> {
        let metadata_type = self
            .metadata
            .get(path)
            .map(|details| details.type_name.clone())
            .unwrap_or_else(|| DEFAULT_MOCK_TYPENAME.to_string());

        let mut defaults = self.defaults_for_object(
            field.concrete_type.as_deref().unwrap_or(metadata_type.as_str()),
            Some(field.name.as_str()),
            field.alias.as_deref(),
            path,
            args,
        );
        if defaults.is_absent() {
            defaults = parent_defaults.field(field.response_key());
        }
        if let DefaultValue::Null = defaults {
            tracing::trace!(path = %path, "branch nulled by defaults");
            return Ok(Value::Null);
        }

        let type_name = match (&field.concrete_type, defaults.type_name()) {
            (Some(concrete_type), _) => concrete_type.as_str(),
            (None, Some(default_type)) => default_type,
            (None, None) => metadata_type.as_str(),
        };
        // Without a concrete type, a type name that differs from the declared one was picked by
        // a resolver, so only the declared (interface or union) type is considered abstract.
        let is_abstract = field.concrete_type.is_none() && type_name == metadata_type;

        if !field.plural {
            return self.mock_object(field, type_name, is_abstract, path, previous, &defaults);
        }

        let mut previous_items = match previous {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        }
        .into_iter();
        let items = defaults
            .list_items()
            .iter()
            .map(|item| {
                self.mock_object(
                    field,
                    type_name,
                    is_abstract,
                    path,
                    previous_items.next(),
                    item,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(items))
    }

    /// Generates one object of a linked field. Plural fields get one call per list element, each
    /// with its own defaults but the type of the field.
    fn mock_object(
        &mut self,
        field: &LinkedField,
        type_name: &str,
        is_abstract: bool,
        path: &mut Path,
        previous: Option<Value>,
        defaults: &DefaultValue,
    ) -> Result<Value, MockError> {
        if let DefaultValue::Null = defaults {
            return Ok(Value::Null);
        }
        let data = match previous {
            Some(Value::Object(object)) => object,
            _ => Object::new(),
        };
        let mut object = self.traverse_selections(
            &field.selections,
            type_name,
            is_abstract,
            path,
            data,
            defaults,
        )?;
        if !object.contains_key(TYPENAME) {
            object.insert(TYPENAME, Value::from(type_name));
        }
        Ok(Value::Object(object))
    }

    fn mock_inline_fragment(
        &mut self,
        fragment: &InlineFragment,
        type_name: &str,
        is_abstract: bool,
        path: &mut Path,
        mut data: Object,
        defaults: &DefaultValue,
    ) -> Result<Object, MockError> {
        if let Some(abstract_key) = &fragment.abstract_key {
            data.insert(abstract_key.as_str(), Value::Bool(true));
            return self.traverse_selections(
                &fragment.selections,
                type_name,
                is_abstract,
                path,
                data,
                defaults,
            );
        }

        let fragment_type = fragment.type_condition.as_str();
        // the first fragment applied to an untyped object decides its type
        if matches!(typename(&data), None | Some(DEFAULT_MOCK_TYPENAME)) {
            let refined = defaults.type_name().unwrap_or(fragment_type).to_string();
            data.insert(TYPENAME, Value::from(refined));
        }
        if is_abstract && typename(&data) == Some(type_name) {
            data.insert(TYPENAME, Value::from(fragment_type));
        }
        if typename(&data) != Some(fragment_type) {
            return Ok(data);
        }

        let fragment_defaults = self.defaults_for_object(
            fragment_type,
            path.last(),
            None,
            path,
            &Object::new(),
        );
        let effective_defaults = match &fragment_defaults {
            DefaultValue::Object(_) | DefaultValue::List(_) => &fragment_defaults,
            DefaultValue::Absent | DefaultValue::Null => defaults,
        };
        let mut data = self.traverse_selections(
            &fragment.selections,
            fragment_type,
            is_abstract,
            path,
            data,
            effective_defaults,
        )?;
        data.insert(TYPENAME, Value::from(fragment_type));

        // the id picked for this type overrides one generated earlier for the same object
        let has_id = data.get("id").is_some_and(|id| !id.is_null());
        if let (true, Some(id)) = (has_id, fragment_defaults.id()) {
            data.insert("id", id.clone());
        }
        Ok(data)
    }

    /// Asks the type's resolver for whole-object defaults.
    fn defaults_for_object(
        &mut self,
        type_name: &str,
        field_name: Option<&str>,
        alias: Option<&str>,
        path: &Path,
        args: &Object,
    ) -> DefaultValue {
        if !self.resolvers.contains(type_name) {
            return DefaultValue::Absent;
        }
        let context = FieldContext {
            parent_type: None,
            name: field_name,
            alias,
            path,
            args,
        };
        DefaultValue::from_resolved(self.resolvers.call(type_name, &context, &mut self.ids))
    }

    fn arguments(&self, args: Option<&[Argument]>) -> Result<Object, MockError> {
        let mut object = Object::new();
        for arg in args.unwrap_or_default() {
            object.insert(arg.name(), self.argument_value(arg)?);
        }
        Ok(object)
    }

    fn argument_value(&self, arg: &Argument) -> Result<Value, MockError> {
        Ok(match arg {
            Argument::Literal { value, .. } => value.clone(),
            Argument::Variable { variable_name, .. } => self.variable(variable_name)?.clone(),
            Argument::ObjectValue { fields, .. } => {
                Value::Object(self.arguments(Some(fields.as_slice()))?)
            }
            Argument::ListValue { items, .. } => Value::Array(
                items
                    .iter()
                    .flatten()
                    .map(|item| self.argument_value(item))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    fn variable(&self, name: &str) -> Result<&Value, MockError> {
        self.variables
            .get(name)
            .ok_or_else(|| MockError::UndefinedVariable(name.to_string()))
    }
}

fn typename(data: &Object) -> Option<&str> {
    data.get(TYPENAME).and_then(Value::as_str)
}

/// Matches a caller provided enum value against the declared values, ignoring case.
fn normalize_enum(enum_values: &[String], value: &Value, path: &Path) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| normalize_enum(enum_values, item, path))
                .collect(),
        ),
        Value::String(name) => {
            match enum_values
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(name.as_str()))
            {
                Some(candidate) => Value::from(candidate.as_str()),
                None => {
                    tracing::warn!(
                        path = %path,
                        value = name.as_str(),
                        expected = ?enum_values,
                        "invalid enum value provided by mock resolver"
                    );
                    value.clone()
                }
            }
        }
        other => {
            tracing::warn!(
                path = %path,
                expected = ?enum_values,
                "non string enum value provided by mock resolver"
            );
            other.clone()
        }
    }
}
