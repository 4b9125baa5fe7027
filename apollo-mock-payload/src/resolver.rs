//! Mock resolvers and scalar value resolution.

use std::collections::HashMap;
use std::fmt;

use crate::generator::DEFAULT_MOCK_TYPENAME;
use crate::json_ext::Object;
use crate::json_ext::Path;
use crate::json_ext::Value;

/// Hands out mock identifiers, starting at 1. One generator lives for one generation.
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// What a resolver knows about the field it produces a value for.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Type of the object holding the field. `None` when resolving whole-object defaults.
    pub parent_type: Option<&'a str>,
    pub name: Option<&'a str>,
    pub alias: Option<&'a str>,
    pub path: &'a Path,
    pub args: &'a Object,
}

impl FieldContext<'_> {
    /// The alias if there is one, the field name otherwise.
    pub fn response_key(&self) -> Option<&str> {
        self.alias.or(self.name)
    }
}

/// Produces a mock value for every field of one GraphQL type.
///
/// Returning `None` lets the generator fall back to defaults and placeholders. Returning
/// `Some(Value::Null)` is an explicit null: for object types it nulls out the whole branch.
///
/// Implemented for closures, so most resolvers are registered inline:
///
/// ```ignore
/// let resolvers = MockResolvers::new()
///     .with("User", |_, _| Some(json!({"name": "Alice"})));
/// ```
pub trait MockResolver {
    fn resolve(&self, context: &FieldContext<'_>, ids: &mut IdGenerator) -> Option<Value>;
}

impl<F> MockResolver for F
where
    F: Fn(&FieldContext<'_>, &mut IdGenerator) -> Option<Value>,
{
    fn resolve(&self, context: &FieldContext<'_>, ids: &mut IdGenerator) -> Option<Value> {
        self(context, ids)
    }
}

/// Returns the same value for every field of the type.
struct ConstantResolver(Value);

impl MockResolver for ConstantResolver {
    fn resolve(&self, _context: &FieldContext<'_>, _ids: &mut IdGenerator) -> Option<Value> {
        Some(self.0.clone())
    }
}

/// Built-in scalar resolvers, consulted after the caller's.
fn builtin(type_name: &str, context: &FieldContext<'_>, ids: &mut IdGenerator) -> Option<Value> {
    match type_name {
        "ID" => Some(mock_id(context, ids)),
        "Boolean" => Some(Value::Bool(false)),
        "Int" => Some(Value::from(42)),
        "Float" => Some(Value::from(4.2)),
        _ => None,
    }
}

fn mock_id(context: &FieldContext<'_>, ids: &mut IdGenerator) -> Value {
    let id = ids.generate();
    match context.parent_type {
        Some(parent) if parent != DEFAULT_MOCK_TYPENAME => format!("<{parent}-mock-id-{id}>"),
        _ => format!("<mock-id-{id}>"),
    }
    .into()
}

fn placeholder(context: &FieldContext<'_>) -> Value {
    format!(
        "<mock-value-for-field-\"{}\">",
        context.response_key().unwrap_or("undefined")
    )
    .into()
}

/// Caller supplied resolvers keyed by GraphQL type name.
///
/// Lookups check these first and fall back to the built-in `ID`, `Boolean`, `Int` and `Float`
/// resolvers.
#[derive(Default)]
pub struct MockResolvers {
    resolvers: HashMap<String, Box<dyn MockResolver>>,
}

impl fmt::Debug for MockResolvers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.resolvers.keys().collect();
        types.sort();
        f.debug_struct("MockResolvers")
            .field("types", &types)
            .finish()
    }
}

impl MockResolvers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resolver, replacing any previous one for the same type.
    pub fn insert(&mut self, type_name: impl Into<String>, resolver: impl MockResolver + 'static) {
        self.resolvers.insert(type_name.into(), Box::new(resolver));
    }

    pub fn with<F>(self, type_name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&FieldContext<'_>, &mut IdGenerator) -> Option<Value> + 'static,
    {
        self.with_resolver(type_name, resolver)
    }

    pub fn with_resolver(
        mut self,
        type_name: impl Into<String>,
        resolver: impl MockResolver + 'static,
    ) -> Self {
        self.insert(type_name, resolver);
        self
    }

    /// Registers a resolver that always returns `value`.
    pub fn with_constant(self, type_name: impl Into<String>, value: Value) -> Self {
        self.with_resolver(type_name, ConstantResolver(value))
    }

    /// Whether a caller or built-in resolver exists for the type.
    pub fn contains(&self, type_name: &str) -> bool {
        self.resolvers.contains_key(type_name)
            || matches!(type_name, "ID" | "Boolean" | "Int" | "Float")
    }

    /// Runs the resolver for `type_name`, if any. `None` also covers resolvers that declined.
    pub(crate) fn call(
        &self,
        type_name: &str,
        context: &FieldContext<'_>,
        ids: &mut IdGenerator,
    ) -> Option<Value> {
        match self.resolvers.get(type_name) {
            Some(resolver) => resolver.resolve(context, ids),
            None => builtin(type_name, context, ids),
        }
    }

    /// Resolves one scalar value, or a list of them when `plural` is set.
    ///
    /// Each value is, in order: the resolver's value, the default, or a placeholder naming the
    /// field. A caller resolver replaces the built-in one for its type, even when it declines.
    ///
    /// Plural values follow the default when it is a list, and are a single value otherwise.
    pub(crate) fn resolve_value(
        &self,
        type_name: Option<&str>,
        context: &FieldContext<'_>,
        plural: bool,
        default: Option<&Value>,
        ids: &mut IdGenerator,
    ) -> Value {
        if plural {
            let items: Vec<Option<&Value>> = match default {
                Some(Value::Array(items)) => items.iter().map(Some).collect(),
                _ => vec![None],
            };
            return Value::Array(
                items
                    .into_iter()
                    .map(|item| self.resolve_one(type_name, context, item, ids))
                    .collect(),
            );
        }
        self.resolve_one(type_name, context, default, ids)
    }

    fn resolve_one(
        &self,
        type_name: Option<&str>,
        context: &FieldContext<'_>,
        default: Option<&Value>,
        ids: &mut IdGenerator,
    ) -> Value {
        type_name
            .and_then(|type_name| self.call(type_name, context, ids))
            .or_else(|| default.filter(|default| !default.is_null()).cloned())
            .unwrap_or_else(|| placeholder(context))
    }
}
