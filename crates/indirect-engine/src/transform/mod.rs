//! Per-invocation value transformation.
//!
//! Everything here is built fresh for a single field invocation and discarded
//! with it; nothing is shared or mutated across concurrent resolutions and
//! nothing is cached across requests.

pub(crate) mod decode;
pub(crate) mod encode;

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use serde_json::Value;

use crate::{
    codec::IdCodec,
    error::BuildError,
    registry::{InputObjectType, MetaInputValue, MetaType, Registry},
    scope::ScopeResolvers,
};

/// Immutable snapshot of the type graph, shared by every wrapped resolver.
///
/// Named types are looked up lazily while walking a concrete value, which is
/// what lets cyclic input types exist without any eager expansion.
pub(crate) struct TypeIndex {
    scalars: BTreeSet<String>,
    objects: BTreeSet<String>,
    input_objects: BTreeMap<String, InputObjectType>,
}

impl TypeIndex {
    pub(crate) fn build(registry: &Registry) -> TypeIndex {
        let mut index = TypeIndex {
            scalars: BTreeSet::new(),
            objects: BTreeSet::new(),
            input_objects: BTreeMap::new(),
        };
        for ty in registry.types.values() {
            match ty {
                MetaType::Scalar(scalar) => {
                    index.scalars.insert(scalar.name.clone());
                }
                MetaType::Object(object) => {
                    index.objects.insert(object.name.clone());
                }
                MetaType::InputObject(input_object) => {
                    index
                        .input_objects
                        .insert(input_object.name.clone(), input_object.clone());
                }
            }
        }
        index
    }

    pub(crate) fn is_scalar(&self, name: &str) -> bool {
        self.scalars.contains(name)
    }

    pub(crate) fn input_object(&self, name: &str) -> Option<&InputObjectType> {
        self.input_objects.get(name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.scalars.contains(name) || self.objects.contains(name) || self.input_objects.contains_key(name)
    }
}

/// Everything a wrapped field needs at request time.
pub(crate) struct TransformEnv {
    pub(crate) codec: Arc<dyn IdCodec>,
    pub(crate) scopes: ScopeResolvers,
    pub(crate) index: Arc<TypeIndex>,
}

/// Borrowed linked list of path segments, rendered only when a position name
/// is actually needed for scope resolution or an error.
#[derive(Clone, Copy)]
pub(crate) struct PathNode<'a> {
    name: &'a str,
    previous: Option<&'a PathNode<'a>>,
}

impl<'a> PathNode<'a> {
    pub(crate) fn new(name: &'a str) -> PathNode<'a> {
        PathNode { name, previous: None }
    }

    pub(crate) fn with(&'a self, name: &'a str) -> PathNode<'a> {
        PathNode {
            name,
            previous: Some(self),
        }
    }

    pub(crate) fn render(&self) -> String {
        let mut segments = self.segments();
        segments.reverse();
        segments.join(".")
    }

    fn segments(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut node = Some(self);
        while let Some(current) = node {
            out.push(current.name);
            node = current.previous;
        }
        out
    }
}

pub(crate) fn kind_str(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Whether an argument's shape contains at least one annotated scalar
/// position. Arguments without one never pay for transform construction.
pub(crate) fn input_needs_decoding(index: &TypeIndex, input: &MetaInputValue) -> bool {
    fn scan(index: &TypeIndex, input: &MetaInputValue, visited: &mut BTreeSet<String>) -> bool {
        let named = input.ty.named_type();
        if input.indirect.is_some() && index.is_scalar(named.as_str()) {
            return true;
        }
        if let Some(input_object) = index.input_object(named.as_str()) {
            if !visited.insert(input_object.name.clone()) {
                return false;
            }
            return input_object
                .input_fields
                .values()
                .any(|field| scan(index, field, visited));
        }
        false
    }

    scan(index, input, &mut BTreeSet::new())
}

/// Build-time validation of one input position and everything reachable from
/// it. Cycle-guarded over input object names so a self-referential type is
/// checked exactly once.
pub(crate) fn validate_input_value(
    index: &TypeIndex,
    scopes: &ScopeResolvers,
    position: &str,
    input: &MetaInputValue,
    visited: &mut BTreeSet<String>,
) -> Result<(), BuildError> {
    let named = input.ty.named_type();
    if let Some(directive) = &input.indirect {
        if !scopes.contains(&directive.scope) {
            return Err(BuildError::UnknownScopeType {
                position: position.to_string(),
                scope_type: directive.scope.clone(),
            });
        }
        if !index.is_scalar(named.as_str()) {
            return Err(BuildError::NotAScalarPosition {
                position: position.to_string(),
            });
        }
    }
    if index.is_scalar(named.as_str()) {
        return Ok(());
    }
    if let Some(input_object) = index.input_object(named.as_str()) {
        if visited.insert(input_object.name.clone()) {
            for field in input_object.input_fields.values() {
                let position = format!("{}.{}", input_object.name, field.name);
                validate_input_value(index, scopes, &position, field, visited)?;
            }
        }
        return Ok(());
    }
    Err(BuildError::UnknownType {
        position: position.to_string(),
        name: named.to_string(),
    })
}
