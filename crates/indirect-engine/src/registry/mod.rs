//! The type graph.
//!
//! Types are stored by name and referenced by type *strings* carrying their
//! list/non-null wrapping (`[ID!]!`), so self-referential input types are
//! representable without any cyclic data structure: a named type is resolved
//! lazily, at the moment a concrete value is being walked.

mod directives;
mod fields;
pub mod resolvers;
mod type_names;

use std::collections::BTreeMap;

use indexmap::IndexMap;

pub use directives::IndirectDirective;
pub use fields::{MetaField, MetaInputValue};
pub use type_names::{InputValueType, MetaFieldType, MetaTypeName, NamedType};
pub(crate) use type_names::named_type_from_type_str;

/// The registry of all types the system accepts and returns, plus the root
/// operation type names.
///
/// Immutable once built; the schema walker consumes one registry and returns
/// the rewired one.
#[derive(Clone, Debug)]
pub struct Registry {
    pub types: BTreeMap<String, MetaType>,
    pub query_type: String,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
}

impl Default for Registry {
    fn default() -> Self {
        Registry {
            types: BTreeMap::new(),
            query_type: "Query".to_string(),
            mutation_type: None,
            subscription_type: None,
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Registers the primitive scalar types.
    #[must_use]
    pub fn with_builtin_scalars(mut self) -> Self {
        for name in ["String", "Float", "Boolean", "ID", "Int"] {
            self.insert_type(ScalarType::new(name));
        }
        self
    }

    pub fn insert_type(&mut self, ty: impl Into<MetaType>) {
        let ty = ty.into();
        self.types.insert(ty.name().to_string(), ty);
    }

    pub fn lookup_type(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        match self.types.get(name) {
            Some(MetaType::Object(object)) => Some(object),
            _ => None,
        }
    }

    pub fn input_object(&self, name: &str) -> Option<&InputObjectType> {
        match self.types.get(name) {
            Some(MetaType::InputObject(input_object)) => Some(input_object),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum MetaType {
    Scalar(ScalarType),
    Object(ObjectType),
    InputObject(InputObjectType),
}

impl MetaType {
    pub fn name(&self) -> &str {
        match self {
            MetaType::Scalar(scalar) => &scalar.name,
            MetaType::Object(object) => &object.name,
            MetaType::InputObject(input_object) => &input_object.name,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, MetaType::Scalar(_))
    }
}

impl From<ScalarType> for MetaType {
    fn from(scalar: ScalarType) -> Self {
        MetaType::Scalar(scalar)
    }
}

impl From<ObjectType> for MetaType {
    fn from(object: ObjectType) -> Self {
        MetaType::Object(object)
    }
}

impl From<InputObjectType> for MetaType {
    fn from(input_object: InputObjectType) -> Self {
        MetaType::InputObject(input_object)
    }
}

#[derive(Clone, Debug)]
pub struct ScalarType {
    pub name: String,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> ScalarType {
        ScalarType { name: name.into() }
    }
}

#[derive(Clone, Debug)]
pub struct ObjectType {
    pub name: String,
    pub fields: IndexMap<String, MetaField>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = MetaField>) -> ObjectType {
        ObjectType {
            name: name.into(),
            fields: fields.into_iter().map(|field| (field.name.clone(), field)).collect(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&MetaField> {
        self.fields.get(name)
    }
}

#[derive(Clone, Debug)]
pub struct InputObjectType {
    pub name: String,
    pub input_fields: IndexMap<String, MetaInputValue>,
}

impl InputObjectType {
    pub fn new(
        name: impl Into<String>,
        input_fields: impl IntoIterator<Item = MetaInputValue>,
    ) -> InputObjectType {
        InputObjectType {
            name: name.into(),
            input_fields: input_fields
                .into_iter()
                .map(|field| (field.name.clone(), field))
                .collect(),
        }
    }
}
