use indexmap::IndexMap;

use super::{
    directives::IndirectDirective,
    resolvers::{Resolver, Subscriber},
    type_names::{InputValueType, MetaFieldType},
};

/// A field on an object type.
#[derive(Clone, Debug, Default)]
pub struct MetaField {
    pub name: String,
    pub ty: MetaFieldType,
    pub args: IndexMap<String, MetaInputValue>,
    /// Annotation on the field's own result position.
    pub indirect: Option<IndirectDirective>,
    pub resolver: Option<Resolver>,
    pub subscriber: Option<Subscriber>,
}

impl MetaField {
    pub fn new(name: impl Into<String>, ty: impl Into<MetaFieldType>) -> MetaField {
        MetaField {
            name: name.into(),
            ty: ty.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indirect(self, directive: IndirectDirective) -> Self {
        MetaField {
            indirect: Some(directive),
            ..self
        }
    }

    #[must_use]
    pub fn with_resolver(self, resolver: Resolver) -> Self {
        MetaField {
            resolver: Some(resolver),
            ..self
        }
    }

    #[must_use]
    pub fn with_subscriber(self, subscriber: Subscriber) -> Self {
        MetaField {
            subscriber: Some(subscriber),
            ..self
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: MetaInputValue) -> Self {
        self.args.insert(arg.name.clone(), arg);
        self
    }
}

/// An argument or an input-object field.
#[derive(Clone, Debug, Default)]
pub struct MetaInputValue {
    pub name: String,
    pub ty: InputValueType,
    /// Annotation on this input position.
    pub indirect: Option<IndirectDirective>,
}

impl MetaInputValue {
    pub fn new(name: impl Into<String>, ty: impl Into<InputValueType>) -> MetaInputValue {
        MetaInputValue {
            name: name.into(),
            ty: ty.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indirect(self, directive: IndirectDirective) -> Self {
        MetaInputValue {
            indirect: Some(directive),
            ..self
        }
    }
}
