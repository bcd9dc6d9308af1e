//! Various types for working with GraphQL type names.

use std::borrow::Cow;

/// Defines basic string conversion functionality for a string wrapper.
///
/// We've a few of them in this file, so this is handy.
macro_rules! def_string_conversions {
    ($ty:ident) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> $ty {
                $ty(value.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> $ty {
                $ty(value)
            }
        }
    };
}

/// The type of an object field, with any list and non-null wrappers in
/// GraphQL syntax (`User`, `ID!`, `[ID!]!`).
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetaFieldType(String);

def_string_conversions!(MetaFieldType);

impl MetaFieldType {
    pub fn named_type(&self) -> NamedType<'_> {
        NamedType(Cow::Borrowed(named_type_from_type_str(&self.0)))
    }
}

/// The type of an argument or input-object field, same syntax as
/// [`MetaFieldType`].
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InputValueType(String);

def_string_conversions!(InputValueType);

impl InputValueType {
    pub fn named_type(&self) -> NamedType<'_> {
        NamedType(Cow::Borrowed(named_type_from_type_str(&self.0)))
    }
}

/// A named GraphQL type without any non-null or list wrappers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedType<'a>(Cow<'a, str>);

impl NamedType<'_> {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_primitive_type(&self) -> bool {
        matches!(self.0.as_ref(), "String" | "Float" | "Boolean" | "ID" | "Int")
    }
}

impl std::fmt::Display for NamedType<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NamedType<'static> {
    fn from(value: String) -> Self {
        NamedType(Cow::Owned(value))
    }
}

impl<'a> From<&'a str> for NamedType<'a> {
    fn from(value: &'a str) -> Self {
        NamedType(Cow::Borrowed(value))
    }
}

/// Classification of a type string by its outermost wrapper.
///
/// Unwrapping one layer at a time keeps list-mapping semantics attached to
/// exactly the wrapper they occur at, however deeply wrappers nest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetaTypeName<'a> {
    NonNull(&'a str),
    List(&'a str),
    Named(&'a str),
}

impl MetaTypeName<'_> {
    pub fn create(ty: &str) -> MetaTypeName<'_> {
        if let Some(inner) = ty.strip_suffix('!') {
            MetaTypeName::NonNull(inner)
        } else if let Some(inner) = ty.strip_prefix('[').and_then(|ty| ty.strip_suffix(']')) {
            MetaTypeName::List(inner)
        } else {
            MetaTypeName::Named(ty)
        }
    }
}

/// Strips the NonNull and List wrappers from a type string to get the
/// named type within.
pub(crate) fn named_type_from_type_str(meta: &str) -> &str {
    let mut nested = Some(meta);

    if meta.starts_with('[') && meta.ends_with(']') {
        nested = nested.and_then(|x| x.strip_prefix('['));
        nested = nested.and_then(|x| x.strip_suffix(']'));
        return named_type_from_type_str(nested.expect("Can't fail"));
    }

    if meta.ends_with('!') {
        nested = nested.and_then(|x| x.strip_suffix('!'));
        return named_type_from_type_str(nested.expect("Can't fail"));
    }

    nested.expect("Can't fail")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_type_extraction() {
        assert_eq!(named_type_from_type_str("String"), "String");
        assert_eq!(named_type_from_type_str("String!"), "String");
        assert_eq!(named_type_from_type_str("[String]"), "String");
        assert_eq!(named_type_from_type_str("[String!]!"), "String");
        assert_eq!(named_type_from_type_str("[[User]]"), "User");
    }

    #[test]
    fn test_meta_type_name_classification() {
        assert_eq!(MetaTypeName::create("User"), MetaTypeName::Named("User"));
        assert_eq!(MetaTypeName::create("User!"), MetaTypeName::NonNull("User"));
        assert_eq!(MetaTypeName::create("[User]"), MetaTypeName::List("User"));
        assert_eq!(MetaTypeName::create("[User!]!"), MetaTypeName::NonNull("[User!]"));
        assert_eq!(MetaTypeName::create("[User!]"), MetaTypeName::List("User!"));
        assert_eq!(MetaTypeName::create("[[Int]]"), MetaTypeName::List("[Int]"));
    }
}
