use crate::scope::PUBLIC_SCOPE;

use super::type_names::NamedType;

/// The indirection annotation attached to a field, an argument or an
/// input-object field, marking the position as identifier-bearing.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IndirectDirective {
    /// Logical identifier type carried inside the token and checked on
    /// decode. Defaults to the annotated position's named type.
    pub type_tag: Option<String>,
    /// Label selecting the scope resolution strategy.
    pub scope: String,
}

impl Default for IndirectDirective {
    fn default() -> Self {
        IndirectDirective {
            type_tag: None,
            scope: PUBLIC_SCOPE.to_string(),
        }
    }
}

impl IndirectDirective {
    /// An annotation with an explicit type tag and the default public scope.
    pub fn tagged(type_tag: impl Into<String>) -> Self {
        IndirectDirective {
            type_tag: Some(type_tag.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_scope(self, scope: impl Into<String>) -> Self {
        IndirectDirective {
            scope: scope.into(),
            ..self
        }
    }

    /// The tag tokens at this position are expected to carry.
    pub fn type_tag_for(&self, named_type: &NamedType<'_>) -> String {
        self.type_tag
            .clone()
            .unwrap_or_else(|| named_type.to_string())
    }
}
