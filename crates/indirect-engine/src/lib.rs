//! Identifier indirection for directive-annotated type registries.
//!
//! The engine rewires a [`Registry`] so that every schema position carrying
//! the indirection annotation exchanges opaque tokens with clients instead of
//! raw identifiers: annotated arguments are decoded before a field's resolver
//! runs, annotated results (one-shot and subscription emissions alike) are
//! encoded after it. Token syntax, signing and expiry live behind the
//! [`IdCodec`] seam; scope binding is pluggable per label through
//! [`IndirectTransform::scope_resolver`].
//!
//! The rewrite happens once, up front: [`IndirectTransform::apply`] validates
//! every annotated position and replaces the resolvers of affected fields,
//! leaving the rest of the registry untouched.

mod codec;
mod context;
mod error;
mod registry;
mod schema;
mod scope;
mod transform;

pub use codec::{DecodeError, DecodedId, IdCodec};
pub use context::{JsonMap, RequestContext};
pub use error::{BuildError, Error, TransformResult};
pub use registry::{
    resolvers::{EventStream, Resolver, ResolverFuture, ResolverInput, Subscriber, SubscriberFuture},
    IndirectDirective, InputObjectType, InputValueType, MetaField, MetaFieldType, MetaInputValue,
    MetaType, MetaTypeName, NamedType, ObjectType, Registry, ScalarType,
};
pub use schema::IndirectTransform;
pub use scope::{ScopeKey, ScopeResolver, CONTEXT_SCOPE, PUBLIC_SCOPE};
