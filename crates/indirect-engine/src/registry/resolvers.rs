//! Field invocation and emission entry points.
//!
//! The host execution engine drives these: it calls a field's [`Resolver`]
//! with the parent value, the field arguments and the request context, and
//! awaits the boxed future. The schema walker replaces the stored closures
//! with wrapped ones; callers never see the difference.

use std::{fmt, sync::Arc};

use futures_util::{future::BoxFuture, stream::BoxStream};
use serde_json::Value;

use crate::{
    context::{JsonMap, RequestContext},
    error::TransformResult,
};

/// Everything a single field invocation receives from the host engine.
#[derive(Clone, Debug, Default)]
pub struct ResolverInput {
    /// The parent value the field is being resolved on.
    pub root: Value,
    /// The field's arguments.
    pub args: JsonMap,
    /// The per-request context.
    pub ctx: RequestContext,
}

pub type ResolverFuture = BoxFuture<'static, TransformResult<Value>>;

/// The values emitted by a subscription field.
pub type EventStream = BoxStream<'static, TransformResult<Value>>;

/// Resolves to the event stream of a subscription field.
pub type SubscriberFuture = BoxFuture<'static, TransformResult<EventStream>>;

/// A field's invocation entry point.
#[derive(Clone)]
pub struct Resolver(Arc<dyn Fn(ResolverInput) -> ResolverFuture + Send + Sync>);

impl Resolver {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(ResolverInput) -> ResolverFuture + Send + Sync + 'static,
    {
        Resolver(Arc::new(f))
    }

    /// Convenience over [`Resolver::new`] for synchronous resolver logic.
    pub fn from_sync<F>(f: F) -> Self
    where
        F: Fn(ResolverInput) -> TransformResult<Value> + Send + Sync + 'static,
    {
        Resolver::new(move |input| {
            let result = f(input);
            Box::pin(async move { result })
        })
    }

    /// Reads a key out of the parent value, the default behaviour of a plain
    /// property field.
    pub fn select(key: impl Into<String>) -> Self {
        let key = key.into();
        Resolver::from_sync(move |input| Ok(input.root.get(&key).cloned().unwrap_or(Value::Null)))
    }

    pub fn invoke(&self, input: ResolverInput) -> ResolverFuture {
        (self.0)(input)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

/// A subscription field's emission entry point.
#[derive(Clone)]
pub struct Subscriber(Arc<dyn Fn(ResolverInput) -> SubscriberFuture + Send + Sync>);

impl Subscriber {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(ResolverInput) -> SubscriberFuture + Send + Sync + 'static,
    {
        Subscriber(Arc::new(f))
    }

    pub fn invoke(&self, input: ResolverInput) -> SubscriberFuture {
        (self.0)(input)
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber").finish_non_exhaustive()
    }
}
