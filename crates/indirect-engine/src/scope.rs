//! Scope resolution strategies.
//!
//! A directive's `scope` label selects the strategy that derives the scope
//! key a token is encoded and decoded under for the current request. Built-in
//! strategies are merged under caller-supplied ones, the caller winning on
//! label collision.

use std::{collections::HashMap, sync::Arc};

use serde_json::Value;

use crate::{context::RequestContext, error::Error, registry::IndirectDirective};

/// The value narrowing which context a token is valid in. `None` denotes an
/// unscoped, public token.
pub type ScopeKey = Option<Value>;

/// Derives the scope key for one annotated position from the request context.
pub type ScopeResolver =
    Arc<dyn Fn(&RequestContext, &str, &IndirectDirective) -> Result<ScopeKey, Error> + Send + Sync>;

/// Unscoped: tokens are portable but not access-restricted.
pub const PUBLIC_SCOPE: &str = "PUBLIC";

/// Scoped to a configured key read from the request context.
pub const CONTEXT_SCOPE: &str = "CONTEXT";

#[derive(Clone)]
pub(crate) struct ScopeResolvers {
    strategies: HashMap<String, ScopeResolver>,
}

impl ScopeResolvers {
    pub(crate) fn new(context_key: String, custom: HashMap<String, ScopeResolver>) -> Self {
        let mut strategies: HashMap<String, ScopeResolver> = HashMap::new();
        strategies.insert(PUBLIC_SCOPE.to_string(), Arc::new(|_, _, _| Ok(None)));
        strategies.insert(
            CONTEXT_SCOPE.to_string(),
            Arc::new(move |ctx, position, _| {
                ctx.get(&context_key).cloned().map(Some).ok_or_else(|| Error::ScopeMissing {
                    position: position.to_string(),
                    key: context_key.clone(),
                })
            }),
        );
        strategies.extend(custom);
        ScopeResolvers { strategies }
    }

    pub(crate) fn contains(&self, label: &str) -> bool {
        self.strategies.contains_key(label)
    }

    /// Resolves the scope key for one annotated position. Invoked at most
    /// once per position per invocation, never cached across requests.
    pub(crate) fn resolve(
        &self,
        ctx: &RequestContext,
        position: &str,
        directive: &IndirectDirective,
    ) -> Result<ScopeKey, Error> {
        let Some(strategy) = self.strategies.get(&directive.scope) else {
            return Err(Error::UnknownScopeType {
                position: position.to_string(),
                scope_type: directive.scope.clone(),
            });
        };
        strategy(ctx, position, directive)
    }
}
