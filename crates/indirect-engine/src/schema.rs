//! The schema walker.
//!
//! [`IndirectTransform::apply`] consumes a registry, validates every annotated
//! position eagerly, and returns the registry with the resolvers and
//! subscribers of affected fields replaced by wrapping closures. Fields
//! without an annotated result or argument are left exactly as they were.

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use futures_util::StreamExt;
use serde_json::Value;

use crate::{
    codec::IdCodec,
    context::{JsonMap, RequestContext},
    error::{BuildError, TransformResult},
    registry::{
        resolvers::{Resolver, Subscriber},
        IndirectDirective, InputValueType, MetaField, MetaType, Registry,
    },
    scope::{ScopeResolver, ScopeResolvers},
    transform::{
        decode::{decode_input, DecodeContext},
        encode::encode_result,
        input_needs_decoding, validate_input_value, PathNode, TransformEnv, TypeIndex,
    },
};

/// Builder for the indirection rewrite of a registry.
///
/// ```
/// # use indirect_engine::{IndirectTransform, Registry};
/// # use serde_json::Value;
/// # struct Codec;
/// # impl indirect_engine::IdCodec for Codec {
/// #     fn encode(&self, raw: &Value, tag: &str, _: Option<&Value>) -> String {
/// #         format!("{tag}:{raw}")
/// #     }
/// #     fn decode(&self, token: &str, _: Option<&Value>) -> Result<indirect_engine::DecodedId, indirect_engine::DecodeError> {
/// #         let (tag, raw) = token.split_once(':').ok_or_else(|| indirect_engine::DecodeError::new("bad token"))?;
/// #         Ok(indirect_engine::DecodedId { type_tag: tag.into(), raw: serde_json::from_str(raw).unwrap() })
/// #     }
/// # }
/// let registry = Registry::new().with_builtin_scalars();
/// let registry = IndirectTransform::new(Codec)
///     .context_key("session")
///     .apply(registry)
///     .unwrap();
/// ```
pub struct IndirectTransform {
    codec: Arc<dyn IdCodec>,
    context_key: String,
    custom_scopes: HashMap<String, ScopeResolver>,
}

impl IndirectTransform {
    pub fn new(codec: impl IdCodec + 'static) -> Self {
        IndirectTransform {
            codec: Arc::new(codec),
            context_key: "indirect".to_string(),
            custom_scopes: HashMap::new(),
        }
    }

    /// The request context key the built-in `CONTEXT` scope strategy reads.
    #[must_use]
    pub fn context_key(mut self, key: impl Into<String>) -> Self {
        self.context_key = key.into();
        self
    }

    /// Registers a scope resolution strategy under a label. Labels collide
    /// with the built-ins in favour of the caller.
    #[must_use]
    pub fn scope_resolver(mut self, label: impl Into<String>, resolver: ScopeResolver) -> Self {
        self.custom_scopes.insert(label.into(), resolver);
        self
    }

    /// Walks every object field of the registry, wrapping the ones with an
    /// annotated result or argument shape.
    ///
    /// All configuration problems surface here, not at request time.
    pub fn apply(self, mut registry: Registry) -> Result<Registry, BuildError> {
        let index = Arc::new(TypeIndex::build(&registry));
        let scopes = ScopeResolvers::new(self.context_key, self.custom_scopes);
        let env = Arc::new(TransformEnv {
            codec: self.codec,
            scopes,
            index,
        });

        let object_names: Vec<String> = registry
            .types
            .values()
            .filter_map(|ty| match ty {
                MetaType::Object(object) => Some(object.name.clone()),
                _ => None,
            })
            .collect();

        for type_name in object_names {
            let Some(MetaType::Object(object)) = registry.types.get_mut(&type_name) else {
                continue;
            };
            for field in object.fields.values_mut() {
                let position = format!("{type_name}.{}", field.name);
                let Some(plan) = plan_field(&env, &position, field)? else {
                    continue;
                };
                tracing::debug!(
                    position = %plan.position,
                    decoded_args = plan.args.len(),
                    encodes_result = plan.result.is_some(),
                    "wrapping field"
                );
                wrap_field(&env, Arc::new(plan), field);
            }
        }
        Ok(registry)
    }
}

/// What a wrapped field has to do at request time. Built once at apply time
/// and shared by every invocation of the field.
struct FieldPlan {
    position: String,
    /// Arguments whose shape contains at least one annotated scalar.
    args: Vec<ArgPlan>,
    result: Option<ResultPlan>,
}

struct ArgPlan {
    name: String,
    ty: InputValueType,
    directive: Option<IndirectDirective>,
}

struct ResultPlan {
    type_tag: String,
    directive: IndirectDirective,
}

fn plan_field(
    env: &TransformEnv,
    position: &str,
    field: &MetaField,
) -> Result<Option<FieldPlan>, BuildError> {
    let named = field.ty.named_type();
    let result = match &field.indirect {
        Some(directive) => {
            if !env.scopes.contains(&directive.scope) {
                return Err(BuildError::UnknownScopeType {
                    position: position.to_string(),
                    scope_type: directive.scope.clone(),
                });
            }
            if !env.index.contains(named.as_str()) {
                return Err(BuildError::UnknownType {
                    position: position.to_string(),
                    name: named.to_string(),
                });
            }
            if !env.index.is_scalar(named.as_str()) {
                return Err(BuildError::NotAScalarPosition {
                    position: position.to_string(),
                });
            }
            Some(ResultPlan {
                type_tag: directive.type_tag_for(&named),
                directive: directive.clone(),
            })
        }
        None => None,
    };

    let mut args = Vec::new();
    for arg in field.args.values() {
        let arg_position = format!("{position}.{}", arg.name);
        validate_input_value(&env.index, &env.scopes, &arg_position, arg, &mut BTreeSet::new())?;
        if input_needs_decoding(&env.index, arg) {
            args.push(ArgPlan {
                name: arg.name.clone(),
                ty: arg.ty.clone(),
                directive: arg.indirect.clone(),
            });
        }
    }

    if result.is_none() && args.is_empty() {
        return Ok(None);
    }
    Ok(Some(FieldPlan {
        position: position.to_string(),
        args,
        result,
    }))
}

fn wrap_field(env: &Arc<TransformEnv>, plan: Arc<FieldPlan>, field: &mut MetaField) {
    let inner = field
        .resolver
        .take()
        .unwrap_or_else(|| Resolver::select(field.name.clone()));
    field.resolver = Some(wrap_resolver(env.clone(), plan.clone(), inner));
    if let Some(subscriber) = field.subscriber.take() {
        field.subscriber = Some(wrap_subscriber(env.clone(), plan, subscriber));
    }
}

fn wrap_resolver(env: Arc<TransformEnv>, plan: Arc<FieldPlan>, inner: Resolver) -> Resolver {
    Resolver::new(move |mut input| {
        let env = env.clone();
        let plan = plan.clone();
        let inner = inner.clone();
        Box::pin(async move {
            let ctx = input.ctx.clone();
            // Arguments are decoded before the inner resolver runs; a failure
            // here aborts the field without invoking it.
            decode_args(&env, &ctx, &plan, &mut input.args)?;
            let value = inner.invoke(input).await?;
            encode_planned(&env, &ctx, &plan, value)
        })
    })
}

fn wrap_subscriber(env: Arc<TransformEnv>, plan: Arc<FieldPlan>, inner: Subscriber) -> Subscriber {
    Subscriber::new(move |mut input| {
        let env = env.clone();
        let plan = plan.clone();
        let inner = inner.clone();
        Box::pin(async move {
            let ctx = input.ctx.clone();
            decode_args(&env, &ctx, &plan, &mut input.args)?;
            let stream = inner.invoke(input).await?;
            // Every emission is encoded the same way a one-shot result is.
            Ok(stream
                .map(move |event| event.and_then(|value| encode_planned(&env, &ctx, &plan, value)))
                .boxed())
        })
    })
}

fn decode_args(
    env: &TransformEnv,
    ctx: &RequestContext,
    plan: &FieldPlan,
    args: &mut JsonMap,
) -> TransformResult<()> {
    let dctx = DecodeContext { env, ctx };
    let root = PathNode::new(&plan.position);
    for arg in &plan.args {
        let Some(slot) = args.get_mut(&arg.name) else { continue };
        if slot.is_null() {
            continue;
        }
        let current = slot.take();
        *slot = decode_input(
            &dctx,
            root.with(&arg.name),
            arg.ty.as_str(),
            arg.directive.as_ref(),
            current,
        )?;
    }
    Ok(())
}

fn encode_planned(
    env: &TransformEnv,
    ctx: &RequestContext,
    plan: &FieldPlan,
    value: Value,
) -> TransformResult<Value> {
    match &plan.result {
        Some(result) => encode_result(env, ctx, &plan.position, &result.type_tag, &result.directive, value),
        None => Ok(value),
    }
}
