//! Shared fixtures for the engine integration tests: a transparent test
//! codec, a small user-service registry and helpers for invoking single
//! fields the way a host engine would.

#![allow(clippy::panic)]

use futures_util::{stream, StreamExt};
use indirect_engine::{
    DecodeError, DecodedId, EventStream, IdCodec, IndirectDirective, InputObjectType, JsonMap,
    MetaField, MetaInputValue, ObjectType, Registry, RequestContext, Resolver, ResolverInput,
    Subscriber, TransformResult, CONTEXT_SCOPE,
};
use serde_json::{json, Value};

/// A codec whose tokens are readable JSON: `[type_tag, scope, raw]`.
///
/// Decoding rejects anything that is not a token of this shape and any token
/// whose embedded scope differs from the scope offered at decode time, which
/// is enough to exercise forged-token and cross-scope failure paths.
pub struct TestCodec;

impl IdCodec for TestCodec {
    fn encode(&self, raw: &Value, type_tag: &str, scope: Option<&Value>) -> String {
        let scope = scope.cloned().unwrap_or(Value::Null);
        json!([type_tag, scope, raw]).to_string()
    }

    fn decode(&self, token: &str, scope: Option<&Value>) -> Result<DecodedId, DecodeError> {
        let parts: Vec<Value> =
            serde_json::from_str(token).map_err(|_| DecodeError::new("malformed token"))?;
        let [Value::String(type_tag), token_scope, raw] = parts.as_slice() else {
            return Err(DecodeError::new("malformed token"));
        };
        let offered = scope.cloned().unwrap_or(Value::Null);
        if *token_scope != offered {
            return Err(DecodeError::new("token was issued for a different scope"));
        }
        Ok(DecodedId {
            type_tag: type_tag.clone(),
            raw: raw.clone(),
        })
    }
}

/// Encodes a raw value the way [`TestCodec`] does for an unscoped position.
pub fn encode_id(raw: impl Into<Value>, type_tag: &str) -> String {
    TestCodec.encode(&raw.into(), type_tag, None)
}

/// Encodes a raw value bound to a scope key.
pub fn encode_scoped_id(raw: impl Into<Value>, type_tag: &str, scope: Value) -> String {
    TestCodec.encode(&raw.into(), type_tag, Some(&scope))
}

pub fn users() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "User 1" }),
        json!({ "id": 2, "name": "User 2" }),
    ]
}

fn find_user(id: &Value) -> Value {
    users()
        .into_iter()
        .find(|user| user["id"] == *id)
        .unwrap_or(Value::Null)
}

/// A registry for a small user service, annotated the way a deployment
/// hiding its numeric user ids would annotate it.
///
/// Input shapes cover the interesting cases: a plain annotated argument, an
/// annotated list argument, input objects with annotated fields at several
/// nesting depths and a self-referential input type.
pub fn user_registry() -> Registry {
    let mut registry = Registry::new().with_builtin_scalars();

    registry.insert_type(ObjectType::new(
        "User",
        [
            MetaField::new("id", "ID!").with_indirect(IndirectDirective::tagged("User")),
            MetaField::new("name", "String"),
        ],
    ));

    // Plain property field, no explicit resolver: exercises the default
    // selection fallback on an annotated position.
    registry.insert_type(ObjectType::new(
        "UserIds",
        [MetaField::new("ids", "[ID!]!").with_indirect(IndirectDirective::tagged("User"))],
    ));

    registry.insert_type(InputObjectType::new(
        "UserInput",
        [
            MetaInputValue::new("id", "ID!").with_indirect(IndirectDirective::tagged("User")),
            MetaInputValue::new("name", "String"),
            MetaInputValue::new("friends", "[ID!]").with_indirect(IndirectDirective::tagged("User")),
        ],
    ));
    registry.insert_type(InputObjectType::new(
        "SubInput",
        [MetaInputValue::new("id", "ID!").with_indirect(IndirectDirective::tagged("User"))],
    ));
    registry.insert_type(InputObjectType::new(
        "UserWithSubsInput",
        [
            MetaInputValue::new("id", "ID!").with_indirect(IndirectDirective::tagged("User")),
            MetaInputValue::new("subs", "[SubInput!]"),
        ],
    ));
    // Only the innermost level carries an annotation.
    registry.insert_type(InputObjectType::new(
        "OuterInput",
        [MetaInputValue::new("middle", "MiddleInput")],
    ));
    registry.insert_type(InputObjectType::new(
        "MiddleInput",
        [
            MetaInputValue::new("label", "String"),
            MetaInputValue::new("inner", "InnerInput"),
        ],
    ));
    registry.insert_type(InputObjectType::new(
        "InnerInput",
        [MetaInputValue::new("id", "ID!").with_indirect(IndirectDirective::tagged("User"))],
    ));

    registry.insert_type(InputObjectType::new(
        "CircularInput",
        [
            MetaInputValue::new("id", "ID!").with_indirect(IndirectDirective::tagged("User")),
            MetaInputValue::new("next", "CircularInput"),
        ],
    ));

    registry.insert_type(ObjectType::new(
        "Query",
        [
            MetaField::new("user", "User")
                .with_arg(
                    MetaInputValue::new("id", "ID!").with_indirect(IndirectDirective::tagged("User")),
                )
                .with_resolver(Resolver::from_sync(|input| {
                    Ok(find_user(&input.args["id"]))
                })),
            MetaField::new("users", "[User!]!")
                .with_resolver(Resolver::from_sync(|_| Ok(Value::Array(users())))),
            MetaField::new("userIds", "[ID!]!")
                .with_indirect(IndirectDirective::tagged("User"))
                .with_resolver(Resolver::from_sync(|_| {
                    Ok(json!(users().iter().map(|user| user["id"].clone()).collect::<Vec<_>>()))
                })),
            MetaField::new("usersByIds", "[User!]!")
                .with_arg(
                    MetaInputValue::new("ids", "[ID!]!")
                        .with_indirect(IndirectDirective::tagged("User")),
                )
                .with_resolver(Resolver::from_sync(|input| {
                    let Some(Value::Array(ids)) = input.args.get("ids") else {
                        return Ok(json!([]));
                    };
                    Ok(Value::Array(ids.iter().map(find_user).collect()))
                })),
            MetaField::new("sessionUserId", "ID")
                .with_indirect(IndirectDirective::tagged("User").with_scope(CONTEXT_SCOPE))
                .with_arg(
                    MetaInputValue::new("id", "ID!").with_indirect(
                        IndirectDirective::tagged("User").with_scope(CONTEXT_SCOPE),
                    ),
                )
                .with_resolver(Resolver::from_sync(|input| Ok(input.args["id"].clone()))),
        ],
    ));

    registry.insert_type(ObjectType::new(
        "Mutation",
        [
            MetaField::new("createUser", "User")
                .with_arg(MetaInputValue::new("input", "UserInput!"))
                .with_resolver(Resolver::from_sync(|input| Ok(input.args["input"].clone()))),
            MetaField::new("linkUsers", "String")
                .with_arg(MetaInputValue::new("input", "UserWithSubsInput!"))
                .with_resolver(Resolver::from_sync(|input| {
                    Ok(json!(input.args["input"].to_string()))
                })),
            MetaField::new("chainUsers", "String")
                .with_arg(MetaInputValue::new("input", "CircularInput!"))
                .with_resolver(Resolver::from_sync(|input| {
                    Ok(json!(input.args["input"].to_string()))
                })),
            MetaField::new("deepUpdate", "String")
                .with_arg(MetaInputValue::new("input", "OuterInput!"))
                .with_resolver(Resolver::from_sync(|input| {
                    Ok(json!(input.args["input"].to_string()))
                })),
        ],
    ));
    registry.mutation_type = Some("Mutation".to_string());

    registry.insert_type(ObjectType::new(
        "Subscription",
        [MetaField::new("userCreated", "ID!")
            .with_indirect(IndirectDirective::tagged("User"))
            .with_subscriber(Subscriber::new(|_| {
                Box::pin(async {
                    let emissions: EventStream = stream::iter(
                        users().into_iter().map(|user| Ok(user["id"].clone())),
                    )
                    .boxed();
                    Ok(emissions)
                })
            }))],
    ));
    registry.subscription_type = Some("Subscription".to_string());

    registry
}

/// Builds an argument map from a JSON object literal.
pub fn args(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        _ => JsonMap::new(),
    }
}

/// Builds a request context from a JSON object literal.
pub fn request_context(value: Value) -> RequestContext {
    match value {
        Value::Object(map) => RequestContext::new(map),
        _ => RequestContext::default(),
    }
}

/// Invokes a single field's resolver the way a host engine would, falling
/// back to plain property selection when the field has none.
pub async fn resolve(
    registry: &Registry,
    type_name: &str,
    field_name: &str,
    root: Value,
    args: JsonMap,
    ctx: RequestContext,
) -> TransformResult<Value> {
    let field = registry
        .object(type_name)
        .and_then(|object| object.field(field_name))
        .unwrap_or_else(|| panic!("no field {type_name}.{field_name}"));
    let resolver = field
        .resolver
        .clone()
        .unwrap_or_else(|| Resolver::select(field_name.to_string()));
    resolver.invoke(ResolverInput { root, args, ctx }).await
}

/// Opens a subscription field's event stream.
pub async fn subscribe(
    registry: &Registry,
    type_name: &str,
    field_name: &str,
    args: JsonMap,
    ctx: RequestContext,
) -> TransformResult<EventStream> {
    let field = registry
        .object(type_name)
        .and_then(|object| object.field(field_name))
        .unwrap_or_else(|| panic!("no field {type_name}.{field_name}"));
    let subscriber = field
        .subscriber
        .clone()
        .unwrap_or_else(|| panic!("{type_name}.{field_name} has no subscriber"));
    subscriber.invoke(ResolverInput { root: Value::Null, args, ctx }).await
}
