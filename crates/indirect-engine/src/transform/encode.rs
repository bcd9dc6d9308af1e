//! The output direction: encoding a resolved result into opaque tokens.
//!
//! Only fields whose result position carries the annotation reach this code;
//! the schema walker wires it in after the inner resolver has produced its
//! value.

use serde_json::Value;

use super::TransformEnv;
use crate::{
    context::RequestContext,
    error::TransformResult,
    registry::IndirectDirective,
};

/// Encodes a result leaf. The scope is resolved once per invocation, list
/// results are encoded element by element, nulls stay null.
pub(crate) fn encode_result(
    env: &TransformEnv,
    ctx: &RequestContext,
    position: &str,
    type_tag: &str,
    directive: &IndirectDirective,
    value: Value,
) -> TransformResult<Value> {
    if value.is_null() {
        return Ok(value);
    }
    let scope = env.scopes.resolve(ctx, position, directive)?;
    Ok(encode_value(env, type_tag, scope.as_ref(), value))
}

fn encode_value(env: &TransformEnv, type_tag: &str, scope: Option<&Value>, value: Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| encode_value(env, type_tag, scope, item))
                .collect(),
        ),
        value => Value::String(env.codec.encode(&value, type_tag, scope)),
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use serde_json::json;

    use super::*;
    use crate::{
        codec::{DecodeError, DecodedId, IdCodec},
        error::Error,
        registry::Registry,
        scope::{ScopeResolvers, CONTEXT_SCOPE},
        transform::TypeIndex,
    };

    struct TagCodec;

    impl IdCodec for TagCodec {
        fn encode(&self, raw: &Value, type_tag: &str, scope: Option<&Value>) -> String {
            match scope {
                Some(scope) => format!("{type_tag}@{scope}:{raw}"),
                None => format!("{type_tag}:{raw}"),
            }
        }

        fn decode(&self, _token: &str, _scope: Option<&Value>) -> Result<DecodedId, DecodeError> {
            Err(DecodeError::new("not used here"))
        }
    }

    fn env() -> TransformEnv {
        TransformEnv {
            codec: Arc::new(TagCodec),
            scopes: ScopeResolvers::new("indirect".to_string(), HashMap::new()),
            index: Arc::new(TypeIndex::build(&Registry::new().with_builtin_scalars())),
        }
    }

    #[test]
    fn scalar_result_becomes_a_token() {
        let env = env();
        let encoded = encode_result(
            &env,
            &RequestContext::default(),
            "Query.user.id",
            "ID",
            &IndirectDirective::default(),
            json!(7),
        )
        .unwrap();
        assert_eq!(encoded, json!("ID:7"));
    }

    #[test]
    fn list_results_are_encoded_per_element_with_nulls_kept() {
        let env = env();
        let encoded = encode_result(
            &env,
            &RequestContext::default(),
            "Query.userIds",
            "User",
            &IndirectDirective::default(),
            json!([1, null, 2]),
        )
        .unwrap();
        assert_eq!(encoded, json!(["User:1", null, "User:2"]));
    }

    #[test]
    fn null_result_is_skipped_before_scope_resolution() {
        let env = env();
        let directive = IndirectDirective::default().with_scope(CONTEXT_SCOPE);
        // Would fail with ScopeMissing if the scope were resolved.
        let encoded = encode_result(
            &env,
            &RequestContext::default(),
            "Query.user.id",
            "ID",
            &directive,
            Value::Null,
        )
        .unwrap();
        assert_eq!(encoded, Value::Null);
    }

    #[test]
    fn scope_key_reaches_the_codec() {
        let env = env();
        let mut ctx = crate::context::JsonMap::new();
        ctx.insert("indirect".to_string(), json!("acme"));
        let directive = IndirectDirective::default().with_scope(CONTEXT_SCOPE);
        let encoded = encode_result(
            &env,
            &RequestContext::new(ctx),
            "Query.user.id",
            "ID",
            &directive,
            json!(7),
        )
        .unwrap();
        assert_eq!(encoded, json!("ID@\"acme\":7"));
    }

    #[test]
    fn missing_context_key_is_an_error() {
        let env = env();
        let directive = IndirectDirective::default().with_scope(CONTEXT_SCOPE);
        let err = encode_result(
            &env,
            &RequestContext::default(),
            "Query.user.id",
            "ID",
            &directive,
            json!(7),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ScopeMissing { .. }));
    }
}
