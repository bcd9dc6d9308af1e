//! The input direction: walking an argument value against its declared type
//! and decoding the annotated scalar leaves back to raw identifiers.
//!
//! The walk is driven by the concrete value, not the type graph. Field
//! transforms are looked up again on every structural step instead of being
//! memoized per type, so a self-referential input type needs no special
//! handling: recursion depth is bounded by the depth of the value itself.

use serde_json::Value;

use super::{kind_str, PathNode, TransformEnv};
use crate::{
    codec::DecodeError,
    context::RequestContext,
    error::{Error, TransformResult},
    registry::{named_type_from_type_str, IndirectDirective, InputObjectType, MetaTypeName, NamedType},
};

/// Borrowed state for one invocation's argument decoding.
pub(crate) struct DecodeContext<'a> {
    pub(crate) env: &'a TransformEnv,
    pub(crate) ctx: &'a RequestContext,
}

/// Decodes one input position.
///
/// A scalar position with an annotation becomes a leaf decode, list wrapping
/// included; everything else recurses structurally.
pub(crate) fn decode_input(
    dctx: &DecodeContext<'_>,
    path: PathNode<'_>,
    ty: &str,
    directive: Option<&IndirectDirective>,
    value: Value,
) -> TransformResult<Value> {
    if value.is_null() {
        return Ok(value);
    }
    let named = named_type_from_type_str(ty);
    if dctx.env.index.is_scalar(named) {
        return match directive {
            Some(directive) => decode_leaf(dctx, path, named, directive, value),
            None => Ok(value),
        };
    }
    decode_shape(dctx, path, ty, value)
}

fn decode_shape(
    dctx: &DecodeContext<'_>,
    path: PathNode<'_>,
    ty: &str,
    value: Value,
) -> TransformResult<Value> {
    match MetaTypeName::create(ty) {
        MetaTypeName::NonNull(inner) => decode_shape(dctx, path, inner, value),
        MetaTypeName::List(inner) => match value {
            Value::Null => Ok(Value::Null),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (idx, item) in items.into_iter().enumerate() {
                    let segment = idx.to_string();
                    out.push(decode_shape(dctx, path.with(&segment), inner, item)?);
                }
                Ok(Value::Array(out))
            }
            // GraphQL coerces a single value into a one-element list.
            value => decode_shape(dctx, path, inner, value),
        },
        MetaTypeName::Named(name) => match dctx.env.index.input_object(name) {
            Some(input_object) => decode_object(dctx, path, input_object, value),
            None => Ok(value),
        },
    }
}

fn decode_object(
    dctx: &DecodeContext<'_>,
    path: PathNode<'_>,
    input_object: &InputObjectType,
    value: Value,
) -> TransformResult<Value> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        // Shape validation belongs to the host engine; a mismatched value
        // passes through untouched.
        other => return Ok(other),
    };
    for (name, input_field) in &input_object.input_fields {
        let Some(slot) = fields.get_mut(name) else { continue };
        if slot.is_null() {
            continue;
        }
        let current = slot.take();
        *slot = decode_input(
            dctx,
            path.with(name),
            input_field.ty.as_str(),
            input_field.indirect.as_ref(),
            current,
        )?;
    }
    Ok(Value::Object(fields))
}

/// Decodes an annotated scalar leaf. The scope is resolved once here, then
/// applied to the whole leaf, element by element when the value is a list.
fn decode_leaf(
    dctx: &DecodeContext<'_>,
    path: PathNode<'_>,
    named_type: &str,
    directive: &IndirectDirective,
    value: Value,
) -> TransformResult<Value> {
    let position = path.render();
    let scope = dctx.env.scopes.resolve(dctx.ctx, &position, directive)?;
    let expected = directive.type_tag_for(&NamedType::from(named_type));
    decode_value(dctx, &position, &expected, scope.as_ref(), value)
}

fn decode_value(
    dctx: &DecodeContext<'_>,
    position: &str,
    expected: &str,
    scope: Option<&Value>,
    value: Value,
) -> TransformResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Array(items) => items
            .into_iter()
            .map(|item| decode_value(dctx, position, expected, scope, item))
            .collect::<TransformResult<Vec<_>>>()
            .map(Value::Array),
        Value::String(token) => {
            let decoded = dctx
                .env
                .codec
                .decode(&token, scope)
                .map_err(|source| Error::Decode {
                    position: position.to_string(),
                    source,
                })?;
            if decoded.type_tag != expected {
                return Err(Error::TypeTagMismatch {
                    position: position.to_string(),
                    expected: expected.to_string(),
                    actual: decoded.type_tag,
                });
            }
            Ok(decoded.raw)
        }
        other => Err(Error::Decode {
            position: position.to_string(),
            source: DecodeError::new(format!(
                "expected an encoded identifier, found a {} value",
                kind_str(&other)
            )),
        }),
    }
}
