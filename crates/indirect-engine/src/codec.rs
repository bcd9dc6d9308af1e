//! The identifier codec seam.
//!
//! Turning a raw value plus type tag plus scope key into an opaque token (and
//! back) is the codec's job; the engine never constructs or inspects tokens,
//! it only moves them between schema positions and the codec.

use serde_json::Value;

/// An identifier codec.
///
/// Encoding must be deterministic for a fixed `(raw, type_tag, scope)` triple
/// within one request; decoding must reject tokens that are malformed, forged
/// or bound to a different scope.
pub trait IdCodec: Send + Sync {
    fn encode(&self, raw: &Value, type_tag: &str, scope: Option<&Value>) -> String;

    fn decode(&self, token: &str, scope: Option<&Value>) -> Result<DecodedId, DecodeError>;
}

/// A decoded token: the raw value and the type tag it was encoded with.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedId {
    pub type_tag: String,
    pub raw: Value,
}

/// Raised by the codec for malformed, forged or expired tokens.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{0}")]
pub struct DecodeError(String);

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        DecodeError(message.into())
    }
}
