use std::borrow::Cow;

use crate::codec::DecodeError;

pub type TransformResult<T> = Result<T, Error>;

/// Request-time failures.
///
/// All variants are client-input or configuration problems surfaced to the
/// caller as validation failures for the field being resolved; none are
/// engine-internal faults and none are retried. An argument decoding failure
/// aborts the field before its resolver runs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{position}` expects `{key}` to be set on the request context")]
    ScopeMissing { position: String, key: String },

    #[error("`{position}` has an unknown scope type `{scope_type}`")]
    UnknownScopeType { position: String, scope_type: String },

    #[error("Invalid value for `{position}`. Expected type `{expected}` but found `{actual}`")]
    TypeTagMismatch {
        position: String,
        expected: String,
        actual: String,
    },

    #[error("Could not decode the value for `{position}`: {source}")]
    Decode { position: String, source: DecodeError },

    /// A failure raised by user resolver logic, passed through untouched.
    #[error("{0}")]
    Resolver(Cow<'static, str>),
}

impl From<&'static str> for Error {
    fn from(message: &'static str) -> Self {
        Error::Resolver(message.into())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Resolver(message.into())
    }
}

/// Build-time failures, raised while walking the type graph rather than
/// lazily per request.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Unknown type `{name}` referenced by `{position}`")]
    UnknownType { position: String, name: String },

    #[error("`{position}` has an unknown scope type `{scope_type}`")]
    UnknownScopeType { position: String, scope_type: String },

    #[error("`{position}` carries an indirection directive but is not a scalar position")]
    NotAScalarPosition { position: String },
}
