use std::{ops::Deref, sync::Arc};

use serde_json::Value;

/// An ordered JSON object, the shape of argument maps and request contexts.
pub type JsonMap = serde_json::Map<String, Value>;

/// Per-request context supplied by the host execution engine.
///
/// The engine treats it as an opaque, read-only mapping: the only reads are
/// configured keys during scope resolution. Cloning is cheap, the underlying
/// map is shared.
#[derive(Clone, Debug, Default)]
pub struct RequestContext(Arc<JsonMap>);

impl RequestContext {
    pub fn new(values: JsonMap) -> Self {
        RequestContext(Arc::new(values))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl Deref for RequestContext {
    type Target = JsonMap;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<JsonMap> for RequestContext {
    fn from(values: JsonMap) -> Self {
        RequestContext::new(values)
    }
}
