//! Content hook — a swappable transform applied to page data right before
//! execution.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::sink::{RequestContext, ResponseSink};

type HookFn = dyn Fn(&mut dyn ResponseSink, &RequestContext, Value) -> Value + Send + Sync;

/// Data transform run on every `execute`, scoped to one registry.
///
/// Cloning shares the underlying function.
#[derive(Clone)]
pub struct ContentHook {
    func: Option<Arc<HookFn>>,
}

impl ContentHook {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut dyn ResponseSink, &RequestContext, Value) -> Value + Send + Sync + 'static,
    {
        let func: Arc<HookFn> = Arc::new(func);
        ContentHook { func: Some(func) }
    }

    /// The default hook: returns data unchanged.
    pub fn identity() -> Self {
        ContentHook { func: None }
    }

    pub fn is_identity(&self) -> bool {
        self.func.is_none()
    }

    pub fn apply(&self, sink: &mut dyn ResponseSink, request: &RequestContext, data: Value) -> Value {
        match &self.func {
            Some(func) => func(sink, request, data),
            None => data,
        }
    }
}

impl Default for ContentHook {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for ContentHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_identity() { "identity" } else { "custom" };
        f.debug_tuple("ContentHook").field(&kind).finish()
    }
}
