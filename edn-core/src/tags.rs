//! Tag resolution.
//!
//! A tag frame wraps exactly one following form. When that form completes,
//! the tag is resolved against the handler registry:
//!
//! 1. the discard marker `#_` drops the form entirely;
//! 2. a registered handler (the built-in `inst`, or a caller's) transforms it;
//! 3. otherwise the form is wrapped as a generic [`Value::Tagged`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::trace;

use crate::error::{Error, HandlerError, Result};
use crate::value::Value;

/// Name of the built-in timestamp tag.
pub const INST_TAG: &str = "inst";

/// A caller-supplied tag handler.
pub type TagHandler = Arc<dyn Fn(Value) -> Result<Value, HandlerError> + Send + Sync>;

#[derive(Clone)]
enum Handler {
    Inst,
    Custom(TagHandler),
}

/// Registry mapping tag names to handlers.
///
/// A fresh registry contains the built-in `inst` handler.
#[derive(Clone)]
pub struct TagHandlers {
    handlers: HashMap<String, Handler>,
}

impl TagHandlers {
    pub fn new() -> Self {
        let mut handlers = HashMap::new();
        handlers.insert(INST_TAG.to_owned(), Handler::Inst);
        Self { handlers }
    }

    /// Register `handler` for `#tag`.
    ///
    /// The last registration for a tag wins. This includes `inst`: inserting
    /// a handler under `"inst"` replaces the built-in timestamp conversion.
    pub fn insert<F>(&mut self, tag: impl Into<String>, handler: F)
    where
        F: Fn(Value) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(tag.into(), Handler::Custom(Arc::new(handler)));
    }

    /// Remove the handler for `tag`, so its forms become generic tagged values.
    pub fn remove(&mut self, tag: &str) -> bool {
        self.handlers.remove(tag).is_some()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Resolve a completed tag frame against its payload.
    pub(crate) fn resolve(&self, tag: TagName, inner: Value) -> Result<Resolved> {
        let name = match tag {
            TagName::Discard => {
                trace!(discarded = inner.type_name(), "discard");
                return Ok(Resolved::Drop);
            }
            TagName::Named(name) => name,
        };

        match self.handlers.get(&name) {
            Some(Handler::Inst) => parse_inst(&name, inner).map(Resolved::Value),
            Some(Handler::Custom(handler)) => {
                trace!(tag = %name, "calling tag handler");
                handler(inner)
                    .map(Resolved::Value)
                    .map_err(|source| Error::HandlerFailure { tag: name, source })
            }
            None => Ok(Resolved::Value(Value::tagged(name, inner))),
        }
    }
}

impl Default for TagHandlers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TagHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("TagHandlers").field("tags", &tags).finish()
    }
}

/// What a tag frame is waiting to wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TagName {
    Named(String),
    /// `#_`
    Discard,
}

/// Result of resolving a tag.
#[derive(Debug)]
pub(crate) enum Resolved {
    Drop,
    Value(Value),
}

/// Convert an `#inst` payload into a UTC timestamp.
///
/// Accepts RFC 3339 (any offset, including `-00:00`), a bare `YYYY-MM-DD`
/// (midnight UTC), and a date-time without an offset (taken as UTC).
fn parse_inst(tag: &str, inner: Value) -> Result<Value> {
    let invalid = |reason: String| Error::InvalidTagPayload { tag: tag.to_owned(), reason };

    let Value::String(text) = inner else {
        return Err(invalid(format!("expected a string, found {}", inner.type_name())));
    };

    if let Ok(t) = DateTime::parse_from_rfc3339(&text) {
        return Ok(Value::Inst(t.with_timezone(&Utc)));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Value::Inst(t.and_utc()));
    }
    if let Some(t) = NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Value::Inst(t.and_utc()));
    }

    Err(invalid(format!("{text:?} is not an RFC 3339 timestamp")))
}
