//! Structural assembly of values from completed forms.
//!
//! The builder keeps a stack of open frames, innermost last. Completed
//! children are attached to the innermost frame; closing a frame
//! materializes it and attaches the result to its parent. A value attached
//! with nothing open lands in the pending slot, where the driver picks it
//! up as a top-level value.
//!
//! The implicit root list is not a frame: the driver tracks it separately,
//! so `depth() == 0` means "directly inside the root".

use tracing::trace;

use crate::error::{Error, FrameKind, Result};
use crate::options::Materialize;
use crate::span::Location;
use crate::tags::{Resolved, TagHandlers, TagName};
use crate::value::Value;

// ============================================================================
// Frames
// ============================================================================

#[derive(Debug)]
enum Frame {
    Vector(Vec<Value>),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map {
        entries: Vec<(Value, Value)>,
        /// A key still waiting for its value.
        key: Option<Value>,
    },
    Tag(TagName),
}

impl Frame {
    fn kind(&self) -> FrameKind {
        match self {
            Frame::Vector(_) => FrameKind::Vector,
            Frame::List(_) => FrameKind::List,
            Frame::Set(_) => FrameKind::Set,
            Frame::Map { .. } => FrameKind::Map,
            Frame::Tag(_) => FrameKind::Tag,
        }
    }
}

/// Container kinds that can be opened by a delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Open {
    Vector,
    List,
    Set,
    Map,
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Debug, Default)]
pub(crate) struct Builder {
    stack: Vec<Frame>,
    /// A completed top-level value. `None` means nothing has completed,
    /// which is distinct from `Some(Value::Nil)`.
    pending: Option<Value>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open frames, tag frames included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn innermost(&self) -> Option<FrameKind> {
        self.stack.last().map(Frame::kind)
    }

    pub fn open(&mut self, kind: Open) {
        let frame = match kind {
            Open::Vector => Frame::Vector(Vec::new()),
            Open::List => Frame::List(Vec::new()),
            Open::Set => Frame::Set(Vec::new()),
            Open::Map => Frame::Map { entries: Vec::new(), key: None },
        };
        trace!(kind = %frame.kind(), depth = self.stack.len() + 1, "open");
        self.stack.push(frame);
    }

    /// Push a tag frame; the next completed form becomes its payload.
    pub fn open_tag(&mut self, tag: TagName) {
        trace!(tag = ?tag, depth = self.stack.len() + 1, "open tag");
        self.stack.push(Frame::Tag(tag));
    }

    /// Close the innermost frame with `found` and attach the finished value.
    ///
    /// Fails when nothing is open, when the innermost frame is a tag still
    /// waiting for its payload, when the delimiter belongs to another kind,
    /// or when a map holds a key without a value.
    pub fn close(
        &mut self,
        found: char,
        location: Location,
        policy: &Materialize,
        tags: &TagHandlers,
    ) -> Result<()> {
        let open = self.innermost();
        let matches = open.is_some_and(|kind| kind.closing_delimiter() == Some(found));
        if !matches {
            return Err(Error::UnexpectedClosingDelimiter { found, open, location });
        }

        let value = match self.stack.pop() {
            Some(Frame::Vector(items)) => policy.vector(items),
            Some(Frame::List(items)) => policy.list(items),
            Some(Frame::Set(items)) => policy.set(items),
            Some(Frame::Map { entries, key: None }) => policy.map(entries),
            Some(Frame::Map { key: Some(_), .. }) => return Err(Error::UnpairedMapKey { location }),
            Some(Frame::Tag(_)) | None => {
                return Err(Error::UnexpectedClosingDelimiter { found, open, location })
            }
        };

        trace!(kind = value.type_name(), depth = self.stack.len(), "close");
        self.attach(value, tags)
    }

    /// Attach a completed value to the innermost frame.
    ///
    /// A tag frame is popped and resolved, and its result is attached in
    /// turn, so `#a #b x` cascades outward until a container (or the
    /// top level) takes the value. A discarded payload stops the cascade.
    pub fn attach(&mut self, value: Value, tags: &TagHandlers) -> Result<()> {
        let mut value = value;
        loop {
            match self.stack.last_mut() {
                None => {
                    debug_assert!(self.pending.is_none(), "pending value was not drained");
                    self.pending = Some(value);
                    return Ok(());
                }
                Some(Frame::Vector(items) | Frame::List(items) | Frame::Set(items)) => {
                    items.push(value);
                    return Ok(());
                }
                Some(Frame::Map { entries, key }) => {
                    match key.take() {
                        Some(k) => entries.push((k, value)),
                        None => *key = Some(value),
                    }
                    return Ok(());
                }
                Some(Frame::Tag(_)) => {}
            }

            let Some(Frame::Tag(tag)) = self.stack.pop() else {
                return Ok(());
            };
            match tags.resolve(tag, value)? {
                Resolved::Drop => return Ok(()),
                Resolved::Value(resolved) => value = resolved,
            }
        }
    }

    /// Remove the completed top-level value, if any.
    pub fn take_pending(&mut self) -> Option<Value> {
        self.pending.take()
    }
}
