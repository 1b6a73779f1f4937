//! Parse errors.
//!
//! Every malformed document surfaces as an [`Error`] from `feed` or
//! `finish`; nothing is silently recovered.

use std::fmt;

use thiserror::Error;

use crate::span::Location;

/// Boxed error returned by caller-supplied tag handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The kind of an open container, as reported in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// The implicit root list (never pushed as a frame).
    Root,
    Vector,
    List,
    Set,
    Map,
    /// A tag still waiting for the form it wraps.
    Tag,
}

impl FrameKind {
    /// The closing delimiter that ends this container, if any.
    pub fn closing_delimiter(self) -> Option<char> {
        match self {
            FrameKind::Root | FrameKind::List => Some(')'),
            FrameKind::Vector => Some(']'),
            FrameKind::Set | FrameKind::Map => Some('}'),
            FrameKind::Tag => None,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrameKind::Root => "root list",
            FrameKind::Vector => "vector",
            FrameKind::List => "list",
            FrameKind::Set => "set",
            FrameKind::Map => "map",
            FrameKind::Tag => "tag",
        })
    }
}

/// Errors raised while parsing.
#[derive(Debug, Error)]
pub enum Error {
    /// A closing delimiter with nothing open, or one that does not match the
    /// innermost open container.
    #[error("unexpected `{found}` at {location}{}", describe_open(.open))]
    UnexpectedClosingDelimiter {
        found: char,
        open: Option<FrameKind>,
        location: Location,
    },

    /// Input ended with containers still open.
    #[error("unterminated {innermost} at end of input ({depth} open)")]
    UnterminatedContainer { innermost: FrameKind, depth: usize },

    /// Input ended inside a string literal or one of its escapes.
    #[error("unterminated string starting at {start}")]
    UnterminatedString { start: Location },

    /// A backslash escape outside the string escape table.
    #[error("invalid string escape `\\{found}` at {location}")]
    InvalidEscape { found: char, location: Location },

    /// A map closed with a key that never received its value.
    #[error("map closed at {location} with a key but no value")]
    UnpairedMapKey { location: Location },

    /// The built-in `#inst` tag got something it cannot turn into a timestamp.
    #[error("invalid payload for #{tag}: {reason}")]
    InvalidTagPayload { tag: String, reason: String },

    /// A caller-supplied tag handler failed.
    #[error("handler for #{tag} failed: {source}")]
    HandlerFailure {
        tag: String,
        #[source]
        source: HandlerError,
    },

    /// Input arrived after the root list was closed.
    #[error("input `{found}` at {location} after the root list was closed")]
    FeedAfterDone { found: char, location: Location },

    /// The parser already failed and cannot continue.
    #[error("parser already failed on an earlier error")]
    Poisoned,
}

fn describe_open(open: &Option<FrameKind>) -> String {
    match open {
        Some(kind) => format!(" while a {kind} is open"),
        None => " with nothing open".to_owned(),
    }
}

/// Compact error codes, one per [`Error`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    UnexpectedClosingDelimiter = 0,
    UnterminatedContainer,
    UnterminatedString,
    InvalidEscape,
    UnpairedMapKey,
    InvalidTagPayload,
    HandlerFailure,
    FeedAfterDone,
    Poisoned,
}

impl ErrorCode {
    /// Get a human-readable message for this error code.
    pub fn message(self) -> &'static str {
        match self {
            Self::UnexpectedClosingDelimiter => "unexpected closing delimiter",
            Self::UnterminatedContainer => "unterminated container",
            Self::UnterminatedString => "unterminated string",
            Self::InvalidEscape => "invalid escape",
            Self::UnpairedMapKey => "unpaired map key",
            Self::InvalidTagPayload => "invalid tag payload",
            Self::HandlerFailure => "handler failure",
            Self::FeedAfterDone => "feed after done",
            Self::Poisoned => "poisoned",
        }
    }
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::UnexpectedClosingDelimiter { .. } => ErrorCode::UnexpectedClosingDelimiter,
            Error::UnterminatedContainer { .. } => ErrorCode::UnterminatedContainer,
            Error::UnterminatedString { .. } => ErrorCode::UnterminatedString,
            Error::InvalidEscape { .. } => ErrorCode::InvalidEscape,
            Error::UnpairedMapKey { .. } => ErrorCode::UnpairedMapKey,
            Error::InvalidTagPayload { .. } => ErrorCode::InvalidTagPayload,
            Error::HandlerFailure { .. } => ErrorCode::HandlerFailure,
            Error::FeedAfterDone { .. } => ErrorCode::FeedAfterDone,
            Error::Poisoned => ErrorCode::Poisoned,
        }
    }

    /// True when more input could have completed the document.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            Error::UnterminatedContainer { .. } | Error::UnterminatedString { .. }
        )
    }
}
