//! EDN Core Parser
//!
//! Incremental parser for EDN (extensible data notation). Text arrives in
//! chunks of any size; each top-level value is handed back as soon as it is
//! complete.
//!
//! # Root framing
//!
//! [`StreamParser`] treats the first `(` it sees as the opening of an
//! implicit root sequence rather than a list, and its matching `)` as the
//! end of the stream. The values *inside* that sequence are the top-level
//! values. A stream of loose values therefore has to be wrapped by the
//! caller:
//!
//! ```
//! use edn_core::{StreamParser, Value};
//!
//! let mut parser = StreamParser::default();
//! let values = parser.feed("(:a {:b 1})").unwrap();
//! assert_eq!(values.len(), 2);
//! assert_eq!(values[0], Value::keyword("a"));
//! ```
//!
//! [`parse_all`], [`from_str`] and [`from_str_with`] do the wrapping for
//! complete documents:
//!
//! ```
//! let value = edn_core::from_str("(1 2)").unwrap();
//! assert_eq!(value.to_string(), "(1 2)");
//! ```
//!
//! # Architecture
//!
//! - **token.rs** - Bare token classification (scalars and tag starts)
//! - **builder.rs** - Frame stack assembling containers
//! - **tags.rs** - Tag resolution and the handler registry
//! - **options.rs** - Materialization policy and parse options
//! - **streaming.rs** - The chunk-fed driver
//! - **render.rs** - `Display` for values
//! - **span.rs** - Source locations
//! - **value.rs** - The value model

mod builder;
pub mod error;
pub mod options;
mod render;
pub mod span;
pub mod streaming;
pub mod tags;
pub mod token;
pub mod value;

use std::str::FromStr;

pub use error::{Error, ErrorCode, FrameKind, HandlerError, Result};
pub use options::{CharAs, KeywordAs, ListAs, MapAs, Materialize, ParseOptions, SetAs};
pub use span::Location;
pub use streaming::StreamParser;
pub use tags::{TagHandler, TagHandlers};
pub use value::{Tagged, Value};

/// Parse every top-level value in a complete document.
///
/// The input is wrapped in the root framing, so `1 2 3` yields three values.
/// The closing parenthesis goes on its own line to keep a trailing comment
/// from swallowing it, and is left off when the input leaves a container
/// open, so that case reports `UnterminatedContainer`.
pub fn parse_all(input: &str, options: &ParseOptions) -> Result<Vec<Value>> {
    let mut parser = StreamParser::new(options.clone());
    let mut values = Vec::new();
    for chunk in ["(", input, "\n"] {
        parser.feed_with(chunk, |value| values.push(value))?;
    }
    if parser.depth() == 0 {
        parser.feed_with(")", |value| values.push(value))?;
    }
    parser.finish_with(|value| values.push(value))?;
    Ok(values)
}

/// Parse the first value of a document, or `Nil` if it has none.
pub fn from_str_with(input: &str, options: &ParseOptions) -> Result<Value> {
    let values = parse_all(input, options)?;
    Ok(values.into_iter().next().unwrap_or(Value::Nil))
}

/// Parse the first value of a document with default options.
pub fn from_str(input: &str) -> Result<Value> {
    from_str_with(input, &ParseOptions::default())
}

impl FromStr for Value {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        from_str(s)
    }
}
