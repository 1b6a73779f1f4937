//! Parse configuration: materialization policy and tag handlers.
//!
//! The policy decides the concrete [`Value`] built for each finished
//! container, keyword and character. It is applied when a container closes
//! and when a bare token is classified; strings, numbers and vectors are not
//! configurable.

use std::collections::BTreeMap;

use crate::error::HandlerError;
use crate::tags::TagHandlers;
use crate::value::Value;

/// Representation of maps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapAs {
    /// `Value::Map`: pairs in document order, duplicates kept.
    #[default]
    Pairs,
    /// `Value::Record`: string keys, last value wins. Keys iterate in sorted
    /// order, not document order.
    ///
    /// Strings are used as-is, keywords and symbols by name, characters as a
    /// one-character string. Any other key is coerced to its rendered EDN
    /// text, so `{1 :a}` becomes the record `{"1" :a}`.
    Record,
    /// `Value::SortedMap`: keyed by value, last value wins.
    Sorted,
}

/// Representation of sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetAs {
    /// `Value::Set`: elements in document order, duplicates kept.
    #[default]
    Wrapped,
    /// `Value::Vector`.
    Array,
    /// `Value::SortedSet`: duplicates collapse.
    Sorted,
}

/// Representation of lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListAs {
    /// `Value::List`.
    #[default]
    Wrapped,
    /// `Value::Vector`.
    Array,
}

/// Representation of keywords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeywordAs {
    /// `Value::Keyword`.
    #[default]
    Wrapped,
    /// `Value::String` holding the name without the colon.
    String,
}

/// Representation of characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CharAs {
    /// `Value::Char`.
    #[default]
    Wrapped,
    /// `Value::String` of length one.
    String,
}

/// The materialization policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Materialize {
    pub map_as: MapAs,
    pub set_as: SetAs,
    pub list_as: ListAs,
    pub keyword_as: KeywordAs,
    pub char_as: CharAs,
}

impl Materialize {
    pub fn vector(&self, items: Vec<Value>) -> Value {
        Value::Vector(items)
    }

    pub fn list(&self, items: Vec<Value>) -> Value {
        match self.list_as {
            ListAs::Wrapped => Value::List(items),
            ListAs::Array => Value::Vector(items),
        }
    }

    pub fn set(&self, items: Vec<Value>) -> Value {
        match self.set_as {
            SetAs::Wrapped => Value::Set(items),
            SetAs::Array => Value::Vector(items),
            SetAs::Sorted => Value::SortedSet(items.into_iter().collect()),
        }
    }

    pub fn map(&self, pairs: Vec<(Value, Value)>) -> Value {
        match self.map_as {
            MapAs::Pairs => Value::Map(pairs),
            MapAs::Record => Value::Record(
                pairs
                    .into_iter()
                    .map(|(key, value)| (record_key(key), value))
                    .collect::<BTreeMap<_, _>>(),
            ),
            MapAs::Sorted => Value::SortedMap(pairs.into_iter().collect()),
        }
    }

    pub fn keyword(&self, name: &str) -> Value {
        match self.keyword_as {
            KeywordAs::Wrapped => Value::Keyword(name.to_owned()),
            KeywordAs::String => Value::String(name.to_owned()),
        }
    }

    pub fn char(&self, ch: char) -> Value {
        match self.char_as {
            CharAs::Wrapped => Value::Char(ch),
            CharAs::String => Value::String(ch.to_string()),
        }
    }

    /// A backslash literal whose text is more than one character, such as
    /// `\abc`. As a string it is the text after the backslash. `Value::Char`
    /// holds a single `char`, so the wrapped form keeps the token verbatim as
    /// a symbol.
    pub fn char_text(&self, body: &str) -> Value {
        match self.char_as {
            CharAs::Wrapped => Value::Symbol(format!("\\{body}")),
            CharAs::String => Value::String(body.to_owned()),
        }
    }
}

fn record_key(key: Value) -> String {
    match key {
        Value::String(s) | Value::Keyword(s) | Value::Symbol(s) => s,
        Value::Char(c) => c.to_string(),
        other => other.to_string(),
    }
}

/// Everything a parser is constructed with.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub materialize: Materialize,
    pub tags: TagHandlers,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map_as(mut self, map_as: MapAs) -> Self {
        self.materialize.map_as = map_as;
        self
    }

    pub fn set_as(mut self, set_as: SetAs) -> Self {
        self.materialize.set_as = set_as;
        self
    }

    pub fn list_as(mut self, list_as: ListAs) -> Self {
        self.materialize.list_as = list_as;
        self
    }

    pub fn keyword_as(mut self, keyword_as: KeywordAs) -> Self {
        self.materialize.keyword_as = keyword_as;
        self
    }

    pub fn char_as(mut self, char_as: CharAs) -> Self {
        self.materialize.char_as = char_as;
        self
    }

    /// Register a handler for `#tag` forms. See [`TagHandlers::insert`].
    pub fn tag_handler<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.tags.insert(tag, handler);
        self
    }
}
