//! Incremental, chunk-fed parsing.
//!
//! [`StreamParser`] consumes text in arbitrarily sized chunks and hands back
//! each top-level value as soon as the character that completes it has been
//! seen. All lexical state (partial tokens, half-read strings and escapes,
//! open containers and tags) lives in the parser between calls, so a chunk
//! boundary may fall anywhere.
//!
//! # Root framing
//!
//! The first `(` that is not inside a string or comment does **not** open a
//! list. It opens the implicit root sequence, and the forms inside it are
//! the top-level values. Its matching `)` ends the stream. Callers streaming
//! a free sequence of values must supply this pair themselves:
//!
//! ```
//! use edn_core::{ParseOptions, StreamParser, Value};
//!
//! let mut parser = StreamParser::new(ParseOptions::default());
//! let mut values = parser.feed("(1 [2").unwrap();
//! values.extend(parser.feed(" 3] :k)").unwrap());
//!
//! assert!(parser.is_done());
//! assert_eq!(values.len(), 3);
//! assert_eq!(values[2], Value::keyword("k"));
//! ```
//!
//! To parse a complete string in one call, use [`crate::parse_all`] or
//! [`crate::from_str`], which add the framing.

use std::mem;

use memchr::{memchr, memchr2};
use phf::phf_map;
use tracing::{debug, instrument, trace};

use crate::builder::{Builder, Open};
use crate::error::{Error, FrameKind, Result};
use crate::options::ParseOptions;
use crate::span::Location;
use crate::tags::TagName;
use crate::token::Token;
use crate::value::Value;

/// Single-character string escapes, keyed by the character after `\`.
static STRING_ESCAPES: phf::Map<char, char> = phf_map! {
    't' => '\t',
    'r' => '\r',
    'n' => '\n',
    '\\' => '\\',
    '"' => '"',
    'b' => '\u{08}',
    'f' => '\u{0C}',
};

/// Lexical mode.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Idle,
    InString,
    InEscape(Escape),
    InComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Escape {
    /// Just saw the backslash.
    Start(Location),
    /// Inside `\uXXXX`, with the hex digits read so far.
    Unicode { start: Location, digits: String },
}

#[inline]
fn is_separator(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | ',')
}

/// An incremental EDN parser for one logical stream.
#[derive(Debug)]
pub struct StreamParser {
    options: ParseOptions,
    mode: Mode,
    /// Bare token or string contents accumulated since the last delimiter.
    token: String,
    builder: Builder,
    root_opened: bool,
    done: bool,
    failed: bool,
    /// Position of the next character.
    location: Location,
    /// Where the current string literal opened.
    string_start: Location,
}

impl StreamParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            mode: Mode::Idle,
            token: String::new(),
            builder: Builder::new(),
            root_opened: false,
            done: false,
            failed: false,
            location: Location::start(),
            string_start: Location::start(),
        }
    }

    /// Feed a chunk and collect the top-level values it completes.
    pub fn feed(&mut self, chunk: &str) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        self.feed_with(chunk, |value| values.push(value))?;
        Ok(values)
    }

    /// Feed a chunk, passing each completed top-level value to `emit`.
    ///
    /// Values are delivered in document order as they complete. If a later
    /// character in the same chunk fails, the values already delivered stay
    /// delivered and the parser is poisoned.
    #[instrument(level = "trace", skip_all, fields(bytes = chunk.len()))]
    pub fn feed_with<F>(&mut self, chunk: &str, mut emit: F) -> Result<()>
    where
        F: FnMut(Value),
    {
        if self.failed {
            return Err(Error::Poisoned);
        }
        let result = self.run(chunk, &mut emit);
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    /// True once the root sequence has closed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Open containers and tags, not counting the root sequence.
    pub fn depth(&self) -> usize {
        self.builder.depth()
    }

    /// Position of the next character to be fed.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Signal end of input and collect any last top-level value.
    pub fn finish(self) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        self.finish_with(|value| values.push(value))?;
        Ok(values)
    }

    /// Signal end of input.
    ///
    /// A bare token still pending is finalized. Ending inside a string is
    /// `UnterminatedString`; ending with containers open, or with the root
    /// sequence opened but not closed, is `UnterminatedContainer`.
    pub fn finish_with<F>(mut self, mut emit: F) -> Result<()>
    where
        F: FnMut(Value),
    {
        if self.failed {
            return Err(Error::Poisoned);
        }

        match self.mode {
            Mode::InString | Mode::InEscape(_) => {
                return Err(Error::UnterminatedString { start: self.string_start });
            }
            Mode::Idle | Mode::InComment => {}
        }

        self.flush_token(&mut emit)?;

        let unclosed_root = self.root_opened && !self.done;
        let depth = self.builder.depth() + usize::from(unclosed_root);
        debug!(depth, done = self.done, at = %self.location, "finish");

        match self.builder.innermost() {
            Some(innermost) => Err(Error::UnterminatedContainer { innermost, depth }),
            None if unclosed_root => {
                Err(Error::UnterminatedContainer { innermost: FrameKind::Root, depth })
            }
            None => Ok(()),
        }
    }

    // ========================================================================
    // Character loop
    // ========================================================================

    fn run(&mut self, chunk: &str, emit: &mut dyn FnMut(Value)) -> Result<()> {
        let mut rest = chunk;
        while !rest.is_empty() {
            // Inside strings and comments, jump to the next byte that matters.
            let skip = match self.mode {
                Mode::InString => memchr2(b'"', b'\\', rest.as_bytes()).unwrap_or(rest.len()),
                Mode::InComment => memchr(b'\n', rest.as_bytes()).unwrap_or(rest.len()),
                Mode::Idle | Mode::InEscape(_) => 0,
            };
            if skip > 0 {
                let (run, tail) = rest.split_at(skip);
                if self.mode == Mode::InString {
                    self.token.push_str(run);
                }
                self.location.advance_str(run);
                rest = tail;
                continue;
            }

            let mut chars = rest.chars();
            let Some(ch) = chars.next() else {
                break;
            };
            rest = chars.as_str();

            let at = self.location;
            self.location.advance(ch);
            self.step(ch, at, emit)?;
        }
        Ok(())
    }

    fn step(&mut self, ch: char, at: Location, emit: &mut dyn FnMut(Value)) -> Result<()> {
        if self.done {
            if is_separator(ch) {
                return Ok(());
            }
            return Err(Error::FeedAfterDone { found: ch, location: at });
        }

        match mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Idle => self.step_idle(ch, at, emit),
            Mode::InString => self.step_string(ch, at, emit),
            Mode::InEscape(escape) => self.step_escape(escape, ch),
            Mode::InComment => {
                if ch != '\n' {
                    self.mode = Mode::InComment;
                }
                Ok(())
            }
        }
    }

    fn step_idle(&mut self, ch: char, at: Location, emit: &mut dyn FnMut(Value)) -> Result<()> {
        // A lone backslash takes the next character verbatim: `\(`, `\"`, `\;`.
        if self.token == "\\" && !matches!(ch, ' ' | '\t' | '\n' | '\r') {
            self.token.push(ch);
            return Ok(());
        }

        match ch {
            _ if is_separator(ch) => self.flush_token(emit),
            '"' => {
                self.flush_token(emit)?;
                self.string_start = at;
                self.mode = Mode::InString;
                Ok(())
            }
            ';' => {
                self.flush_token(emit)?;
                self.mode = Mode::InComment;
                Ok(())
            }
            '{' if self.token == "#" => {
                self.token.clear();
                self.builder.open(Open::Set);
                Ok(())
            }
            '_' if self.token == "#" => {
                self.token.clear();
                self.builder.open_tag(TagName::Discard);
                Ok(())
            }
            '[' | '{' | '(' => {
                self.flush_token(emit)?;
                match ch {
                    '[' => self.builder.open(Open::Vector),
                    '{' => self.builder.open(Open::Map),
                    _ if self.root_opened => self.builder.open(Open::List),
                    _ => {
                        debug!(at = %at, "root opened");
                        self.root_opened = true;
                    }
                }
                Ok(())
            }
            ']' | '}' | ')' => {
                self.flush_token(emit)?;
                self.close(ch, at, emit)
            }
            _ => {
                self.token.push(ch);
                Ok(())
            }
        }
    }

    fn step_string(&mut self, ch: char, at: Location, emit: &mut dyn FnMut(Value)) -> Result<()> {
        match ch {
            '"' => {
                let text = mem::take(&mut self.token);
                self.attach(Value::String(text), emit)
            }
            '\\' => {
                self.mode = Mode::InEscape(Escape::Start(at));
                Ok(())
            }
            _ => {
                self.token.push(ch);
                self.mode = Mode::InString;
                Ok(())
            }
        }
    }

    fn step_escape(&mut self, escape: Escape, ch: char) -> Result<()> {
        match escape {
            Escape::Start(start) if ch == 'u' => {
                self.mode = Mode::InEscape(Escape::Unicode { start, digits: String::new() });
            }
            Escape::Start(location) => {
                let &mapped = STRING_ESCAPES
                    .get(&ch)
                    .ok_or(Error::InvalidEscape { found: ch, location })?;
                self.token.push(mapped);
                self.mode = Mode::InString;
            }
            Escape::Unicode { start, mut digits } => {
                if !ch.is_ascii_hexdigit() {
                    return Err(Error::InvalidEscape { found: 'u', location: start });
                }
                digits.push(ch);
                if digits.len() < 4 {
                    self.mode = Mode::InEscape(Escape::Unicode { start, digits });
                    return Ok(());
                }
                let decoded = u32::from_str_radix(&digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(Error::InvalidEscape { found: 'u', location: start })?;
                self.token.push(decoded);
                self.mode = Mode::InString;
            }
        }
        Ok(())
    }

    fn close(&mut self, ch: char, at: Location, emit: &mut dyn FnMut(Value)) -> Result<()> {
        if self.builder.depth() > 0 {
            let ParseOptions { materialize, tags } = &self.options;
            self.builder.close(ch, at, materialize, tags)?;
            self.drain(emit);
            return Ok(());
        }

        if self.root_opened && ch == ')' {
            debug!(at = %at, "root closed");
            self.done = true;
            return Ok(());
        }

        let open = self.root_opened.then_some(FrameKind::Root);
        Err(Error::UnexpectedClosingDelimiter { found: ch, open, location: at })
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Classify the pending bare token and attach the result.
    fn flush_token(&mut self, emit: &mut dyn FnMut(Value)) -> Result<()> {
        let policy = &self.options.materialize;
        let value = match Token::classify(&self.token) {
            None => return Ok(()),
            Some(Token::Tag(name)) => {
                let tag = TagName::Named(name.to_owned());
                self.token.clear();
                self.builder.open_tag(tag);
                return Ok(());
            }
            Some(Token::Nil) => Value::Nil,
            Some(Token::Bool(b)) => Value::Bool(b),
            Some(Token::Integer(i)) => Value::Integer(i),
            Some(Token::BigInt(i)) => Value::BigInt(i),
            Some(Token::Float(f)) => Value::Float(f),
            Some(Token::Char(c)) => policy.char(c),
            Some(Token::CharText(body)) => policy.char_text(body),
            Some(Token::Keyword(name)) => policy.keyword(name),
            Some(Token::Symbol(name)) => Value::Symbol(name.to_owned()),
        };
        self.token.clear();
        self.attach(value, emit)
    }

    fn attach(&mut self, value: Value, emit: &mut dyn FnMut(Value)) -> Result<()> {
        self.builder.attach(value, &self.options.tags)?;
        self.drain(emit);
        Ok(())
    }

    fn drain(&mut self, emit: &mut dyn FnMut(Value)) {
        if let Some(value) = self.builder.take_pending() {
            trace!(kind = value.type_name(), at = %self.location, "emit");
            emit(value);
        }
    }
}

impl Default for StreamParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}
