//! Bare token classification.
//!
//! A bare token is a run of non-delimiter characters. Classification is by
//! syntax alone and the patterns are mutually exclusive, so the first match
//! wins:
//!
//! - `nil` / `true` / `false`
//! - `:name` → Keyword
//! - `##Inf`, `##-Inf`, `##NaN` → Float
//! - `#name` → start of a tag (not a scalar)
//! - integer pattern → Integer (promoted to BigInt, then Float, on overflow)
//! - float pattern → Float
//! - integer pattern + `N` → BigInt
//! - `\c`, `\space`, `\u00e9`, ... → Char
//! - `\` + any other text → CharText (the text after the backslash)
//! - anything else → Symbol
//!
//! A token that looks numeric but misses its pattern (`007`, `1.`, `+`) is a
//! symbol, never an error.

use phf::phf_map;

/// Named character literals, without the leading backslash.
static NAMED_CHARS: phf::Map<&'static str, char> = phf_map! {
    "space" => ' ',
    "newline" => '\n',
    "return" => '\r',
    "tab" => '\t',
    "formfeed" => '\u{0C}',
    "backspace" => '\u{08}',
    "\\" => '\\',
};

/// A classified bare token, borrowing from the token buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    Nil,
    Bool(bool),
    Integer(i64),
    BigInt(i128),
    Float(f64),
    Char(char),
    /// A backslash literal longer than one character that is neither a
    /// named form nor `\uXXXX`. Holds the text after the backslash.
    CharText(&'a str),
    /// Keyword name without the colon.
    Keyword(&'a str),
    Symbol(&'a str),
    /// Tag name without the `#`. The next form becomes its payload.
    Tag(&'a str),
}

impl<'a> Token<'a> {
    /// Classify a bare token. Returns `None` for the empty token.
    pub fn classify(text: &'a str) -> Option<Token<'a>> {
        let bytes = text.as_bytes();
        let first = *bytes.first()?;

        match text {
            "nil" => return Some(Token::Nil),
            "true" => return Some(Token::Bool(true)),
            "false" => return Some(Token::Bool(false)),
            _ => {}
        }

        if first == b':' {
            return Some(Token::Keyword(&text[1..]));
        }

        if first == b'#' {
            return Some(match text {
                "##Inf" => Token::Float(f64::INFINITY),
                "##-Inf" => Token::Float(f64::NEG_INFINITY),
                "##NaN" => Token::Float(f64::NAN),
                _ => Token::Tag(&text[1..]),
            });
        }

        if let Some(token) = Self::try_number(text) {
            return Some(token);
        }

        if first == b'\\' && text.len() > 1 {
            let body = &text[1..];
            return Some(match Self::try_char(body) {
                Some(ch) => Token::Char(ch),
                None => Token::CharText(body),
            });
        }

        Some(Token::Symbol(text))
    }

    /// Integer, then float, then `N` integer, in that order.
    fn try_number(text: &str) -> Option<Token<'a>> {
        let bytes = text.as_bytes();

        if scan_integer(bytes) == Some(bytes.len()) {
            return Some(parse_integer(text));
        }

        if scan_float(bytes) == Some(bytes.len()) {
            let digits = text.strip_suffix('M').unwrap_or(text);
            return digits.parse().ok().map(Token::Float);
        }

        let digits = text.strip_suffix('N')?;
        if scan_integer(digits.as_bytes()) == Some(digits.len()) {
            return digits.parse().ok().map(Token::BigInt);
        }

        None
    }

    /// Character literal body, after the backslash.
    fn try_char(body: &str) -> Option<char> {
        let mut chars = body.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Some(ch);
        }

        if let Some(&named) = NAMED_CHARS.get(body) {
            return Some(named);
        }

        let hex = body.strip_prefix('u')?;
        if hex.len() == 4 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }

        None
    }
}

/// Integer tokens that overflow `i64` widen to `i128`, then to `f64`.
fn parse_integer(text: &str) -> Token<'static> {
    if let Ok(i) = text.parse::<i64>() {
        return Token::Integer(i);
    }
    if let Ok(i) = text.parse::<i128>() {
        return Token::BigInt(i);
    }
    // Digits only at this point, so the float parse cannot fail.
    Token::Float(text.parse().unwrap_or(f64::NAN))
}

/// Length of the longest prefix matching `[-+]?(0|[1-9][0-9]*)`.
fn scan_integer(bytes: &[u8]) -> Option<usize> {
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        pos += 1;
    }

    match bytes.get(pos)? {
        b'0' => Some(pos + 1),
        b'1'..=b'9' => Some(pos + 1 + count_digits(&bytes[pos + 1..])),
        _ => None,
    }
}

/// Length of the longest prefix matching
/// `[-+]?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?(0|[1-9][0-9]*))?M?`.
fn scan_float(bytes: &[u8]) -> Option<usize> {
    let mut pos = scan_integer(bytes)?;

    if bytes.get(pos) == Some(&b'.') {
        let fraction = count_digits(&bytes[pos + 1..]);
        if fraction > 0 {
            pos += 1 + fraction;
        }
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        match bytes.get(exp) {
            Some(b'0') => pos = exp + 1,
            Some(b'1'..=b'9') => pos = exp + 1 + count_digits(&bytes[exp + 1..]),
            _ => {}
        }
    }

    if bytes.get(pos) == Some(&b'M') {
        pos += 1;
    }

    Some(pos)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
