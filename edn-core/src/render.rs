//! Rendering values back to EDN text.
//!
//! `Display` output re-parses to an equal value under the policy that
//! produced it. Projections render as their EDN counterparts: sorted sets as
//! `#{...}`, sorted maps and records as `{...}` (record keys as strings).
//! Timestamps print as many fraction digits as they carry.

use std::fmt::{self, Display, Formatter, Write};

use chrono::SecondsFormat;

use crate::value::Value;

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::BigInt(i) => write!(f, "{i}N"),
            Value::Float(x) => write_float(f, *x),
            Value::String(s) => write_string(f, s),
            Value::Char(c) => write_char(f, *c),
            Value::Keyword(k) => write!(f, ":{k}"),
            Value::Symbol(s) => f.write_str(s),
            Value::Vector(items) => write_seq(f, "[", items, "]"),
            Value::List(items) => write_seq(f, "(", items, ")"),
            Value::Set(items) => write_seq(f, "#{", items, "}"),
            Value::SortedSet(items) => write_seq(f, "#{", items, "}"),
            Value::Map(pairs) => write_map(f, pairs.iter().map(|(k, v)| (k, v))),
            Value::SortedMap(map) => write_map(f, map.iter()),
            Value::Record(map) => {
                f.write_char('{')?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    write_string(f, key)?;
                    write!(f, " {value}")?;
                }
                f.write_char('}')
            }
            Value::Tagged(tagged) => write!(f, "#{} {}", tagged.tag, tagged.value),
            Value::Inst(t) => {
                write!(f, "#inst \"{}\"", t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

fn write_seq<'a>(
    f: &mut Formatter<'_>,
    open: &str,
    items: impl IntoIterator<Item = &'a Value>,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

fn write_map<'a>(
    f: &mut Formatter<'_>,
    pairs: impl Iterator<Item = (&'a Value, &'a Value)>,
) -> fmt::Result {
    f.write_char('{')?;
    for (i, (key, value)) in pairs.enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{key} {value}")?;
    }
    f.write_char('}')
}

/// `{:?}` always keeps a `.` or an exponent, so the text re-reads as a float.
fn write_float(f: &mut Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        f.write_str("##NaN")
    } else if x.is_infinite() {
        f.write_str(if x > 0.0 { "##Inf" } else { "##-Inf" })
    } else {
        write!(f, "{x:?}")
    }
}

fn write_string(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            _ => f.write_char(ch)?,
        }
    }
    f.write_char('"')
}

fn write_char(f: &mut Formatter<'_>, c: char) -> fmt::Result {
    match c {
        ' ' => f.write_str("\\space"),
        '\n' => f.write_str("\\newline"),
        '\r' => f.write_str("\\return"),
        '\t' => f.write_str("\\tab"),
        '\u{0C}' => f.write_str("\\formfeed"),
        '\u{08}' => f.write_str("\\backspace"),
        _ if c.is_control() || c.is_whitespace() => write!(f, "\\u{:04x}", c as u32),
        _ => write!(f, "\\{c}"),
    }
}
